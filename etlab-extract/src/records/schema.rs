//! Row schema configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::parsers::FieldParser;
use crate::errors::SchemaError;

/// Maps one cell of a row to output fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Zero-based cell index within the row.
    pub index: usize,
    /// An optional cell may lie past the minimum cell count; rows that lack
    /// it parse an empty string.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// How the cell text becomes fields.
    #[serde(flatten)]
    pub parser: FieldParser,
}

impl ColumnMapping {
    /// Creates a mapping.
    #[must_use]
    pub fn new(index: usize, parser: FieldParser) -> Self {
        Self {
            index,
            optional: false,
            parser,
        }
    }

    /// Marks the cell as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Recognises "no data yet" placeholder rows by their first cell.
///
/// Matches when the first cell contains every `all_of` string and, if
/// `any_of` is non-empty, at least one `any_of` string. Comparison is
/// case-sensitive, so "No" does not match "Notes".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderRule {
    /// Substrings that must all be present.
    #[serde(default)]
    pub all_of: Vec<String>,
    /// Substrings of which one must be present.
    #[serde(default)]
    pub any_of: Vec<String>,
}

impl PlaceholderRule {
    /// A rule requiring every listed substring.
    #[must_use]
    pub fn all_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_of: values.into_iter().map(Into::into).collect(),
            any_of: Vec::new(),
        }
    }

    /// Adds alternatives of which one must be present.
    #[must_use]
    pub fn with_any_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any_of = values.into_iter().map(Into::into).collect();
        self
    }

    /// Tests a first-cell text.
    #[must_use]
    pub fn matches(&self, first_cell: &str) -> bool {
        if self.all_of.is_empty() && self.any_of.is_empty() {
            return false;
        }
        self.all_of.iter().all(|s| first_cell.contains(s.as_str()))
            && (self.any_of.is_empty() || self.any_of.iter().any(|s| first_cell.contains(s.as_str())))
    }
}

/// How table rows become records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSchema {
    /// Schema name, used in logs and errors.
    pub name: String,
    /// Leading rows skipped as headers.
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    /// Rows with fewer cells are skipped.
    #[serde(default = "default_min_cells")]
    pub min_cells: usize,
    /// Tag names that count as cells.
    #[serde(default = "default_cell_tags")]
    pub cell_tags: Vec<String>,
    /// Column mappings, in output order.
    #[serde(default)]
    pub columns: Vec<ColumnMapping>,
    /// Placeholder rules evaluated against the first cell.
    #[serde(default)]
    pub placeholders: Vec<PlaceholderRule>,
    /// The cell holding the semester label, if any.
    #[serde(default)]
    pub semester_column: Option<usize>,
    /// Skip rows whose semester label does not read as a semester number.
    #[serde(default)]
    pub require_semester: bool,
}

fn default_header_rows() -> usize {
    1
}

fn default_min_cells() -> usize {
    1
}

fn default_cell_tags() -> Vec<String> {
    vec!["td".to_string()]
}

impl RowSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header_rows: default_header_rows(),
            min_cells: default_min_cells(),
            cell_tags: default_cell_tags(),
            columns: Vec::new(),
            placeholders: Vec::new(),
            semester_column: None,
            require_semester: false,
        }
    }

    /// Sets how many leading rows are headers. Zero treats every row as
    /// a candidate data row.
    #[must_use]
    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// Sets the minimum cell count.
    #[must_use]
    pub fn with_min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// Appends a column mapping.
    #[must_use]
    pub fn with_column(mut self, index: usize, parser: FieldParser) -> Self {
        self.columns.push(ColumnMapping::new(index, parser));
        self
    }

    /// Appends a mapping for a cell that short rows may lack.
    #[must_use]
    pub fn with_optional_column(mut self, index: usize, parser: FieldParser) -> Self {
        self.columns.push(ColumnMapping::new(index, parser).optional());
        self
    }

    /// Appends a placeholder rule.
    #[must_use]
    pub fn with_placeholder(mut self, rule: PlaceholderRule) -> Self {
        self.placeholders.push(rule);
        self
    }

    /// Declares the semester label column.
    #[must_use]
    pub fn with_semester_column(mut self, index: usize) -> Self {
        self.semester_column = Some(index);
        self
    }

    /// Keeps only rows whose semester label is recognisable.
    #[must_use]
    pub fn requiring_semester(mut self) -> Self {
        self.require_semester = true;
        self
    }

    /// Checks that every declared cell exists in a minimal row and that no
    /// output field is declared twice.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let schema = self.name.clone();
        if self.min_cells == 0 {
            return Err(SchemaError::ZeroMinCells { schema });
        }
        if self.columns.is_empty() {
            return Err(SchemaError::NoColumns { schema });
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !column.optional && column.index >= self.min_cells {
                return Err(SchemaError::ColumnOutOfRange {
                    schema,
                    index: column.index,
                    field: column.parser.outputs().join(", "),
                    min_cells: self.min_cells,
                });
            }
            for field in column.parser.outputs() {
                if !seen.insert(field) {
                    return Err(SchemaError::DuplicateField {
                        schema,
                        field: field.to_string(),
                    });
                }
            }
        }

        if self.require_semester && self.semester_column.is_none() {
            return Err(SchemaError::MissingSemesterColumn { schema });
        }
        if let Some(index) = self.semester_column {
            if index >= self.min_cells {
                return Err(SchemaError::SemesterColumnOutOfRange {
                    schema,
                    index,
                    min_cells: self.min_cells,
                });
            }
        }
        Ok(())
    }

    /// Declared output fields in order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .flat_map(|c| c.parser.outputs())
            .collect()
    }
}
