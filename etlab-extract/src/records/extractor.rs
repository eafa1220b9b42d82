//! Record Extractor: table rows to typed records.

use scraper::ElementRef;
use tracing::trace;

use super::record::{RawRecord, TypedRecord};
use super::schema::RowSchema;
use crate::document::{child_elements, descendant_elements, rendered_text};
use crate::errors::SchemaError;
use crate::semester::semester_number;

const ROW_TAGS: &[&str] = &["tr"];

/// A validated [`RowSchema`] ready to run against tables.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    schema: RowSchema,
    row_tags: Vec<String>,
    cell_tags: Vec<String>,
}

impl RecordExtractor {
    /// Validates the schema.
    pub fn new(schema: RowSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let cell_tags = schema
            .cell_tags
            .iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .collect();
        Ok(Self {
            schema,
            row_tags: ROW_TAGS.iter().map(|t| (*t).to_string()).collect(),
            cell_tags,
        })
    }

    /// The schema this extractor runs.
    #[must_use]
    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    /// Selects the declared cells of every data row.
    ///
    /// The schema's leading header rows (one by default) are skipped
    /// unconditionally. Rows with fewer cells
    /// than the schema minimum, and rows whose first cell matches a
    /// placeholder rule, are skipped. Optional cells a row lacks are left
    /// out of its raw record.
    #[must_use]
    pub fn raw_records(&self, table: ElementRef<'_>) -> Vec<RawRecord> {
        let mut out = Vec::new();

        let rows = descendant_elements(table, &self.row_tags)
            .enumerate()
            .skip(self.schema.header_rows);
        for (row_index, row) in rows {
            let cells: Vec<String> = child_elements(row, &self.cell_tags)
                .map(rendered_text)
                .collect();

            if cells.len() < self.schema.min_cells {
                trace!(schema = %self.schema.name, row_index, cells = cells.len(), reason = "short", "Skipping row");
                continue;
            }

            let first = cells.first().map_or("", String::as_str);
            if self.schema.placeholders.iter().any(|p| p.matches(first)) {
                trace!(schema = %self.schema.name, row_index, reason = "placeholder", "Skipping row");
                continue;
            }

            let semester_label = self.schema.semester_column.map(|i| cells[i].clone());
            if self.schema.require_semester
                && semester_label.as_deref().and_then(semester_number).is_none()
            {
                trace!(schema = %self.schema.name, row_index, reason = "no_semester", "Skipping row");
                continue;
            }

            let declared = self
                .schema
                .columns
                .iter()
                .filter_map(|c| cells.get(c.index).map(|text| (c.index, text.clone())))
                .collect();

            out.push(RawRecord {
                row_index,
                cells: declared,
                semester_label,
            });
        }

        out
    }

    /// Applies the field parsers to a raw record.
    #[must_use]
    pub fn parse(&self, raw: &RawRecord) -> TypedRecord {
        let mut record = TypedRecord::new();
        for column in &self.schema.columns {
            let text = raw.cell(column.index).unwrap_or_default();
            for (field, value) in column.parser.parse(text) {
                record.insert(field, value);
            }
        }
        let semester = raw.semester_label.as_deref().and_then(semester_number);
        record.set_semester(raw.semester_label.clone(), semester);
        record
    }

    /// Extracts every data row of the table, in row order.
    #[must_use]
    pub fn extract(&self, table: ElementRef<'_>) -> Vec<TypedRecord> {
        self.raw_records(table)
            .iter()
            .map(|raw| self.parse(raw))
            .collect()
    }
}
