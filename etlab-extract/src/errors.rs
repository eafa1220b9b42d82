//! Error types for the extraction engine.
//!
//! Absence of data is never an error here: a page without a section or a
//! section without a table is reported through
//! [`ExtractionOutcome`](crate::engine::ExtractionOutcome). The types below
//! cover configuration mistakes, which are rejected when directives are
//! compiled, and failures of the page-source collaborator.

use thiserror::Error;

/// The main error type for extraction operations.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A row schema is internally inconsistent.
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// A section descriptor cannot be compiled.
    #[error("{0}")]
    Descriptor(#[from] DescriptorError),

    /// A requested semester is invalid.
    #[error("{0}")]
    Semester(#[from] SemesterError),

    /// The page source failed to supply a document.
    #[error("{0}")]
    Source(#[from] SourceError),

    /// A directive set could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error raised when a [`RowSchema`](crate::records::RowSchema) can never
/// produce a valid record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The minimum cell count is zero.
    #[error("Row schema '{schema}': minimum cell count must be at least 1")]
    ZeroMinCells {
        /// Schema name.
        schema: String,
    },

    /// The schema declares no column mappings.
    #[error("Row schema '{schema}': no column mappings declared")]
    NoColumns {
        /// Schema name.
        schema: String,
    },

    /// A column mapping references a cell that a minimal row does not have.
    #[error(
        "Row schema '{schema}': column {index} for field '{field}' is outside the minimum cell count {min_cells}"
    )]
    ColumnOutOfRange {
        /// Schema name.
        schema: String,
        /// The offending cell index.
        index: usize,
        /// The field the mapping produces.
        field: String,
        /// The schema's minimum cell count.
        min_cells: usize,
    },

    /// The semester column is outside the minimum cell count.
    #[error("Row schema '{schema}': semester column {index} is outside the minimum cell count {min_cells}")]
    SemesterColumnOutOfRange {
        /// Schema name.
        schema: String,
        /// The semester column index.
        index: usize,
        /// The schema's minimum cell count.
        min_cells: usize,
    },

    /// Rows must carry a semester label but no semester column is declared.
    #[error("Row schema '{schema}': semester required but no semester column declared")]
    MissingSemesterColumn {
        /// Schema name.
        schema: String,
    },

    /// Two mappings produce the same output field.
    #[error("Row schema '{schema}': field '{field}' is declared more than once")]
    DuplicateField {
        /// Schema name.
        schema: String,
        /// The duplicated field name.
        field: String,
    },
}

/// Error raised when a [`SectionDescriptor`](crate::locator::SectionDescriptor)
/// cannot be compiled.
#[derive(Debug, Clone, Error)]
pub enum DescriptorError {
    /// No strategies were declared.
    #[error("Section '{section}': no locator strategies declared")]
    NoStrategies {
        /// Section name.
        section: String,
    },

    /// A strategy accepts no tag names.
    #[error("Section '{section}': strategy {strategy} has no tag names")]
    NoTags {
        /// Section name.
        section: String,
        /// Strategy position.
        strategy: usize,
    },

    /// No table tag names were declared.
    #[error("Section '{section}': no table tag names declared")]
    NoTableTags {
        /// Section name.
        section: String,
    },

    /// A text predicate has nothing to match against.
    #[error("Section '{section}': strategy {strategy} has an empty text predicate")]
    EmptyPredicate {
        /// Section name.
        section: String,
        /// Strategy position.
        strategy: usize,
    },

    /// Two sections in one directive set share a name.
    #[error("Section '{section}' is declared more than once")]
    DuplicateSection {
        /// Section name.
        section: String,
    },

    /// A pattern predicate is not a valid regular expression.
    #[error("Section '{section}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Section name.
        section: String,
        /// The pattern source.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Error raised for a requested semester outside `1..=8`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemesterError {
    /// The number is outside the valid range.
    #[error("Invalid semester {0}. Semester has to be between 1 and 8")]
    OutOfRange(i64),

    /// The value is not an integer.
    #[error("Semester should be a valid integer, got '{0}'")]
    NotANumber(String),
}

/// Errors produced by a [`PageSource`](crate::portal::PageSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The portal answered with its login page.
    #[error("Token expired. Please login again.")]
    SessionExpired,

    /// The source has no document for the page.
    #[error("Page not available: {0}")]
    PageUnavailable(String),
}

/// Result alias for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
