//! Record Extractor.
//!
//! This module provides:
//! - [`RowSchema`], the declarative row-to-record mapping
//! - Field parsers for composite pairs, fractions and numbers
//! - [`RecordExtractor`], which turns a located table into typed records

mod extractor;
mod parsers;
mod record;
mod schema;

pub use extractor::RecordExtractor;
pub use parsers::{parse_decimal, parse_fraction, parse_integer, split_code_name, FieldParser};
pub use record::{FieldValue, Fraction, RawRecord, TypedRecord};
pub use schema::{ColumnMapping, PlaceholderRule, RowSchema};
