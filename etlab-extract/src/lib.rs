//! # ETLab Extract
//!
//! A declarative extraction engine for the student pages of an academic
//! portal.
//!
//! The engine turns loosely structured HTML into typed records:
//!
//! - **Document Locator**: finds a section's anchor node with an ordered list
//!   of fallback strategies, then the nearest table after it
//! - **Record Extractor**: maps table rows to typed records through a
//!   declarative row schema, skipping headers, short rows and placeholders
//! - **Semester Normalizer**: decides whether free-text semester labels such
//!   as "IIIrd Semester" denote a requested semester
//!
//! Missing sections and tables are values, not errors. Configuration
//! mistakes are rejected when a directive set is compiled.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use etlab_extract::prelude::*;
//!
//! let engine = presets::results().compile()?;
//! let doc = Document::parse(&html);
//! for section in engine.extract_all(&doc, Semester::new(3).ok()) {
//!     println!("{}: {} records", section.section, section.outcome.len());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod document;
pub mod engine;
pub mod errors;
pub mod locator;
pub mod observability;
pub mod portal;
pub mod records;
pub mod semester;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::document::{Document, TextPredicate, TextScope};
    pub use crate::engine::{
        CompiledSection, DirectiveSet, Engine, ExtractionOutcome, SectionOutcome, SectionSpec,
    };
    pub use crate::errors::{
        DescriptorError, ExtractError, ExtractResult, SchemaError, SemesterError, SourceError,
    };
    pub use crate::locator::{Location, LocatorStrategy, SectionDescriptor, SectionLocator};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::portal::{
        extract_page, fetch_page, presets, PageSource, PortalPage, ResultsReport, SessionToken,
        StaticPageSource,
    };
    pub use crate::records::{
        FieldParser, FieldValue, Fraction, PlaceholderRule, RecordExtractor, RowSchema, TypedRecord,
    };
    pub use crate::semester::{matches, matches_with, semester_number, MatchMode, Semester};
}
