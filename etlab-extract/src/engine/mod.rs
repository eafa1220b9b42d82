//! Extraction engine: compiled directive sets run against documents.
//!
//! A [`DirectiveSet`] pairs each [`SectionDescriptor`](crate::locator::SectionDescriptor)
//! with a [`RowSchema`](crate::records::RowSchema). Compiling it validates
//! every piece up front; the resulting [`Engine`] is immutable and can be
//! shared across threads.

mod compiled;
mod directives;
mod outcome;


pub use compiled::{CompiledSection, Engine, SectionOutcome};
pub use directives::{DirectiveSet, SectionSpec};
pub use outcome::ExtractionOutcome;
