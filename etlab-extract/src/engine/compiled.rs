//! Compiled sections and the engine that runs them.

use tracing::{debug, info};

use super::directives::SectionSpec;
use super::outcome::ExtractionOutcome;
use crate::document::Document;
use crate::errors::ExtractResult;
use crate::locator::{Location, SectionLocator};
use crate::observability::SpanTimer;
use crate::records::RecordExtractor;
use crate::semester::{MatchMode, Semester};

/// A section whose descriptor and schema have both been validated.
#[derive(Debug, Clone)]
pub struct CompiledSection {
    locator: SectionLocator,
    extractor: RecordExtractor,
}

impl CompiledSection {
    /// Compiles a section spec.
    pub fn new(spec: &SectionSpec) -> ExtractResult<Self> {
        let locator = SectionLocator::compile(&spec.descriptor)?;
        let extractor = RecordExtractor::new(spec.schema.clone())?;
        Ok(Self { locator, extractor })
    }

    /// The section name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.locator.name()
    }

    /// The section's locator.
    #[must_use]
    pub fn locator(&self) -> &SectionLocator {
        &self.locator
    }

    /// The section's record extractor.
    #[must_use]
    pub fn extractor(&self) -> &RecordExtractor {
        &self.extractor
    }

    /// Locates the section and extracts every data row of its table.
    #[must_use]
    pub fn extract(&self, doc: &Document) -> ExtractionOutcome {
        let timer = SpanTimer::start(self.name());
        let outcome = match self.locator.locate(doc) {
            Location::Found { table, .. } => ExtractionOutcome::Found(self.extractor.extract(table)),
            Location::TableMissing { .. } => ExtractionOutcome::TableMissing,
            Location::SectionMissing => ExtractionOutcome::SectionMissing,
        };
        info!(
            section = timer.name(),
            status = outcome.status(),
            records = outcome.len(),
            duration_ms = timer.elapsed_ms(),
            "Section extracted"
        );
        outcome
    }

    /// Extracts the section, keeping only rows for the requested semester.
    #[must_use]
    pub fn extract_filtered(
        &self,
        doc: &Document,
        requested: Option<Semester>,
        mode: MatchMode,
    ) -> ExtractionOutcome {
        self.extract(doc).filter_semester(requested, mode)
    }
}

/// One section's outcome, tagged with the section name.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutcome {
    /// Section name.
    pub section: String,
    /// What the extraction produced.
    pub outcome: ExtractionOutcome,
}

/// Every compiled section of a directive set.
///
/// The engine holds no per-document state, so one instance can serve any
/// number of documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    name: String,
    match_mode: MatchMode,
    sections: Vec<CompiledSection>,
}

impl Engine {
    /// Creates an engine from already compiled sections.
    #[must_use]
    pub fn new(name: impl Into<String>, match_mode: MatchMode, sections: Vec<CompiledSection>) -> Self {
        Self {
            name: name.into(),
            match_mode,
            sections,
        }
    }

    /// The directive set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How semester labels are compared.
    #[must_use]
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Sections in report order.
    #[must_use]
    pub fn sections(&self) -> &[CompiledSection] {
        &self.sections
    }

    /// Looks up a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&CompiledSection> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Runs every section against the document, in declaration order.
    #[must_use]
    pub fn extract_all(&self, doc: &Document, requested: Option<Semester>) -> Vec<SectionOutcome> {
        let timer = SpanTimer::start(self.name.as_str());
        debug!(engine = %self.name, semester = ?requested.map(Semester::get), "Extracting document");

        let outcomes: Vec<SectionOutcome> = self
            .sections
            .iter()
            .map(|s| SectionOutcome {
                section: s.name().to_string(),
                outcome: s.extract_filtered(doc, requested, self.match_mode),
            })
            .collect();

        info!(
            engine = %self.name,
            sections = outcomes.len(),
            found = outcomes.iter().filter(|o| o.outcome.is_found()).count(),
            records = outcomes.iter().map(|o| o.outcome.len()).sum::<usize>(),
            duration_ms = timer.finish(),
            "Document extracted"
        );
        outcomes
    }
}
