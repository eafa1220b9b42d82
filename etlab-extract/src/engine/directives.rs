//! Directive sets: section descriptors paired with row schemas.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::compiled::{CompiledSection, Engine};
use crate::errors::{DescriptorError, ExtractResult};
use crate::locator::SectionDescriptor;
use crate::records::RowSchema;
use crate::semester::MatchMode;

/// How to find one section and turn its rows into records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Where the section lives.
    pub descriptor: SectionDescriptor,
    /// How its rows map to records.
    pub schema: RowSchema,
}

impl SectionSpec {
    /// Pairs a descriptor with a schema.
    #[must_use]
    pub fn new(descriptor: SectionDescriptor, schema: RowSchema) -> Self {
        Self { descriptor, schema }
    }

    /// The section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Validates and compiles the section.
    pub fn compile(&self) -> ExtractResult<CompiledSection> {
        CompiledSection::new(self)
    }
}

/// Every section directive for one page of one document family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveSet {
    /// Directive set name, usually the page it targets.
    pub name: String,
    /// How semester labels are compared.
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Sections, in report order.
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

impl DirectiveSet {
    /// Creates an empty directive set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            match_mode: MatchMode::default(),
            sections: Vec::new(),
        }
    }

    /// Appends a section.
    #[must_use]
    pub fn with_section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    /// Sets the semester match mode.
    #[must_use]
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Loads a directive set from JSON.
    pub fn from_json_str(json: &str) -> ExtractResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the directive set as pretty JSON.
    pub fn to_json_string(&self) -> ExtractResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every section and builds an [`Engine`]. Configuration
    /// mistakes surface here, before any document is read.
    pub fn compile(&self) -> ExtractResult<Engine> {
        let mut names = HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());
        for spec in &self.sections {
            if !names.insert(spec.name()) {
                return Err(DescriptorError::DuplicateSection {
                    section: spec.name().to_string(),
                }
                .into());
            }
            sections.push(spec.compile()?);
        }
        Ok(Engine::new(self.name.clone(), self.match_mode, sections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextPredicate;
    use crate::errors::{ExtractError, SchemaError};
    use crate::locator::LocatorStrategy;
    use crate::records::FieldParser;

    fn tutorials() -> SectionSpec {
        SectionSpec::new(
            SectionDescriptor::new("tutorials")
                .with_strategy(LocatorStrategy::heading(TextPredicate::contains("tutorial"))),
            RowSchema::new("tutorials")
                .with_min_cells(2)
                .with_column(0, FieldParser::text("subject"))
                .with_column(1, FieldParser::text("semester"))
                .with_semester_column(1),
        )
    }

    #[test]
    fn test_json_roundtrip_compiles() {
        let set = DirectiveSet::new("results").with_section(tutorials());
        let json = set.to_json_string().unwrap();
        let loaded = DirectiveSet::from_json_str(&json).unwrap();
        assert_eq!(loaded, set);
        assert_eq!(loaded.compile().unwrap().sections().len(), 1);
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let set = DirectiveSet::new("results")
            .with_section(tutorials())
            .with_section(tutorials());
        assert!(matches!(
            set.compile().unwrap_err(),
            ExtractError::Descriptor(DescriptorError::DuplicateSection { .. })
        ));
    }

    #[test]
    fn test_schema_error_surfaces_at_compile() {
        let mut spec = tutorials();
        spec.schema = spec.schema.with_column(4, FieldParser::text("marks"));
        let err = DirectiveSet::new("results").with_section(spec).compile().unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Schema(SchemaError::ColumnOutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            DirectiveSet::from_json_str("{not json").unwrap_err(),
            ExtractError::Serialization(_)
        ));
    }

    #[test]
    fn test_match_mode_defaults_to_substring() {
        let set = DirectiveSet::from_json_str(r#"{"name": "empty"}"#).unwrap();
        assert_eq!(set.match_mode, MatchMode::Substring);
        assert!(set.sections.is_empty());
    }
}
