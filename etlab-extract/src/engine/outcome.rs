//! Extraction outcome type.

use serde::Serialize;

use crate::records::TypedRecord;
use crate::semester::{matches_with, MatchMode, Semester};

/// The result of extracting one section from one document.
///
/// Missing sections and tables are ordinary values: portal pages routinely
/// omit a section when there is nothing to show yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "records", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// The section and its table were found. The records may be empty.
    Found(Vec<TypedRecord>),
    /// No anchor matched any strategy.
    SectionMissing,
    /// An anchor matched but no table follows it.
    TableMissing,
}

impl ExtractionOutcome {
    /// Whether the section's table was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Whether the outcome means "nothing to report" at section level.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        !self.is_found()
    }

    /// The records; empty for a missing section or table.
    #[must_use]
    pub fn records(&self) -> &[TypedRecord] {
        match self {
            Self::Found(records) => records,
            Self::SectionMissing | Self::TableMissing => &[],
        }
    }

    /// Consumes the outcome, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<TypedRecord> {
        match self {
            Self::Found(records) => records,
            Self::SectionMissing | Self::TableMissing => Vec::new(),
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Keeps only records whose semester label denotes `requested`.
    /// Records without a semester label are dropped unless `requested` is
    /// `None`. Missing outcomes pass through unchanged.
    #[must_use]
    pub fn filter_semester(self, requested: Option<Semester>, mode: MatchMode) -> Self {
        match self {
            Self::Found(records) => Self::Found(
                records
                    .into_iter()
                    .filter(|r| matches_with(r.semester_label().unwrap_or(""), requested, mode))
                    .collect(),
            ),
            other => other,
        }
    }

    /// A short status label.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::SectionMissing => "section_missing",
            Self::TableMissing => "table_missing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::FieldValue;

    fn record(label: &str) -> TypedRecord {
        let mut r = TypedRecord::new();
        r.insert("semester", FieldValue::from(label));
        r.set_semester(Some(label.to_string()), None);
        r
    }

    #[test]
    fn test_missing_outcomes_have_no_records() {
        assert!(ExtractionOutcome::SectionMissing.records().is_empty());
        assert!(ExtractionOutcome::TableMissing.into_records().is_empty());
        assert!(ExtractionOutcome::TableMissing.is_missing());
        assert!(ExtractionOutcome::Found(Vec::new()).is_found());
    }

    #[test]
    fn test_filter_semester() {
        let outcome = ExtractionOutcome::Found(vec![record("IIIrd Semester"), record("IVth Semester")]);
        let filtered = outcome.clone().filter_semester(Semester::new(3).ok(), MatchMode::Substring);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].semester_label(), Some("IIIrd Semester"));

        let all = outcome.filter_semester(None, MatchMode::Substring);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_filter_keeps_missing_status() {
        let outcome = ExtractionOutcome::SectionMissing.filter_semester(Semester::new(1).ok(), MatchMode::Substring);
        assert_eq!(outcome, ExtractionOutcome::SectionMissing);
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_value(ExtractionOutcome::TableMissing).unwrap(),
            serde_json::json!({"status": "table_missing"})
        );
        let found = ExtractionOutcome::Found(vec![record("S1")]);
        assert_eq!(
            serde_json::to_value(found).unwrap(),
            serde_json::json!({"status": "found", "records": [{"semester": "S1"}]})
        );
    }
}
