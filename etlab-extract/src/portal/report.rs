//! Report assembly for the portal's JSON responses.

use chrono::{DateTime, Utc};
use serde::ser::Serializer;
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::engine::SectionOutcome;
use crate::semester::Semester;

/// Per-section records plus counts and diagnostics for one extraction run.
#[derive(Debug, Clone)]
pub struct ResultsReport {
    /// Identifies the run in logs.
    pub run_id: Uuid,
    /// When the report was assembled.
    pub extracted_at: DateTime<Utc>,
    /// The page the report covers.
    pub page: String,
    /// The semester filter, if one was applied.
    pub requested_semester: Option<Semester>,
    /// Section outcomes in report order.
    pub sections: Vec<SectionOutcome>,
    /// Page-specific additions, such as result links or overall figures.
    pub extras: Map<String, Value>,
}

impl ResultsReport {
    /// Creates a report.
    #[must_use]
    pub fn new(
        page: impl Into<String>,
        requested_semester: Option<Semester>,
        sections: Vec<SectionOutcome>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            extracted_at: Utc::now(),
            page: page.into(),
            requested_semester,
            sections,
            extras: Map::new(),
        }
    }

    /// Adds a top-level value. Skipped when it serializes to `null` or an
    /// empty array.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Null) => {}
            Ok(Value::Array(items)) if items.is_empty() => {}
            Ok(v) => {
                self.extras.insert(key.into(), v);
            }
            Err(err) => tracing::warn!(error = %err, "Dropping unserializable report extra"),
        }
        self
    }

    /// Total records across all sections.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.sections.iter().map(|s| s.outcome.len()).sum()
    }

    /// Names of sections whose table was found.
    #[must_use]
    pub fn sections_found(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.outcome.is_found())
            .map(|s| s.section.as_str())
            .collect()
    }

    /// Names of sections that were absent or had no table.
    #[must_use]
    pub fn sections_missing(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.outcome.is_missing())
            .map(|s| s.section.as_str())
            .collect()
    }

    /// Renders the report as a JSON object: one array per section, a
    /// `total_<section>` count per section, extras, and `debug_info`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        for s in &self.sections {
            let records: Vec<Value> = s.outcome.records().iter().map(|r| r.to_json()).collect();
            body.insert(format!("total_{}", s.section), json!(records.len()));
            body.insert(s.section.clone(), Value::Array(records));
        }
        for (key, value) in &self.extras {
            body.insert(key.clone(), value.clone());
        }

        let statuses: Map<String, Value> = self
            .sections
            .iter()
            .map(|s| (s.section.clone(), json!(s.outcome.status())))
            .collect();
        body.insert(
            "debug_info".to_string(),
            json!({
                "run_id": self.run_id.to_string(),
                "extracted_at": self.extracted_at.to_rfc3339(),
                "page": self.page,
                "requested_semester": self.requested_semester.map(Semester::get),
                "semester_filter_applied": self.requested_semester.is_some(),
                "sections_found": self.sections_found(),
                "sections_missing": self.sections_missing(),
                "section_status": statuses,
            }),
        );
        Value::Object(body)
    }
}

impl Serialize for ResultsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExtractionOutcome;
    use crate::records::{FieldValue, TypedRecord};

    fn outcome(section: &str, outcome: ExtractionOutcome) -> SectionOutcome {
        SectionOutcome {
            section: section.to_string(),
            outcome,
        }
    }

    fn record(code: &str) -> TypedRecord {
        let mut r = TypedRecord::new();
        r.insert("subject_code", FieldValue::from(code));
        r
    }

    #[test]
    fn test_report_json_shape() {
        let report = ResultsReport::new(
            "results",
            Semester::new(3).ok(),
            vec![
                outcome("sessional_exams", ExtractionOutcome::Found(vec![record("A"), record("B")])),
                outcome("tutorials", ExtractionOutcome::SectionMissing),
            ],
        );
        let value = report.to_json();

        assert_eq!(value["total_sessional_exams"], 2);
        assert_eq!(value["sessional_exams"][1]["subject_code"], "B");
        assert_eq!(value["total_tutorials"], 0);
        assert_eq!(value["tutorials"], json!([]));
        assert_eq!(value["debug_info"]["requested_semester"], 3);
        assert_eq!(value["debug_info"]["semester_filter_applied"], true);
        assert_eq!(value["debug_info"]["sections_found"], json!(["sessional_exams"]));
        assert_eq!(value["debug_info"]["sections_missing"], json!(["tutorials"]));
        assert_eq!(value["debug_info"]["section_status"]["tutorials"], "section_missing");
        assert_eq!(report.total_records(), 2);
    }

    #[test]
    fn test_extras_skip_empty_values() {
        let report = ResultsReport::new("end_semester", None, Vec::new())
            .with_extra("available_links", Vec::<String>::new())
            .with_extra("note", "current semester only")
            .with_extra("missing", Option::<u32>::None);
        let value = report.to_json();
        assert!(value.get("available_links").is_none());
        assert!(value.get("missing").is_none());
        assert_eq!(value["note"], "current semester only");
        assert_eq!(value["debug_info"]["semester_filter_applied"], false);
        assert!(value["debug_info"]["requested_semester"].is_null());
    }
}
