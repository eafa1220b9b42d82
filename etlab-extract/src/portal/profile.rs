//! Label/value extraction for the profile page.
//!
//! The profile page is a two-column table of `th` labels and `td` values.
//! Each [`FieldDescriptor`] finds its label node and reads the nearest value
//! node after it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{rendered_text, scoped_text, Document, TextMatcher, TextPredicate, TextScope};
use crate::errors::DescriptorError;

fn default_label_tags() -> Vec<String> {
    vec!["th".to_string()]
}

fn default_value_tags() -> Vec<String> {
    vec!["td".to_string()]
}

/// Locates one labelled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Output field name.
    pub field: String,
    /// Tags that hold labels.
    #[serde(default = "default_label_tags")]
    pub label_tags: Vec<String>,
    /// The label text, matched against the label node's own text.
    pub label: TextPredicate,
    /// Tags that hold values.
    #[serde(default = "default_value_tags")]
    pub value_tags: Vec<String>,
}

impl FieldDescriptor {
    /// A `th` label matched exactly, with a `td` value.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label_tags: default_label_tags(),
            label: TextPredicate::exact(label),
            value_tags: default_value_tags(),
        }
    }

    /// Replaces the label predicate.
    #[must_use]
    pub fn with_label(mut self, label: TextPredicate) -> Self {
        self.label = label;
        self
    }
}

#[derive(Debug, Clone)]
struct CompiledField {
    field: String,
    label_tags: Vec<String>,
    matcher: TextMatcher,
    value_tags: Vec<String>,
}

/// Compiled field descriptors for one label/value page.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    fields: Vec<CompiledField>,
}

impl FieldExtractor {
    /// Validates and compiles descriptors.
    pub fn new(descriptors: &[FieldDescriptor]) -> Result<Self, DescriptorError> {
        let mut fields = Vec::with_capacity(descriptors.len());
        for (i, d) in descriptors.iter().enumerate() {
            let lower = |tags: &[String]| -> Vec<String> {
                tags.iter()
                    .map(|t| t.trim().to_ascii_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            };
            let label_tags = lower(&d.label_tags);
            if label_tags.is_empty() {
                return Err(DescriptorError::NoTags {
                    section: d.field.clone(),
                    strategy: i,
                });
            }
            let value_tags = lower(&d.value_tags);
            if value_tags.is_empty() {
                return Err(DescriptorError::NoTableTags {
                    section: d.field.clone(),
                });
            }
            if d.label.is_empty() {
                return Err(DescriptorError::EmptyPredicate {
                    section: d.field.clone(),
                    strategy: i,
                });
            }
            let matcher =
                TextMatcher::compile(&d.label).map_err(|source| DescriptorError::InvalidPattern {
                    section: d.field.clone(),
                    pattern: format!("{:?}", d.label),
                    source,
                })?;
            fields.push(CompiledField {
                field: d.field.clone(),
                label_tags,
                matcher,
                value_tags,
            });
        }
        Ok(Self { fields })
    }

    /// Reads every field, in declaration order. A field whose label or value
    /// node is absent reads as `None`.
    #[must_use]
    pub fn extract(&self, doc: &Document) -> Vec<(String, Option<String>)> {
        self.fields
            .iter()
            .map(|f| {
                let value = doc
                    .find_first(&f.label_tags, |el| {
                        f.matcher.matches(&scoped_text(el, TextScope::Direct))
                    })
                    .and_then(|label| doc.find_following(label, &f.value_tags))
                    .map(rendered_text);
                if value.is_none() {
                    debug!(field = %f.field, "Profile field not found");
                }
                (f.field.clone(), value)
            })
            .collect()
    }
}

/// The student's personal details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Full name.
    pub name: Option<String>,
    /// Date of birth, as printed.
    #[serde(rename = "dob")]
    pub date_of_birth: Option<String>,
    /// Admission number.
    pub admission_no: Option<String>,
    /// University register number.
    pub university_reg_no: Option<String>,
}

impl ProfileRecord {
    /// Whether no field was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date_of_birth.is_none()
            && self.admission_no.is_none()
            && self.university_reg_no.is_none()
    }
}

/// Descriptors for the portal profile page.
#[must_use]
pub fn profile_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("name", "Name"),
        FieldDescriptor::new("dob", "Date of Birth"),
        FieldDescriptor::new("admission_no", "Admission No"),
        FieldDescriptor::new("university_reg_no", "University Reg No"),
    ]
}

/// Extracts the profile page.
pub fn extract_profile(doc: &Document) -> Result<ProfileRecord, DescriptorError> {
    let mut record = ProfileRecord::default();
    for (field, value) in FieldExtractor::new(&profile_fields())?.extract(doc) {
        match field.as_str() {
            "name" => record.name = value,
            "dob" => record.date_of_birth = value,
            "admission_no" => record.admission_no = value,
            "university_reg_no" => record.university_reg_no = value,
            _ => {}
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = "<table>\
        <tr><th>Father's Name</th><td>K. Kumar</td></tr>\
        <tr><th>Name</th><td> Anu  Kumar </td></tr>\
        <tr><th>Date of Birth</th><td>01-02-2004</td></tr>\
        <tr><th>Admission No</th><td>22B101</td></tr>\
        <tr><th>University Reg No</th><td>TVE22CS101</td></tr>\
        </table>";

    #[test]
    fn test_extract_profile() {
        let profile = extract_profile(&Document::parse(PROFILE)).unwrap();
        assert_eq!(
            profile,
            ProfileRecord {
                name: Some("Anu Kumar".to_string()),
                date_of_birth: Some("01-02-2004".to_string()),
                admission_no: Some("22B101".to_string()),
                university_reg_no: Some("TVE22CS101".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_fields_are_none() {
        let profile =
            extract_profile(&Document::parse("<table><tr><th>Name</th><td>A</td></tr></table>"))
                .unwrap();
        assert_eq!(profile.name.as_deref(), Some("A"));
        assert!(profile.admission_no.is_none());
        assert!(extract_profile(&Document::parse("<p>empty</p>")).unwrap().is_empty());
    }

    #[test]
    fn test_profile_json_keys() {
        let value = serde_json::to_value(ProfileRecord {
            date_of_birth: Some("x".to_string()),
            ..ProfileRecord::default()
        })
        .unwrap();
        assert_eq!(value["dob"], "x");
        assert!(value["name"].is_null());
    }

    #[test]
    fn test_invalid_label_pattern() {
        let bad = FieldDescriptor::new("x", "x").with_label(TextPredicate::pattern("("));
        assert!(matches!(
            FieldExtractor::new(&[bad]).unwrap_err(),
            DescriptorError::InvalidPattern { .. }
        ));
    }
}
