//! Raw and typed record types.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::semester::Semester;

/// Attendance-style counts parsed from "435/450 (97%)".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fraction {
    /// Hours present (numerator).
    pub present: u32,
    /// Total hours (denominator).
    pub total: u32,
    /// Percentage as printed by the portal.
    pub percentage: f64,
}

/// A parsed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text passed through as-is.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Decimal number.
    Decimal(f64),
    /// Present/total/percentage triple.
    Fraction(Fraction),
}

impl FieldValue {
    /// The value as text, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a whole number, if it is one.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a decimal, if it is one.
    #[must_use]
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a fraction, if it is one.
    #[must_use]
    pub fn as_fraction(&self) -> Option<&Fraction> {
        match self {
            Self::Fraction(f) => Some(f),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// The normalized cell texts a row schema selected from one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Position of the row within the table, header included.
    pub row_index: usize,
    /// `(cell index, normalized text)` for each declared column.
    pub cells: Vec<(usize, String)>,
    /// Text of the semester column, when the schema declares one.
    pub semester_label: Option<String>,
}

impl RawRecord {
    /// The normalized text of a declared cell.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, text)| text.as_str())
    }
}

/// One fully parsed table row.
///
/// Fields keep the order the row schema declares them in; serialization
/// emits exactly those fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedRecord {
    fields: Vec<(String, FieldValue)>,
    semester_label: Option<String>,
    semester: Option<Semester>,
}

impl TypedRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.push((field.into(), value));
    }

    /// Sets the semester label and its canonical number.
    pub fn set_semester(&mut self, label: Option<String>, semester: Option<Semester>) {
        self.semester_label = label;
        self.semester = semester;
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Looks up a text field.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Fields in declared order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The raw semester label, if the schema declares a semester column.
    #[must_use]
    pub fn semester_label(&self) -> Option<&str> {
        self.semester_label.as_deref()
    }

    /// The canonical semester the label denotes, if recognisable.
    #[must_use]
    pub fn semester(&self) -> Option<Semester> {
        self.semester
    }

    /// Converts to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for TypedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lookup_and_order() {
        let mut record = TypedRecord::new();
        record.insert("subject_code", "24CST303".into());
        record.insert("marks_obtained", FieldValue::Integer(42));

        assert_eq!(record.text("subject_code"), Some("24CST303"));
        assert_eq!(record.get("marks_obtained").and_then(FieldValue::as_integer), Some(42));
        assert_eq!(record.field_names().collect::<Vec<_>>(), ["subject_code", "marks_obtained"]);
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn test_record_serializes_only_fields() {
        let mut record = TypedRecord::new();
        record.insert("semester", "IIIrd Semester".into());
        record.insert(
            "attendance",
            FieldValue::Fraction(Fraction { present: 435, total: 450, percentage: 97.0 }),
        );
        record.set_semester(Some("IIIrd Semester".to_string()), Semester::new(3).ok());

        assert_eq!(
            record.to_json(),
            serde_json::json!({
                "semester": "IIIrd Semester",
                "attendance": {"present": 435, "total": 450, "percentage": 97.0}
            })
        );
    }

    #[test]
    fn test_raw_record_cell() {
        let raw = RawRecord {
            row_index: 1,
            cells: vec![(0, "A".to_string()), (3, "50".to_string())],
            semester_label: None,
        };
        assert_eq!(raw.cell(3), Some("50"));
        assert_eq!(raw.cell(1), None);
    }
}
