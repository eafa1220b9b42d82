//! Field-level value parsers.
//!
//! Parsers never fail: malformed numeric text becomes zero so that a visible
//! row is never silently dropped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::record::{FieldValue, Fraction};
use crate::semester::semester_number;

static FRACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*/\s*(\d+)\s*\(\s*(\d+(?:\.\d+)?)\s*%\s*\)").expect("valid fraction regex")
});

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d+)\s*[^\d.]*$").expect("valid integer regex"));

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+))\s*[^\d.]*$").expect("valid decimal regex")
});

/// Converts one cell's text into one or more typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldParser {
    /// Pass the text through. An empty cell takes `default` when set.
    Text {
        /// Output field name.
        field: String,
        /// Substitute for an empty cell.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    /// Split "CODE - Name" into two text fields.
    CodeName {
        /// Output field for the code.
        code: String,
        /// Output field for the name.
        name: String,
    },
    /// Parse "present/total (percentage%)".
    Fraction {
        /// Output field name.
        field: String,
    },
    /// Whole number with an optional trailing unit.
    Integer {
        /// Output field name.
        field: String,
    },
    /// Decimal number with an optional trailing unit.
    Decimal {
        /// Output field name.
        field: String,
    },
    /// Canonical semester number read from a free-text label, zero when the
    /// label is not recognisable.
    SemesterNumber {
        /// Output field name.
        field: String,
    },
}

impl FieldParser {
    /// Identity parser.
    #[must_use]
    pub fn text(field: impl Into<String>) -> Self {
        Self::Text {
            field: field.into(),
            default: None,
        }
    }

    /// Identity parser with a substitute for empty cells.
    #[must_use]
    pub fn text_or(field: impl Into<String>, default: impl Into<String>) -> Self {
        Self::Text {
            field: field.into(),
            default: Some(default.into()),
        }
    }

    /// Composite-pair parser.
    #[must_use]
    pub fn code_name(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::CodeName {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Fraction-with-percentage parser.
    #[must_use]
    pub fn fraction(field: impl Into<String>) -> Self {
        Self::Fraction {
            field: field.into(),
        }
    }

    /// Whole-number parser.
    #[must_use]
    pub fn integer(field: impl Into<String>) -> Self {
        Self::Integer {
            field: field.into(),
        }
    }

    /// Decimal parser.
    #[must_use]
    pub fn decimal(field: impl Into<String>) -> Self {
        Self::Decimal {
            field: field.into(),
        }
    }

    /// Semester-number parser.
    #[must_use]
    pub fn semester_number(field: impl Into<String>) -> Self {
        Self::SemesterNumber {
            field: field.into(),
        }
    }

    /// The field names this parser produces, in output order.
    #[must_use]
    pub fn outputs(&self) -> Vec<&str> {
        match self {
            Self::CodeName { code, name } => vec![code.as_str(), name.as_str()],
            Self::Text { field, .. }
            | Self::Fraction { field }
            | Self::Integer { field }
            | Self::Decimal { field }
            | Self::SemesterNumber { field } => vec![field.as_str()],
        }
    }

    /// Parses normalized cell text into `(field, value)` pairs, one per
    /// entry of [`outputs`](Self::outputs).
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<(String, FieldValue)> {
        match self {
            Self::Text { field, default } => {
                let value = match default {
                    Some(d) if text.is_empty() => d.clone(),
                    _ => text.to_string(),
                };
                vec![(field.clone(), FieldValue::Text(value))]
            }
            Self::CodeName { code, name } => {
                let (c, n) = split_code_name(text);
                vec![
                    (code.clone(), FieldValue::Text(c)),
                    (name.clone(), FieldValue::Text(n)),
                ]
            }
            Self::Fraction { field } => {
                vec![(field.clone(), FieldValue::Fraction(parse_fraction(text)))]
            }
            Self::Integer { field } => vec![(field.clone(), FieldValue::Integer(parse_integer(text)))],
            Self::Decimal { field } => vec![(field.clone(), FieldValue::Decimal(parse_decimal(text)))],
            Self::SemesterNumber { field } => {
                let n = semester_number(text).map_or(0, |s| i64::from(s.get()));
                vec![(field.clone(), FieldValue::Integer(n))]
            }
        }
    }
}

/// Splits "24CST303 - Data Structures" into code and name on the first
/// " - ". Without the separator, code and name are both the full text.
#[must_use]
pub fn split_code_name(text: &str) -> (String, String) {
    match text.split_once(" - ") {
        Some((code, name)) => (code.trim().to_string(), name.trim().to_string()),
        None => (text.to_string(), text.to_string()),
    }
}

/// Parses "435/450 (97%)". A non-matching string yields all zeros.
#[must_use]
pub fn parse_fraction(text: &str) -> Fraction {
    FRACTION_RE
        .captures(text)
        .map(|caps| Fraction {
            present: caps[1].parse().unwrap_or(0),
            total: caps[2].parse().unwrap_or(0),
            percentage: caps[3].parse().unwrap_or(0.0),
        })
        .unwrap_or_default()
}

/// Parses a whole number, dropping a trailing unit ("42 marks"). Zero on
/// failure.
#[must_use]
pub fn parse_integer(text: &str) -> i64 {
    INTEGER_RE
        .captures(text.trim())
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Parses a decimal, dropping a trailing unit ("8.45 SGPA"). Zero on
/// failure.
#[must_use]
pub fn parse_decimal(text: &str) -> f64 {
    DECIMAL_RE
        .captures(text.trim())
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_code_name() {
        assert_eq!(
            split_code_name("24CST303 - Data Structures"),
            ("24CST303".to_string(), "Data Structures".to_string())
        );
        assert_eq!(
            split_code_name("24CST303"),
            ("24CST303".to_string(), "24CST303".to_string())
        );
    }

    #[test]
    fn test_split_code_name_keeps_later_separators_in_name() {
        let (code, name) = split_code_name("CS101 - Lab - Part A");
        assert_eq!(code, "CS101");
        assert_eq!(name, "Lab - Part A");
    }

    #[test]
    fn test_parse_fraction() {
        let f = parse_fraction("435/450 (97%)");
        assert_eq!(f.present, 435);
        assert_eq!(f.total, 450);
        assert!((f.percentage - 97.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_fraction_decimal_percentage_and_spacing() {
        let f = parse_fraction("12 / 15 ( 80.5 % )");
        assert_eq!((f.present, f.total), (12, 15));
        assert!((f.percentage - 80.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_fraction_non_matching_defaults_to_zero() {
        assert_eq!(parse_fraction("N/A"), Fraction::default());
        assert_eq!(parse_fraction(""), Fraction::default());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), 42);
        assert_eq!(parse_integer(" 42 marks "), 42);
        assert_eq!(parse_integer("-3"), -3);
        assert_eq!(parse_integer("AB"), 0);
        assert_eq!(parse_integer("42.5"), 0);
        assert_eq!(parse_integer(""), 0);
    }

    #[test]
    fn test_parse_decimal() {
        assert!((parse_decimal("8.45") - 8.45).abs() < f64::EPSILON);
        assert!((parse_decimal("97 %") - 97.0).abs() < f64::EPSILON);
        assert!((parse_decimal("-") - 0.0).abs() < f64::EPSILON);
        assert!((parse_decimal("1.2.3") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_default_for_empty_cell() {
        let parser = FieldParser::text_or("result", "N/A");
        assert_eq!(parser.parse(""), vec![("result".to_string(), FieldValue::from("N/A"))]);
        assert_eq!(parser.parse("PASS"), vec![("result".to_string(), FieldValue::from("PASS"))]);
    }

    #[test]
    fn test_semester_number_parser() {
        let parser = FieldParser::semester_number("semester_number");
        assert_eq!(parser.parse("IVth Semester")[0].1, FieldValue::Integer(4));
        assert_eq!(parser.parse("Summer")[0].1, FieldValue::Integer(0));
    }

    #[test]
    fn test_outputs_match_parse() {
        let parsers = [
            FieldParser::text("a"),
            FieldParser::code_name("code", "name"),
            FieldParser::fraction("f"),
            FieldParser::integer("i"),
            FieldParser::decimal("d"),
            FieldParser::semester_number("s"),
        ];
        for parser in &parsers {
            let produced: Vec<String> = parser.parse("x").into_iter().map(|(f, _)| f).collect();
            assert_eq!(produced, parser.outputs());
        }
    }

    #[test]
    fn test_parser_serde() {
        let json = serde_json::json!({"kind": "code_name", "code": "subject_code", "name": "subject_name"});
        let parser: FieldParser = serde_json::from_value(json).unwrap();
        assert_eq!(parser, FieldParser::code_name("subject_code", "subject_name"));
    }
}
