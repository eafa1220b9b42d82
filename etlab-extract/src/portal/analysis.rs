//! Figures printed as labelled text rather than in the academic analysis
//! table: page-wide totals, and per-semester blocks for layouts without a
//! semester table.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{descendant_elements, has_tag, rendered_text, Document};
use crate::records::{parse_fraction, FieldValue, TypedRecord};
use crate::semester::semester_number;

static CGPA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CGPA:\s*([0-9]+(?:\.[0-9]+)?)").expect("valid cgpa regex"));
static CREDIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Cumulative Credit:\s*(\d+)").expect("valid credit regex"));
static TOTAL_BACKLOGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Total Backlogs[:\s]*(\d+)").expect("valid backlog regex"));
static CURRENT_BACKLOGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Current Backlogs[:\s]*(\d+)").expect("valid backlog regex"));

static BLOCK_SEMESTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[1-8](?:st|nd|rd|th)|[iv]+(?:st|nd|rd|th))\s+semester")
        .expect("valid semester label regex")
});
static BLOCK_ATTENDANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Attendance:\s*(\d+\s*/\s*\d+\s*\(\s*\d+(?:\.\d+)?\s*%\s*\))")
        .expect("valid attendance regex")
});
static BLOCK_SGPA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SGPA:\s*([0-9]+(?:\.[0-9]+)?)").expect("valid sgpa regex"));
static BLOCK_CGPA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CGPA:\s*([0-9]+(?:\.[0-9]+)?)").expect("valid cgpa regex"));
static BLOCK_EARNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Earned Credit:\s*(\d+)").expect("valid credit regex"));
static BLOCK_CUMULATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Cumulative Credit:\s*(\d+)").expect("valid credit regex"));
static BLOCK_RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Result:\s*(\w+)").expect("valid result regex"));

/// Overall figures; each is `None` when the page does not print it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Latest cumulative grade point average.
    pub overall_cgpa: Option<f64>,
    /// Credits earned so far.
    pub overall_cumulative_credit: Option<u32>,
    /// Courses failed at any point.
    pub total_backlogs: Option<u32>,
    /// Courses still outstanding.
    pub current_backlogs: Option<u32>,
}

fn capture<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text).and_then(|caps| caps[1].parse().ok())
}

/// Reads the first "CGPA: x", "Cumulative Credit: n" and backlog counts in
/// the page text. Labels are case-sensitive except for backlogs.
#[must_use]
pub fn extract_summary(doc: &Document) -> AnalysisSummary {
    let text = rendered_text(doc.html().root_element());
    AnalysisSummary {
        overall_cgpa: capture(&CGPA_RE, &text),
        overall_cumulative_credit: capture(&CREDIT_RE, &text),
        total_backlogs: capture(&TOTAL_BACKLOGS_RE, &text),
        current_backlogs: capture(&CURRENT_BACKLOGS_RE, &text),
    }
}

/// Reads semester records from `div` blocks that print their figures as
/// labelled text ("1st Semester Attendance: 435/450 (97%) SGPA: 8.5 ...").
///
/// Only the innermost `div` holding a semester label is read, so wrappers
/// around several blocks yield nothing themselves. A block is kept when it
/// carries at least one figure besides its label. Fields follow the table
/// layout's order and names; figures a block does not print are left out.
#[must_use]
pub fn extract_semester_blocks(doc: &Document) -> Vec<TypedRecord> {
    let div = ["div".to_string()];
    doc.elements()
        .filter(|el| has_tag(*el, &div))
        .filter(|el| {
            !descendant_elements(*el, &div)
                .any(|inner| BLOCK_SEMESTER_RE.is_match(&rendered_text(inner)))
        })
        .filter_map(|el| semester_block(&rendered_text(el)))
        .collect()
}

fn semester_block(text: &str) -> Option<TypedRecord> {
    let label = BLOCK_SEMESTER_RE.find(text)?.as_str().to_string();
    let semester = semester_number(&label)?;

    let mut record = TypedRecord::new();
    record.insert("semester_name", FieldValue::Text(label.clone()));
    record.insert("semester_number", FieldValue::Integer(i64::from(semester.get())));

    let mut figures = 0;
    let mut put = |field: &str, value: Option<FieldValue>| {
        if let Some(value) = value {
            record.insert(field, value);
            figures += 1;
        }
    };
    put(
        "attendance",
        BLOCK_ATTENDANCE_RE
            .captures(text)
            .map(|caps| FieldValue::Fraction(parse_fraction(&caps[1]))),
    );
    put("sgpa", capture(&BLOCK_SGPA_RE, text).map(FieldValue::Decimal));
    put("earned_credit", capture(&BLOCK_EARNED_RE, text).map(FieldValue::Integer));
    put("cumulative_credit", capture(&BLOCK_CUMULATIVE_RE, text).map(FieldValue::Integer));
    put("cgpa", capture(&BLOCK_CGPA_RE, text).map(FieldValue::Decimal));
    put(
        "result",
        BLOCK_RESULT_RE
            .captures(text)
            .map(|caps| FieldValue::Text(caps[1].to_string())),
    );

    if figures == 0 {
        return None;
    }
    record.set_semester(Some(label), Some(semester));
    Some(record)
}
