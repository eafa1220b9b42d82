//! Attendance matrix extraction.
//!
//! The attendance page is column-oriented: a single `table.items` whose
//! header cells name the subjects and whose one data row holds the student's
//! identity, one "present/total (percent%)" cell per subject, then the total
//! hours and the overall percentage.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{descendant_elements, has_class, rendered_text, Document};
use crate::records::{parse_decimal, parse_fraction, Fraction};

static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").expect("valid hours regex"));

/// Leading identity cells: register number, roll number, name.
const IDENTITY_CELLS: usize = 3;
/// Trailing total cells: hours, percentage.
const TOTAL_CELLS: usize = 2;

/// Attendance for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAttendance {
    /// Subject code from the header row.
    pub subject_code: String,
    /// Hours attended out of hours held.
    pub attendance: Fraction,
}

/// The attendance page for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// University register number.
    pub university_reg_no: String,
    /// Class roll number.
    pub roll_no: String,
    /// Student name.
    pub name: String,
    /// Per-subject attendance, in column order.
    pub subjects: Vec<SubjectAttendance>,
    /// Hours attended across all subjects.
    pub total_present_hours: u32,
    /// Hours held across all subjects.
    pub total_hours: u32,
    /// Overall percentage.
    pub total_percentage: f64,
}

impl AttendanceReport {
    /// Looks up a subject by code.
    #[must_use]
    pub fn subject(&self, code: &str) -> Option<&Fraction> {
        self.subjects
            .iter()
            .find(|s| s.subject_code == code)
            .map(|s| &s.attendance)
    }
}

/// Extracts the attendance matrix. Returns `None` when the page has no
/// `table.items` or the table has too few cells to hold identity and totals.
#[must_use]
pub fn extract_attendance(doc: &Document) -> Option<AttendanceReport> {
    let table_tag = ["table".to_string()];
    let Some(table) = doc.find_first(&table_tag, |el| has_class(el, "items")) else {
        debug!("Attendance table not found");
        return None;
    };

    let headers: Vec<String> = descendant_elements(table, &["th".to_string()])
        .map(rendered_text)
        .collect();
    let cells: Vec<String> = descendant_elements(table, &["td".to_string()])
        .map(rendered_text)
        .collect();

    if cells.len() < IDENTITY_CELLS + TOTAL_CELLS {
        debug!(cells = cells.len(), "Attendance table too short");
        return None;
    }

    let subject_end = cells.len() - TOTAL_CELLS;
    let subjects = (IDENTITY_CELLS..subject_end)
        .map(|i| SubjectAttendance {
            subject_code: headers.get(i).cloned().unwrap_or_else(|| format!("column_{i}")),
            attendance: parse_fraction(&cells[i]),
        })
        .collect();

    let (total_present_hours, total_hours) = HOURS_RE
        .captures(&cells[subject_end])
        .map_or((0, 0), |caps| {
            (caps[1].parse().unwrap_or(0), caps[2].parse().unwrap_or(0))
        });

    Some(AttendanceReport {
        university_reg_no: cells[0].clone(),
        roll_no: cells[1].clone(),
        name: cells[2].clone(),
        subjects,
        total_present_hours,
        total_hours,
        total_percentage: parse_decimal(&cells[subject_end + 1]),
    })
}
