//! Test assertions for extraction outcomes.

use crate::engine::ExtractionOutcome;
use crate::records::TypedRecord;

/// Asserts that the section's table was found and returns its records.
pub fn assert_found(outcome: &ExtractionOutcome) -> &[TypedRecord] {
    assert!(
        outcome.is_found(),
        "Expected a found section, got status: {}",
        outcome.status()
    );
    outcome.records()
}

/// Asserts that no anchor matched.
pub fn assert_section_missing(outcome: &ExtractionOutcome) {
    assert_eq!(
        outcome,
        &ExtractionOutcome::SectionMissing,
        "Expected section_missing, got status: {}",
        outcome.status()
    );
}

/// Asserts that an anchor matched but had no table after it.
pub fn assert_table_missing(outcome: &ExtractionOutcome) {
    assert_eq!(
        outcome,
        &ExtractionOutcome::TableMissing,
        "Expected table_missing, got status: {}",
        outcome.status()
    );
}

/// Asserts that the outcome is found with exactly `expected` records.
pub fn assert_record_count(outcome: &ExtractionOutcome, expected: usize) {
    let records = assert_found(outcome);
    assert_eq!(
        records.len(),
        expected,
        "Expected {} records, got {}: {:?}",
        expected,
        records.len(),
        records
    );
}
