//! Portal layer: built-in directive sets and page-specific extractors for
//! the student pages, report assembly, and the page-source contract.

mod analysis;
mod attendance;
mod links;
pub mod presets;
mod profile;
mod report;
mod source;


pub use analysis::{extract_semester_blocks, extract_summary, AnalysisSummary};
pub use attendance::{extract_attendance, AttendanceReport, SubjectAttendance};
pub use links::{find_result_links, ResultLink};
pub use profile::{extract_profile, profile_fields, FieldDescriptor, FieldExtractor, ProfileRecord};
pub use report::ResultsReport;
pub use source::{
    is_login_page, load_document, PageSource, PortalPage, SessionToken, StaticPageSource,
    DEFAULT_ATTENDANCE_SEMESTER,
};

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::document::Document;
use crate::engine::{DirectiveSet, ExtractionOutcome};
use crate::errors::ExtractResult;
use crate::semester::Semester;

/// Attached to attendance bodies: the portal only lists the current
/// semester's subjects.
pub const ATTENDANCE_NOTE: &str = "Attendance page displays current semester subjects only";

/// Extracts one page into its JSON response body.
///
/// Table-shaped pages run their preset and become a [`ResultsReport`]. The
/// profile and attendance pages use their own extractors. Attendance ignores
/// `requested`: the portal only shows the current semester, and the body
/// carries a `note` saying so.
///
/// An academic analysis page without a semester table is read from its
/// labelled-text semester blocks instead.
pub fn extract_page(page: PortalPage, doc: &Document, requested: Option<Semester>) -> ExtractResult<Value> {
    let body = match page {
        PortalPage::Results => table_report(page, &presets::results(), doc, requested)?.to_json(),
        PortalPage::EndSemester => table_report(page, &presets::end_semester(), doc, requested)?
            .with_extra("available_links", find_result_links(doc))
            .to_json(),
        PortalPage::AcademicAnalysis => {
            let directives = presets::academic_analysis();
            let mut report = table_report(page, &directives, doc, requested)?;
            fill_semester_blocks(&mut report, doc, &directives, requested);
            report.with_extra("overall_stats", extract_summary(doc)).to_json()
        }
        PortalPage::Profile => serde_json::to_value(extract_profile(doc)?)?,
        PortalPage::Attendance => match extract_attendance(doc) {
            Some(report) => {
                let mut body = serde_json::to_value(report)?;
                if let Value::Object(map) = &mut body {
                    map.insert("note".to_string(), json!(ATTENDANCE_NOTE));
                }
                body
            }
            None => json!({ "message": "Attendance table not found" }),
        },
    };
    Ok(body)
}

fn table_report(
    page: PortalPage,
    directives: &DirectiveSet,
    doc: &Document,
    requested: Option<Semester>,
) -> ExtractResult<ResultsReport> {
    let outcomes = directives.compile()?.extract_all(doc, requested);
    let report = ResultsReport::new(page.as_str(), requested, outcomes);
    info!(
        page = %page,
        run_id = %report.run_id,
        records = report.total_records(),
        "Page report assembled"
    );
    Ok(report)
}

fn fill_semester_blocks(
    report: &mut ResultsReport,
    doc: &Document,
    directives: &DirectiveSet,
    requested: Option<Semester>,
) {
    let Some(section) = report
        .sections
        .iter_mut()
        .find(|s| s.section == presets::ANALYSIS_SECTION && s.outcome.is_missing())
    else {
        return;
    };
    let blocks = extract_semester_blocks(doc);
    if blocks.is_empty() {
        return;
    }
    debug!(blocks = blocks.len(), "No semester table; reading labelled semester blocks");
    section.outcome =
        ExtractionOutcome::Found(blocks).filter_semester(requested, directives.match_mode);
}

/// Fetches a page through `source` and extracts it.
pub fn fetch_page<S>(
    source: &S,
    page: PortalPage,
    requested: Option<Semester>,
    token: &SessionToken,
) -> ExtractResult<Value>
where
    S: PageSource + ?Sized,
{
    let doc = load_document(source, page, requested, token)?;
    extract_page(page, &doc, requested)
}
