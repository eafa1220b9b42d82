//! Built-in directive sets for the portal's student pages.

use crate::document::{TextPredicate, TextScope};
use crate::engine::{DirectiveSet, SectionSpec};
use crate::locator::{LocatorStrategy, SectionDescriptor};
use crate::records::{FieldParser, PlaceholderRule, RowSchema};

use super::source::PortalPage;

/// Sections of the continuous-evaluation results page, in report order.
pub const RESULTS_SECTIONS: [&str; 5] = [
    "sessional_exams",
    "module_tests",
    "class_projects",
    "assignments",
    "tutorials",
];

/// The end-semester section name.
pub const END_SEMESTER_SECTION: &str = "end_semester_exams";

/// The academic analysis section name.
pub const ANALYSIS_SECTION: &str = "semesters";

/// A semester label as the analysis table writes it: "1st Semester",
/// "IVth Semester". Unanchored, since rendered table text runs cells
/// together.
const SEMESTER_ROW_PATTERN: &str = r"(?:[1-8](?:st|nd|rd|th)|[iv]+(?:st|nd|rd|th))\s*semester";

/// Heading tag groups tried in order for end-semester headings.
const END_SEMESTER_TAGS: &[&[&str]] = &[&["h5"], &["h3", "h4", "h6"], &["div", "span"]];

/// The five-column "subject, semester, item, maximum, obtained" layout shared
/// by every results table.
fn marks_schema(name: &str, subject: FieldParser, item: &str, placeholder: PlaceholderRule) -> RowSchema {
    RowSchema::new(name)
        .with_min_cells(5)
        .with_column(0, subject)
        .with_column(1, FieldParser::text("semester"))
        .with_column(2, FieldParser::text(item))
        .with_column(3, FieldParser::text("maximum_marks"))
        .with_column(4, FieldParser::text("marks_obtained"))
        .with_placeholder(placeholder)
        .with_semester_column(1)
}

fn h5_section(name: &str, heading: TextPredicate, schema: RowSchema) -> SectionSpec {
    SectionSpec::new(
        SectionDescriptor::new(name).with_strategy(LocatorStrategy::heading(heading)),
        schema,
    )
}

fn no_yet() -> PlaceholderRule {
    PlaceholderRule::all_of(["No", "yet"])
}

/// The results page: sessional exams, module tests, class projects,
/// assignments and tutorials.
#[must_use]
pub fn results() -> DirectiveSet {
    DirectiveSet::new("results")
        .with_section(h5_section(
            "sessional_exams",
            TextPredicate::all_of(["sessional", "exam"]),
            marks_schema(
                "sessional_exams",
                FieldParser::code_name("subject_code", "subject_name"),
                "exam",
                no_yet(),
            ),
        ))
        .with_section(h5_section(
            "module_tests",
            TextPredicate::all_of(["module", "test"]),
            marks_schema(
                "module_tests",
                FieldParser::text("subject"),
                "exam",
                PlaceholderRule::all_of(["No module test yet"]),
            ),
        ))
        .with_section(h5_section(
            "class_projects",
            TextPredicate::all_of(["class", "project"]),
            marks_schema(
                "class_projects",
                FieldParser::text("subject"),
                "class_project",
                PlaceholderRule::all_of(["No class projects yet"]),
            ),
        ))
        .with_section(h5_section(
            "assignments",
            TextPredicate::contains("assignment"),
            marks_schema("assignments", FieldParser::text("subject"), "assignment", no_yet()),
        ))
        .with_section(h5_section(
            "tutorials",
            TextPredicate::contains("tutorial"),
            marks_schema("tutorials", FieldParser::text("subject"), "title", no_yet()),
        ))
}

/// The end-semester examination table. Headings vary between page
/// revisions, so four phrasings are tried, each against `h5`, then the other
/// heading levels, then plain containers.
#[must_use]
pub fn end_semester() -> DirectiveSet {
    let headings = [
        TextPredicate::all_of(["end semester", "exam"]),
        TextPredicate::contains("semester examination"),
        TextPredicate::all_of(["regular", "semester", "exam"]),
        TextPredicate::all_of(["b.tech", "semester", "exam"]),
    ];
    let descriptor = headings
        .iter()
        .fold(SectionDescriptor::new(END_SEMESTER_SECTION), |d, heading| {
            d.with_tag_fallbacks(heading, END_SEMESTER_TAGS, TextScope::Direct)
        });

    DirectiveSet::new("end_semester").with_section(SectionSpec::new(
        descriptor,
        marks_schema(
            END_SEMESTER_SECTION,
            FieldParser::code_name("subject_code", "subject_name"),
            "exam",
            PlaceholderRule::all_of(["No"]).with_any_of(["result", "exam"]),
        ),
    ))
}

/// The academic analysis page: one row per completed semester. The table
/// itself is the anchor: the first table holding a semester label.
///
/// Every row is a candidate, so a table without a header row keeps its
/// first semester. Rows whose first cell is not a semester label (headers,
/// totals, notes) are skipped. The result cell is optional and reads "N/A" when absent or
/// empty.
#[must_use]
pub fn academic_analysis() -> DirectiveSet {
    let schema = RowSchema::new(ANALYSIS_SECTION)
        .with_header_rows(0)
        .with_min_cells(6)
        .with_column(0, FieldParser::text("semester_name"))
        .with_column(0, FieldParser::semester_number("semester_number"))
        .with_column(1, FieldParser::fraction("attendance"))
        .with_column(2, FieldParser::decimal("sgpa"))
        .with_column(3, FieldParser::integer("earned_credit"))
        .with_column(4, FieldParser::integer("cumulative_credit"))
        .with_column(5, FieldParser::decimal("cgpa"))
        .with_optional_column(6, FieldParser::text_or("result", "N/A"))
        .with_semester_column(0)
        .requiring_semester();

    DirectiveSet::new("academic_analysis").with_section(SectionSpec::new(
        SectionDescriptor::new(ANALYSIS_SECTION).with_strategy(LocatorStrategy::new(
            ["table"],
            TextPredicate::pattern(SEMESTER_ROW_PATTERN),
        )),
        schema,
    ))
}

/// The directive set for a table-shaped page. Profile and attendance pages
/// have dedicated extractors and return `None`.
#[must_use]
pub fn for_page(page: PortalPage) -> Option<DirectiveSet> {
    match page {
        PortalPage::Results => Some(results()),
        PortalPage::EndSemester => Some(end_semester()),
        PortalPage::AcademicAnalysis => Some(academic_analysis()),
        PortalPage::Profile | PortalPage::Attendance => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_compile() {
        for page in PortalPage::ALL {
            if let Some(set) = for_page(page) {
                assert!(set.compile().is_ok(), "{page:?} preset failed to compile");
            }
        }
    }

    #[test]
    fn test_results_section_order() {
        let engine = results().compile().unwrap();
        let names: Vec<_> = engine.sections().iter().map(|s| s.name()).collect();
        assert_eq!(names, RESULTS_SECTIONS);
    }

    #[test]
    fn test_end_semester_has_twelve_strategies() {
        let set = end_semester();
        assert_eq!(set.sections[0].descriptor.strategies.len(), 12);
        assert_eq!(set.sections[0].descriptor.strategies[0].tags, ["h5"]);
        assert_eq!(set.sections[0].descriptor.strategies[2].tags, ["div", "span"]);
    }

    #[test]
    fn test_presets_survive_json() {
        let json = academic_analysis().to_json_string().unwrap();
        assert_eq!(DirectiveSet::from_json_str(&json).unwrap(), academic_analysis());
    }
}
