//! Document Locator: resolves a section descriptor to an anchor node and
//! the nearest table that follows it.

mod descriptor;

pub use descriptor::{LocatorStrategy, SectionDescriptor};

use scraper::ElementRef;
use tracing::{debug, trace};

use crate::document::{has_tag, scoped_text, Document, TextMatcher, TextScope};
use crate::errors::DescriptorError;

/// Result of locating a section in a document.
#[derive(Debug, Clone, Copy)]
pub enum Location<'a> {
    /// Anchor and table were both found.
    Found {
        /// The anchor node.
        anchor: ElementRef<'a>,
        /// The nearest following table.
        table: ElementRef<'a>,
        /// Index of the strategy that matched.
        strategy: usize,
    },
    /// The anchor was found but no table follows it.
    TableMissing {
        /// The anchor node.
        anchor: ElementRef<'a>,
        /// Index of the strategy that matched.
        strategy: usize,
    },
    /// No strategy matched any node.
    SectionMissing,
}

#[derive(Debug, Clone)]
struct CompiledStrategy {
    tags: Vec<String>,
    matcher: TextMatcher,
    scope: TextScope,
}

/// A validated, ready-to-run [`SectionDescriptor`].
#[derive(Debug, Clone)]
pub struct SectionLocator {
    name: String,
    strategies: Vec<CompiledStrategy>,
    table_tags: Vec<String>,
}

impl SectionLocator {
    /// Validates and compiles a descriptor.
    pub fn compile(descriptor: &SectionDescriptor) -> Result<Self, DescriptorError> {
        let section = descriptor.name.clone();
        if descriptor.strategies.is_empty() {
            return Err(DescriptorError::NoStrategies { section });
        }
        if descriptor.table_tags.iter().all(|t| t.trim().is_empty()) {
            return Err(DescriptorError::NoTableTags { section });
        }

        let mut strategies = Vec::with_capacity(descriptor.strategies.len());
        for (i, strategy) in descriptor.strategies.iter().enumerate() {
            let tags: Vec<String> = strategy
                .tags
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            if tags.is_empty() {
                return Err(DescriptorError::NoTags {
                    section,
                    strategy: i,
                });
            }
            if strategy.text.is_empty() {
                return Err(DescriptorError::EmptyPredicate {
                    section,
                    strategy: i,
                });
            }
            let matcher = TextMatcher::compile(&strategy.text).map_err(|source| {
                DescriptorError::InvalidPattern {
                    section: section.clone(),
                    pattern: format!("{:?}", strategy.text),
                    source,
                }
            })?;
            strategies.push(CompiledStrategy {
                tags,
                matcher,
                scope: strategy.scope,
            });
        }

        Ok(Self {
            name: descriptor.name.clone(),
            strategies,
            table_tags: descriptor
                .table_tags
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .collect(),
        })
    }

    /// The section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finds the anchor: the first node in document order matching the
    /// first strategy that matches anything.
    #[must_use]
    pub fn find_anchor<'a>(&self, doc: &'a Document) -> Option<(usize, ElementRef<'a>)> {
        self.strategies.iter().enumerate().find_map(|(i, s)| {
            trace!(section = %self.name, strategy = i, tags = ?s.tags, "Trying locator strategy");
            doc.find_first(&s.tags, |el| s.matcher.matches(&scoped_text(el, s.scope)))
                .map(|el| (i, el))
        })
    }

    /// Locates the anchor and the nearest following table. An anchor that
    /// is itself a table is its own table.
    #[must_use]
    pub fn locate<'a>(&self, doc: &'a Document) -> Location<'a> {
        let Some((strategy, anchor)) = self.find_anchor(doc) else {
            debug!(section = %self.name, "Section not found");
            return Location::SectionMissing;
        };

        let table = if has_tag(anchor, &self.table_tags) {
            Some(anchor)
        } else {
            doc.find_following(anchor, &self.table_tags)
        };
        match table {
            Some(table) => {
                debug!(section = %self.name, strategy, "Found section table");
                Location::Found {
                    anchor,
                    table,
                    strategy,
                }
            }
            None => {
                debug!(section = %self.name, strategy, "Section has no following table");
                Location::TableMissing { anchor, strategy }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{rendered_text, TextPredicate};

    fn sessional() -> SectionLocator {
        SectionLocator::compile(
            &SectionDescriptor::new("sessional_exams")
                .with_strategy(LocatorStrategy::heading(TextPredicate::all_of([
                    "sessional",
                    "exam",
                ]))),
        )
        .unwrap()
    }

    #[test]
    fn test_locate_found() {
        let doc = Document::parse(
            "<h5>Sessional   Exams</h5><div><table><tr><td>x</td></tr></table></div>",
        );
        match sessional().locate(&doc) {
            Location::Found { anchor, table, strategy } => {
                assert_eq!(rendered_text(anchor), "Sessional Exams");
                assert_eq!(table.value().name(), "table");
                assert_eq!(strategy, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_locate_section_missing() {
        let doc = Document::parse("<h5>Tutorials</h5><table></table>");
        assert!(matches!(sessional().locate(&doc), Location::SectionMissing));
    }

    #[test]
    fn test_locate_table_missing() {
        let doc = Document::parse("<table></table><h5>Sessional Exam</h5><p>none</p>");
        assert!(matches!(
            sessional().locate(&doc),
            Location::TableMissing { .. }
        ));
    }

    #[test]
    fn test_first_anchor_in_document_order_wins() {
        let doc = Document::parse(
            "<h5 id='first'>Sessional Exam</h5><table id='t1'></table>\
             <h5 id='second'>Sessional Exam</h5><table id='t2'></table>",
        );
        match sessional().locate(&doc) {
            Location::Found { anchor, table, .. } => {
                assert_eq!(anchor.value().attr("id"), Some("first"));
                assert_eq!(table.value().attr("id"), Some("t1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_earlier_strategy_preferred_over_earlier_node() {
        let descriptor = SectionDescriptor::new("end_semester_exams")
            .with_strategy(LocatorStrategy::heading(TextPredicate::contains(
                "end semester",
            )))
            .with_strategy(LocatorStrategy::new(["div"], TextPredicate::contains("semester")));
        let locator = SectionLocator::compile(&descriptor).unwrap();
        let doc = Document::parse(
            "<div>Semester info</div><table id='a'></table>\
             <h5>End Semester Exam</h5><table id='b'></table>",
        );
        match locator.locate(&doc) {
            Location::Found { table, strategy, .. } => {
                assert_eq!(strategy, 0);
                assert_eq!(table.value().attr("id"), Some("b"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fallback_strategy_used_when_first_fails() {
        let descriptor = SectionDescriptor::new("end_semester_exams")
            .with_strategy(LocatorStrategy::heading(TextPredicate::contains(
                "end semester",
            )))
            .with_strategy(
                LocatorStrategy::new(["div", "span"], TextPredicate::contains("end semester"))
                    .with_scope(TextScope::Direct),
            );
        let locator = SectionLocator::compile(&descriptor).unwrap();
        let doc = Document::parse(
            "<div id='page'><span>End Semester Exam</span><table id='t'></table></div>",
        );
        match locator.locate(&doc) {
            Location::Found { anchor, strategy, .. } => {
                assert_eq!(strategy, 1);
                assert_eq!(anchor.value().name(), "span");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_table_anchor_is_its_own_table() {
        let descriptor = SectionDescriptor::new("semesters").with_strategy(LocatorStrategy::new(
            ["table"],
            TextPredicate::contains("sgpa"),
        ));
        let locator = SectionLocator::compile(&descriptor).unwrap();
        let doc = Document::parse(
            "<table id='nav'><tr><td>Home</td></tr></table>\
             <table id='grades'><tr><th>Semester</th><th>SGPA</th></tr></table>\
             <table id='after'></table>",
        );
        match locator.locate(&doc) {
            Location::Found { anchor, table, .. } => {
                assert_eq!(anchor.value().attr("id"), Some("grades"));
                assert_eq!(table.value().attr("id"), Some("grades"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_compile_rejects_empty_strategies() {
        let err = SectionLocator::compile(&SectionDescriptor::new("x")).unwrap_err();
        assert!(matches!(err, DescriptorError::NoStrategies { .. }));
    }

    #[test]
    fn test_compile_rejects_empty_tags_and_predicates() {
        let no_tags = SectionDescriptor::new("x")
            .with_strategy(LocatorStrategy::new(Vec::<String>::new(), TextPredicate::contains("a")));
        assert!(matches!(
            SectionLocator::compile(&no_tags).unwrap_err(),
            DescriptorError::NoTags { strategy: 0, .. }
        ));

        let empty = SectionDescriptor::new("x")
            .with_strategy(LocatorStrategy::heading(TextPredicate::contains("  ")));
        assert!(matches!(
            SectionLocator::compile(&empty).unwrap_err(),
            DescriptorError::EmptyPredicate { .. }
        ));
    }

    #[test]
    fn test_compile_rejects_bad_pattern() {
        let bad = SectionDescriptor::new("x")
            .with_strategy(LocatorStrategy::heading(TextPredicate::pattern("[unclosed")));
        assert!(matches!(
            SectionLocator::compile(&bad).unwrap_err(),
            DescriptorError::InvalidPattern { .. }
        ));
    }
}
