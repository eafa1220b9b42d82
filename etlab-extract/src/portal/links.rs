//! "View result" links next to end-semester examinations.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::document::{direct_text, fold, rendered_text, Document};

const CONTEXT_CHARS: usize = 200;
const CONTEXT_MARKERS: [&str; 4] = ["semester examination", "end semester", "regular", "b.tech"];

/// A link or button that opens a published result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLink {
    /// The link's own text.
    pub text: String,
    /// `href` attribute, empty when absent.
    pub href: String,
    /// `onclick` attribute, empty when absent.
    pub onclick: String,
    /// Folded text of the enclosing element, truncated.
    pub context: String,
}

fn candidates<'a>(doc: &'a Document, tag: &'a str) -> Vec<ElementRef<'a>> {
    doc.elements()
        .filter(|el| el.value().name() == tag && fold(&direct_text(*el)).contains("view result"))
        .collect()
}

fn context(el: ElementRef<'_>) -> String {
    let text = el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .map(|a| fold(&rendered_text(a)))
        .find(|t| !t.is_empty())
        .unwrap_or_default();
    text.chars().take(CONTEXT_CHARS).collect()
}

/// Finds "View Result" anchors, falling back to buttons when the page has no
/// such anchor, and keeps those whose surroundings mention a semester
/// examination.
#[must_use]
pub fn find_result_links(doc: &Document) -> Vec<ResultLink> {
    let mut found = candidates(doc, "a");
    if found.is_empty() {
        found = candidates(doc, "button");
    }

    found
        .into_iter()
        .filter_map(|el| {
            let context = context(el);
            CONTEXT_MARKERS
                .iter()
                .any(|m| context.contains(m))
                .then(|| ResultLink {
                    text: rendered_text(el),
                    href: el.value().attr("href").unwrap_or_default().to_string(),
                    onclick: el.value().attr("onclick").unwrap_or_default().to_string(),
                    context,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_with_semester_context() {
        let doc = Document::parse(
            "<div>B.Tech S5 Regular Semester Examination <a href='/r/5'>View Result</a></div>\
             <div>Library fine <a href='/fine'>View Result</a></div>",
        );
        let links = find_result_links(&doc);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "/r/5");
        assert_eq!(links[0].text, "View Result");
        assert!(links[0].context.starts_with("b.tech s5 regular"));
    }

    #[test]
    fn test_button_fallback() {
        let doc = Document::parse(
            "<p>End Semester Exam <button onclick='show(3)'>View Results</button></p>",
        );
        let links = find_result_links(&doc);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].onclick, "show(3)");
        assert!(links[0].href.is_empty());
    }
}
