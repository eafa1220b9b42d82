//! Read-only document tree over parsed portal markup.
//!
//! This module provides:
//! - [`Document`], a thin wrapper over `scraper::Html` with document-order
//!   traversal
//! - Whitespace and case normalization helpers
//! - Declarative text predicates used by the section locator

mod predicate;
mod text;

pub use predicate::{TextMatcher, TextPredicate};
pub use text::{fold, normalize_ws};

use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

/// Which text of a node a predicate is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextScope {
    /// All descendant text, concatenated.
    #[default]
    Rendered,
    /// Only the node's own text children. A node whose sole child is an
    /// element defers to that child.
    ///
    /// A node with its own text still matches when it also has child
    /// elements, e.g. `<span>Regular Exam <a>View</a></span>` reads as
    /// "Regular Exam". This is more lenient than matching only nodes whose
    /// entire content is a single string.
    Direct,
}

/// A parsed markup document.
///
/// The tree is immutable once parsed; every extraction call only reads it.
pub struct Document {
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("title", &self.title())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Parses a full HTML document.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Parses raw bytes, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// The underlying `scraper` tree.
    #[must_use]
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// All elements in document order (pre-order, parents before children).
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }

    /// The first element in document order whose tag is in `tags` and that
    /// satisfies `pred`.
    pub fn find_first<'a, F>(&'a self, tags: &[String], mut pred: F) -> Option<ElementRef<'a>>
    where
        F: FnMut(ElementRef<'a>) -> bool,
    {
        self.elements()
            .find(|el| has_tag(*el, tags) && pred(*el))
    }

    /// The nearest element strictly after `anchor` in document order whose
    /// tag is in `tags`. Descendants of the anchor count as following it.
    #[must_use]
    pub fn find_following<'a>(
        &'a self,
        anchor: ElementRef<'a>,
        tags: &[String],
    ) -> Option<ElementRef<'a>> {
        let anchor_id = anchor.id();
        self.elements()
            .skip_while(|el| el.id() != anchor_id)
            .skip(1)
            .find(|el| has_tag(*el, tags))
    }

    /// The text of the `<title>` element, normalized.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.elements()
            .find(|el| el.value().name() == "title")
            .map(rendered_text)
    }
}

/// Whether the element's tag name is one of `tags` (case-insensitive).
#[must_use]
pub fn has_tag(el: ElementRef<'_>, tags: &[String]) -> bool {
    let name = el.value().name();
    tags.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Whether the element carries the given class (case-insensitive).
#[must_use]
pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c.eq_ignore_ascii_case(class))
}

/// All descendant text of the element, whitespace-normalized.
#[must_use]
pub fn rendered_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// The element's own text children, whitespace-normalized.
#[must_use]
pub fn direct_text(el: ElementRef<'_>) -> String {
    let mut own = String::new();
    let mut child_elements = Vec::new();
    for child in el.children() {
        match child.value() {
            Node::Text(t) => own.push_str(&t.text),
            Node::Element(_) => child_elements.extend(ElementRef::wrap(child)),
            _ => {}
        }
    }
    let own = normalize_ws(&own);
    if own.is_empty() && child_elements.len() == 1 {
        return direct_text(child_elements[0]);
    }
    own
}

/// The element's text under the given scope.
#[must_use]
pub fn scoped_text(el: ElementRef<'_>, scope: TextScope) -> String {
    match scope {
        TextScope::Rendered => rendered_text(el),
        TextScope::Direct => direct_text(el),
    }
}

/// Direct child elements with one of the given tag names.
pub fn child_elements<'a>(
    el: ElementRef<'a>,
    tags: &'a [String],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |c| has_tag(*c, tags))
}

/// Descendant elements (excluding `el`) with one of the given tag names,
/// in document order.
pub fn descendant_elements<'a>(
    el: ElementRef<'a>,
    tags: &'a [String],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |c| has_tag(*c, tags))
}
