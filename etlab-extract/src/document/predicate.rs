//! Declarative text predicates and their compiled matchers.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::text::fold;

/// A case-insensitive test over a node's normalized text.
///
/// Only [`TextPredicate::Exact`] refuses partial overlap; the other variants
/// opt into substring or pattern matching explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TextPredicate {
    /// The whole text equals the value.
    Exact(String),
    /// The text contains the value.
    Contains(String),
    /// The text contains every value.
    AllOf(Vec<String>),
    /// The text contains at least one value.
    AnyOf(Vec<String>),
    /// The text matches a regular expression somewhere.
    Pattern(String),
}

impl TextPredicate {
    /// Whole-text equality.
    #[must_use]
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }

    /// Substring containment.
    #[must_use]
    pub fn contains(value: impl Into<String>) -> Self {
        Self::Contains(value.into())
    }

    /// Containment of every listed substring.
    #[must_use]
    pub fn all_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllOf(values.into_iter().map(Into::into).collect())
    }

    /// Containment of at least one listed substring.
    #[must_use]
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Regular expression match.
    #[must_use]
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern(source.into())
    }

    /// Whether the predicate has nothing to compare against.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Exact(v) | Self::Contains(v) | Self::Pattern(v) => v.trim().is_empty(),
            Self::AllOf(vs) | Self::AnyOf(vs) => vs.iter().all(|v| v.trim().is_empty()),
        }
    }
}

/// A compiled [`TextPredicate`].
#[derive(Debug, Clone)]
pub enum TextMatcher {
    /// Folded whole-text value.
    Exact(String),
    /// Folded needles that must all appear.
    All(Vec<String>),
    /// Folded needles of which one must appear.
    Any(Vec<String>),
    /// Case-insensitive regex.
    Pattern(Regex),
}

impl TextMatcher {
    /// Compiles a predicate. Blank needles are dropped.
    pub fn compile(predicate: &TextPredicate) -> Result<Self, regex::Error> {
        let folded = |values: &[String]| -> Vec<String> {
            values
                .iter()
                .map(|v| fold(v))
                .filter(|v| !v.is_empty())
                .collect()
        };

        Ok(match predicate {
            TextPredicate::Exact(v) => Self::Exact(fold(v)),
            TextPredicate::Contains(v) => Self::All(folded(std::slice::from_ref(v))),
            TextPredicate::AllOf(vs) => Self::All(folded(vs)),
            TextPredicate::AnyOf(vs) => Self::Any(folded(vs)),
            TextPredicate::Pattern(source) => Self::Pattern(
                RegexBuilder::new(source).case_insensitive(true).build()?,
            ),
        })
    }

    /// Tests the text. Whitespace and case are normalized first.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let text = fold(text);
        if text.is_empty() {
            return false;
        }
        match self {
            Self::Exact(v) => text == *v,
            Self::All(needles) => needles.iter().all(|n| text.contains(n.as_str())),
            Self::Any(needles) => needles.iter().any(|n| text.contains(n.as_str())),
            Self::Pattern(re) => re.is_match(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(p: TextPredicate) -> TextMatcher {
        TextMatcher::compile(&p).unwrap()
    }

    #[test]
    fn test_exact_rejects_partial_overlap() {
        let m = compiled(TextPredicate::exact("Name"));
        assert!(m.matches("  name "));
        assert!(!m.matches("Father's Name"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let m = compiled(TextPredicate::contains("Tutorial"));
        assert!(m.matches("TUTORIALS"));
    }

    #[test]
    fn test_all_of_tolerates_spacing() {
        let m = compiled(TextPredicate::all_of(["sessional", "exam"]));
        assert!(m.matches("Sessional\n      Exams"));
        assert!(!m.matches("Sessional"));
    }

    #[test]
    fn test_any_of() {
        let m = compiled(TextPredicate::any_of(["result", "exam"]));
        assert!(m.matches("No exam"));
        assert!(!m.matches("No data"));
    }

    #[test]
    fn test_pattern_matches_normalized_text() {
        let m = compiled(TextPredicate::pattern(r"end semester\s+exam"));
        assert!(m.matches("End   Semester Exams"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(TextMatcher::compile(&TextPredicate::pattern("(")).is_err());
    }

    #[test]
    fn test_empty_text_never_matches() {
        let m = compiled(TextPredicate::pattern(".*"));
        assert!(!m.matches("   "));
    }

    #[test]
    fn test_is_empty() {
        assert!(TextPredicate::contains(" ").is_empty());
        assert!(TextPredicate::all_of(Vec::<String>::new()).is_empty());
        assert!(!TextPredicate::any_of(["", "x"]).is_empty());
    }

    #[test]
    fn test_predicate_serde() {
        let p = TextPredicate::all_of(["module", "test"]);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "all_of", "value": ["module", "test"]}));
        let back: TextPredicate = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
