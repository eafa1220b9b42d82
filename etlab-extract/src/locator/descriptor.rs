//! Section descriptor configuration types.

use serde::{Deserialize, Serialize};

use crate::document::{TextPredicate, TextScope};

/// One way of recognising a section's anchor node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorStrategy {
    /// Acceptable tag names for the anchor.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    /// Predicate over the anchor's text.
    pub text: TextPredicate,
    /// Which of the anchor's text the predicate sees.
    #[serde(default)]
    pub scope: TextScope,
}

fn default_tags() -> Vec<String> {
    vec!["h5".to_string()]
}

impl LocatorStrategy {
    /// Creates a strategy over the given tags.
    #[must_use]
    pub fn new<I, S>(tags: I, text: TextPredicate) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            text,
            scope: TextScope::default(),
        }
    }

    /// A strategy over the portal's section heading tag (`h5`).
    #[must_use]
    pub fn heading(text: TextPredicate) -> Self {
        Self {
            tags: default_tags(),
            text,
            scope: TextScope::default(),
        }
    }

    /// Sets the text scope.
    #[must_use]
    pub fn with_scope(mut self, scope: TextScope) -> Self {
        self.scope = scope;
        self
    }
}

/// How to find a logical section and its data table.
///
/// Strategies are tried in declared order and the first one that matches
/// wins, so precise heading matches belong first and generic container
/// matches last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    /// Section name, used in logs and reports.
    pub name: String,
    /// Ordered anchor strategies.
    #[serde(default)]
    pub strategies: Vec<LocatorStrategy>,
    /// Tag names that count as the section's table.
    #[serde(default = "default_table_tags")]
    pub table_tags: Vec<String>,
}

fn default_table_tags() -> Vec<String> {
    vec!["table".to_string()]
}

impl SectionDescriptor {
    /// Creates a descriptor with no strategies.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategies: Vec::new(),
            table_tags: default_table_tags(),
        }
    }

    /// Appends a strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: LocatorStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Appends one strategy per tag group, all sharing one predicate.
    #[must_use]
    pub fn with_tag_fallbacks(
        mut self,
        text: &TextPredicate,
        groups: &[&[&str]],
        scope: TextScope,
    ) -> Self {
        for group in groups {
            self.strategies.push(
                LocatorStrategy::new(group.iter().copied(), text.clone()).with_scope(scope),
            );
        }
        self
    }

    /// Replaces the table tag names.
    #[must_use]
    pub fn with_table_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
