//! Semester Normalizer.
//!
//! Portal pages label semesters in free text ("3rd Semester", "IIIrd
//! Semester", "Third Semester", "S3"). This module decides whether such a
//! label denotes a requested semester, and recovers the canonical number a
//! label denotes.
//!
//! Two match modes exist. [`MatchMode::Substring`] is the default and
//! reproduces the portal client's long-standing behavior: the requested
//! semester's digit or any of its variants appearing anywhere in the label is
//! a match, so "11th" satisfies a request for 1. [`MatchMode::ExactToken`]
//! compares whole tokens instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SemesterError;

/// A semester number in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Semester(u8);

impl Semester {
    /// The lowest semester number.
    pub const FIRST: u8 = 1;
    /// The highest semester number.
    pub const LAST: u8 = 8;

    /// Validates a semester number.
    pub fn new(n: i64) -> Result<Self, SemesterError> {
        match u8::try_from(n) {
            Ok(v) if (Self::FIRST..=Self::LAST).contains(&v) => Ok(Self(v)),
            _ => Err(SemesterError::OutOfRange(n)),
        }
    }

    /// The semester number.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Accepted textual variants, lowercase: cardinal word, ordinal suffix,
    /// Roman numeral, bare digit.
    #[must_use]
    pub fn variants(self) -> [&'static str; 4] {
        VARIANTS[usize::from(self.0 - 1)]
    }

    /// Iterates over all semesters in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::FIRST..=Self::LAST).map(Self)
    }
}

impl TryFrom<i64> for Semester {
    type Error = SemesterError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Semester> for u8 {
    fn from(s: Semester) -> Self {
        s.0
    }
}

impl FromStr for Semester {
    type Err = SemesterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| SemesterError::NotANumber(s.to_string()))?;
        Self::new(n)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const VARIANTS: [[&str; 4]; 8] = [
    ["first", "1st", "i", "1"],
    ["second", "2nd", "ii", "2"],
    ["third", "3rd", "iii", "3"],
    ["fourth", "4th", "iv", "4"],
    ["fifth", "5th", "v", "5"],
    ["sixth", "6th", "vi", "6"],
    ["seventh", "7th", "vii", "7"],
    ["eighth", "8th", "viii", "8"],
];

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

/// How a label is compared against a requested semester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring containment of the digit or any variant.
    #[default]
    Substring,
    /// A whole token of the label must denote the requested semester.
    ExactToken,
}

/// Whether `label` denotes the requested semester, in the default
/// [`MatchMode::Substring`] mode. `None` accepts every label.
#[must_use]
pub fn matches(label: &str, requested: Option<Semester>) -> bool {
    matches_with(label, requested, MatchMode::Substring)
}

/// Whether `label` denotes the requested semester under `mode`.
#[must_use]
pub fn matches_with(label: &str, requested: Option<Semester>, mode: MatchMode) -> bool {
    let Some(requested) = requested else {
        return true;
    };
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        return false;
    }

    match mode {
        MatchMode::Substring => {
            label.contains(&requested.to_string())
                || requested.variants().iter().any(|v| label.contains(v))
        }
        MatchMode::ExactToken => tokens(&label).any(|t| token_semester(t) == Some(requested)),
    }
}

/// The semester a label denotes: the first token that reads as a semester
/// number in `1..=8`.
#[must_use]
pub fn semester_number(label: &str) -> Option<Semester> {
    let label = label.to_lowercase();
    let found = tokens(&label).find_map(token_semester);
    found
}

fn tokens(label: &str) -> impl Iterator<Item = &str> {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

/// Reads one lowercase token: "3", "3rd", "third", "iii", "iiird", "s3",
/// "sem3".
fn token_semester(token: &str) -> Option<Semester> {
    if let Some(pos) = VARIANTS.iter().position(|v| v[0] == token) {
        return semester_at(pos);
    }

    let stem = ORDINAL_SUFFIXES
        .iter()
        .find_map(|s| token.strip_suffix(s).filter(|stem| !stem.is_empty()))
        .unwrap_or(token);

    if let Some(pos) = VARIANTS.iter().position(|v| v[2] == stem) {
        return semester_at(pos);
    }

    let digits = stem
        .strip_prefix("sem")
        .or_else(|| stem.strip_prefix('s'))
        .filter(|d| !d.is_empty())
        .unwrap_or(stem);
    if digits.chars().all(|c| c.is_ascii_digit()) {
        return digits.parse::<i64>().ok().and_then(|n| Semester::new(n).ok());
    }
    None
}

fn semester_at(pos: usize) -> Option<Semester> {
    i64::try_from(pos + 1).ok().and_then(|n| Semester::new(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sem(n: i64) -> Option<Semester> {
        Some(Semester::new(n).unwrap())
    }

    #[test]
    fn test_wildcard_accepts_everything() {
        for label in ["", "IIIrd Semester", "garbage", "11th"] {
            assert!(matches(label, None));
            assert!(matches_with(label, None, MatchMode::ExactToken));
        }
    }

    #[test]
    fn test_empty_label_never_matches_request() {
        assert!(!matches("", sem(3)));
        assert!(!matches("   ", sem(3)));
    }

    #[test]
    fn test_roman_numeral_law() {
        assert!(matches("IIIrd Semester", sem(3)));
        assert!(!matches("IIIrd Semester", sem(4)));
    }

    #[test]
    fn test_ordinal_and_cardinal_forms() {
        assert!(matches("3rd Semester", sem(3)));
        assert!(matches("Third Semester", sem(3)));
        assert!(matches("S3", sem(3)));
        assert!(matches("Semester 5", sem(5)));
        assert!(!matches("Semester 5", sem(6)));
    }

    #[test]
    fn test_substring_heuristic_false_positive_is_preserved() {
        assert!(matches("11th Semester", sem(1)));
    }

    #[test]
    fn test_exact_token_mode() {
        assert!(!matches_with("11th Semester", sem(1), MatchMode::ExactToken));
        assert!(matches_with("IIIrd Semester", sem(3), MatchMode::ExactToken));
        assert!(matches_with("Third Semester", sem(3), MatchMode::ExactToken));
        assert!(matches_with("S3", sem(3), MatchMode::ExactToken));
        assert!(!matches_with("IIIrd Semester", sem(1), MatchMode::ExactToken));
    }

    #[test]
    fn test_semester_number() {
        assert_eq!(semester_number("IIIrd Semester"), sem(3));
        assert_eq!(semester_number("VIth Semester"), sem(6));
        assert_eq!(semester_number("IInd Semester"), sem(2));
        assert_eq!(semester_number("8th Semester"), sem(8));
        assert_eq!(semester_number("fifth semester"), sem(5));
        assert_eq!(semester_number("S7"), sem(7));
        assert_eq!(semester_number("Sem 4"), sem(4));
        assert_eq!(semester_number("11th Semester"), None);
        assert_eq!(semester_number("Semester"), None);
        assert_eq!(semester_number(""), None);
    }

    #[test]
    fn test_semester_validation() {
        assert!(Semester::new(0).is_err());
        assert!(Semester::new(9).is_err());
        assert_eq!(Semester::new(8).unwrap().get(), 8);
        assert_eq!("3".parse::<Semester>().unwrap().get(), 3);
        assert_eq!(
            "three".parse::<Semester>().unwrap_err(),
            SemesterError::NotANumber("three".to_string())
        );
    }

    #[test]
    fn test_semester_serde() {
        let s: Semester = serde_json::from_str("4").unwrap();
        assert_eq!(s.get(), 4);
        assert_eq!(serde_json::to_string(&s).unwrap(), "4");
        assert!(serde_json::from_str::<Semester>("12").is_err());
    }

    #[test]
    fn test_variants_cover_all_semesters() {
        assert_eq!(Semester::all().count(), 8);
        assert_eq!(Semester::new(7).unwrap().variants(), ["seventh", "7th", "vii", "7"]);
    }
}
