//! Whitespace and case normalization for rendered markup text.

/// Collapses every run of whitespace (including non-breaking spaces) to a
/// single ASCII space and trims both ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Normalizes whitespace and case-folds, the form every text predicate
/// compares against.
pub fn fold(s: &str) -> String {
    normalize_ws(s).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ws_collapses_runs() {
        assert_eq!(normalize_ws("  Sessional \n\t Exams  "), "Sessional Exams");
    }

    #[test]
    fn test_normalize_ws_non_breaking_space() {
        assert_eq!(normalize_ws("Module\u{a0}\u{a0}Test"), "Module Test");
    }

    #[test]
    fn test_normalize_ws_empty() {
        assert_eq!(normalize_ws(" \n "), "");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold(" End   SEMESTER Exam "), "end semester exam");
    }
}
