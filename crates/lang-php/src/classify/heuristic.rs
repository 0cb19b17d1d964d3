//! Capitalization heuristic.
//!
//! Stands in for real name resolution of string discriminators: a string
//! whose first letter is uppercase is taken to be a class name. Kept apart
//! from exact resolution so it can be swapped out on its own.

use factoscope_api::models::naming::strip_leading_separator;

/// `true` when the first character, after at most one leading `\`, is
/// uppercase.
pub fn looks_like_class_name(text: &str) -> bool {
    strip_leading_separator(text)
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized_names() {
        assert!(looks_like_class_name("Widget"));
        assert!(looks_like_class_name("App\\Widget"));
        assert!(looks_like_class_name("\\App\\Widget"));
    }

    #[test]
    fn test_rejects_lowercase_and_empty() {
        assert!(!looks_like_class_name("lowercasetoken"));
        assert!(!looks_like_class_name(""));
        assert!(!looks_like_class_name("\\"));
        assert!(!looks_like_class_name("\\\\App"));
        assert!(!looks_like_class_name("1Up"));
    }
}
