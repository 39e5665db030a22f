//! Input sanitation for user-supplied text.

const MAX_LEN: usize = 500;

/// Strips characters that would corrupt prompt interpolation and bounds the length.
///
/// Surrounding whitespace is trimmed first, then `<`, `>`, `"`, `{` and `}`
/// are removed, then the result is truncated to 500 characters. Empty input
/// comes back empty; this never fails.
pub fn sanitize_input(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '{' | '}'))
        .take(MAX_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unsafe_characters() {
        let out = sanitize_input("a <b> \"c\" {d} e");
        assert_eq!(out, "a b c d e");
        for c in ['<', '>', '"', '{', '}'] {
            assert!(!out.contains(c));
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_input("  hello world \n"), "hello world");
    }

    #[test]
    fn truncates_to_max_length() {
        let long = "a".repeat(700);
        assert_eq!(sanitize_input(&long).len(), 500);
    }

    #[test]
    fn clean_input_is_a_no_op() {
        let text = "I led the migration of our billing service.";
        assert_eq!(sanitize_input(text), text);
        assert_eq!(sanitize_input(&sanitize_input(text)), sanitize_input(text));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_input(""), "");
        assert_eq!(sanitize_input("   "), "");
    }
}
