// Cleanup of raw OCR output.
//
// OCR text arrives with ragged line breaks, runs of spaces, and stray glyphs
// (bullets, pipes, box-drawing characters). We flatten it to a single line of
// word characters while keeping the punctuation that email addresses and
// hyphenated technology names depend on.

use std::sync::LazyLock;

use regex_lite::Regex;

static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s@.\-]").expect("valid regex"));

/// Flatten and strip OCR text.
///
/// Newlines become spaces, whitespace runs collapse to one space, and every
/// character other than word characters, whitespace, `@`, `.` and `-` is
/// removed. The result is trimmed.
pub fn clean_extracted_text(text: &str) -> String {
    let text = NEWLINES.replace_all(text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SPECIAL.replace_all(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_spaces() {
        assert_eq!(clean_extracted_text("Jane\n\n\nDoe"), "Jane Doe");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(clean_extracted_text("  SQL \t\t  Python   "), "SQL Python");
    }

    #[test]
    fn test_email_characters_kept() {
        assert_eq!(
            clean_extracted_text("• jane.doe-1@mail.com |"),
            "jane.doe-1@mail.com"
        );
    }

    #[test]
    fn test_special_characters_removed() {
        assert_eq!(clean_extracted_text("C++ / PL/SQL (5 yrs)"), "C  PLSQL 5 yrs");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_extracted_text(""), "");
        assert_eq!(clean_extracted_text("\n\n  \n"), "");
    }
}
