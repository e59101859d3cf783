// Rule-based extraction for emails and phone numbers.

use std::sync::LazyLock;

use regex_lite::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w.\-]+@[\w.\-]+\.[a-zA-Z]{2,6}").expect("valid email regex")
});

// Optional country code, optional bracketed area code, then 2-3 digit groups.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\+?\d{1,3}[\s\-]?)?(?:\(\d{2,4}\)[\s\-]?)?\d{3,4}[\s\-]?\d{3,4}(?:[\s\-]?\d{3,4})?",
    )
    .expect("valid phone regex")
});

/// Accepted digit count range for a phone number, inclusive.
const PHONE_DIGITS_MIN: usize = 8;
const PHONE_DIGITS_MAX: usize = 15;

/// The first email address in the text.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

/// The first phone-shaped match in the text, reduced to its digits.
///
/// Only the first match is considered. If it has too few or too many digits
/// (a date range, a zip code, an ID number), no phone is reported.
pub fn find_phone(text: &str) -> Option<String> {
    let m = PHONE.find(text)?;
    let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
    (PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX)
        .contains(&digits.len())
        .then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_found() {
        assert_eq!(
            find_email("Contact: j.smith-dev@mail.example.org today").as_deref(),
            Some("j.smith-dev@mail.example.org")
        );
    }

    #[test]
    fn test_email_first_match_wins() {
        assert_eq!(
            find_email("a@one.com b@two.com").as_deref(),
            Some("a@one.com")
        );
    }

    #[test]
    fn test_email_missing() {
        assert_eq!(find_email("no contact here @ all"), None);
    }

    #[test]
    fn test_phone_formats() {
        assert_eq!(find_phone("+44 (20) 7946 0958").as_deref(), Some("442079460958"));
        assert_eq!(find_phone("call 555-123-4567").as_deref(), Some("5551234567"));
        assert_eq!(find_phone("(0123) 456 7890").as_deref(), Some("01234567890"));
    }

    #[test]
    fn test_phone_too_short_rejected() {
        // Matches the phone shape, but six digits is not a phone number.
        assert_eq!(find_phone("Zip 123 456"), None);
    }

    #[test]
    fn test_phone_missing() {
        assert_eq!(find_phone("no digits"), None);
    }
}
