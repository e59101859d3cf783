// Text normalization: OCR cleanup, then stop word removal and lemmatization.
//
// Every string that ends up in a TF-IDF vector (job description, resumes,
// vocabulary terms, required keywords) flows through this module so that
// both sides of a comparison are normalized identically.

pub mod clean;
pub mod lemma;

pub use clean::clean_extracted_text;
pub use lemma::{lemmatize, preprocess_text};

use tracing::warn;

/// Normalize a single keyword or phrase exactly the way resume text is
/// normalized, so that `pl/sql` in a keyword list matches `PL/SQL` in a resume.
pub fn normalize_term(term: &str) -> String {
    preprocess_text(&clean_extracted_text(term))
}

/// Normalize a configured keyword (vocabulary term, required keyword,
/// synonym) without ever losing it.
///
/// A keyword made only of stop words would normalize to nothing and vanish
/// from the vocabulary or prefilter. Instead it falls back to its lowercased,
/// punctuation-trimmed tokens with a warning. Such a keyword can still only
/// match where resume text keeps those tokens.
pub fn normalize_keyword(keyword: &str) -> String {
    let normalized = normalize_term(keyword);
    if !normalized.is_empty() {
        return normalized;
    }
    let fallback = lemma::plain_tokens(&clean_extracted_text(keyword)).join(" ");
    if !fallback.is_empty() {
        warn!(
            keyword,
            fallback = %fallback,
            "Keyword normalizes to stop words only; matching it literally"
        );
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_term_strips_slash() {
        assert_eq!(normalize_term("PL/SQL"), "plsql");
        assert_eq!(normalize_term("CI/CD"), "cicd");
    }

    #[test]
    fn test_normalize_term_keeps_hyphen() {
        assert_eq!(normalize_term("SQL-Server"), "sql-server");
    }

    #[test]
    fn test_normalize_term_matches_resume_text() {
        let resume = preprocess_text(&clean_extracted_text("Managed PostgreSQL databases"));
        let term = normalize_term("database");
        assert!(resume.split_whitespace().any(|t| t == term));
    }

    #[test]
    fn test_normalize_keyword_short_terms_survive() {
        assert_eq!(normalize_keyword("AI"), "ai");
        assert_eq!(normalize_keyword("R"), "r");
        assert_eq!(normalize_keyword("Go"), "go");
        assert_eq!(normalize_keyword("Test"), "test");
    }

    #[test]
    fn test_normalize_keyword_stop_word_falls_back() {
        assert_eq!(normalize_term("IT"), "");
        assert_eq!(normalize_keyword("IT"), "it");
    }

    #[test]
    fn test_normalize_keyword_punctuation_only_is_empty() {
        assert_eq!(normalize_keyword("--"), "");
        assert_eq!(normalize_keyword("  "), "");
    }
}
