// Must-have keyword gate applied before scoring.
//
// A resume that lacks any of the job's required keywords is dropped before
// TF-IDF is fitted, so it neither gets a score nor shifts the IDF weights of
// the resumes that do qualify.

use tracing::debug;

use super::vocabulary::SynonymMap;
use crate::text::normalize_keyword;

/// Indexes (in input order) of resumes containing every required keyword.
///
/// `resumes` are normalized documents; `required` are raw keywords and are
/// normalized here. Synonyms are folded on the resume side, so an alias
/// satisfies its canonical keyword. Keywords that normalize to nothing are
/// ignored, and an empty requirement list keeps every resume.
pub fn prefilter<S: AsRef<str>>(resumes: &[S], required: &[String], synonyms: &SynonymMap) -> Vec<usize> {
    let required: Vec<Vec<String>> = required
        .iter()
        .map(|k| {
            normalize_keyword(k)
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|k| !k.is_empty())
        .collect();

    resumes
        .iter()
        .enumerate()
        .filter(|(i, text)| {
            let tokens = synonyms.apply(text.as_ref());
            let missing: Vec<String> = required
                .iter()
                .filter(|phrase| !contains_phrase(&tokens, phrase))
                .map(|phrase| phrase.join(" "))
                .collect();
            if !missing.is_empty() {
                debug!(resume = i, missing = ?missing, "Resume rejected by prefilter");
            }
            missing.is_empty()
        })
        .map(|(i, _)| i)
        .collect()
}

/// Whether `phrase` appears as a contiguous token sequence in `tokens`.
pub fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && tokens.windows(phrase.len()).any(|w| w == phrase)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::text::preprocess_text;

    fn resumes() -> Vec<String> {
        [
            "Senior database engineer: SQL, Python, Oracle",
            "Python developer building web apps",
            "SQL analyst and Python scripting for the database team, engineer",
        ]
        .iter()
        .map(|t| preprocess_text(t))
        .collect()
    }

    fn required() -> Vec<String> {
        ["SQL", "Python", "engineer", "database"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_requires_every_keyword() {
        let kept = prefilter(&resumes(), &required(), &SynonymMap::default());
        assert_eq!(kept, vec![0, 2]);
    }

    #[test]
    fn test_empty_requirements_keep_all() {
        let kept = prefilter(&resumes(), &[], &SynonymMap::default());
        assert_eq!(kept, vec![0, 1, 2]);
    }

    #[test]
    fn test_inflected_requirement_matches() {
        // "Databases" normalizes to "database", matching resume text.
        let kept = prefilter(&resumes(), &["Databases".to_string()], &SynonymMap::default());
        assert_eq!(kept, vec![0, 2]);
    }

    #[test]
    fn test_synonym_satisfies_requirement() {
        let docs = vec![preprocess_text("Tuned Postgres clusters")];
        let synonyms = SynonymMap::new(&BTreeMap::from([(
            "postgresql".to_string(),
            vec!["postgres".to_string()],
        )]));
        assert_eq!(prefilter(&docs, &["PostgreSQL".to_string()], &synonyms), vec![0]);
        assert!(prefilter(&docs, &["PostgreSQL".to_string()], &SynonymMap::default()).is_empty());
    }

    #[test]
    fn test_short_tech_requirements_filter() {
        let docs = vec![
            preprocess_text("Graphic designer, Photoshop and Illustrator"),
            preprocess_text("Built AI and ML models in R and Go"),
        ];
        let required: Vec<String> = ["AI", "ML", "R", "Go"].iter().map(|s| s.to_string()).collect();
        assert_eq!(prefilter(&docs, &required, &SynonymMap::default()), vec![1]);
    }

    #[test]
    fn test_contains_phrase() {
        let tokens: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let bc: Vec<String> = ["b", "c"].iter().map(|s| s.to_string()).collect();
        let ca: Vec<String> = ["c", "a"].iter().map(|s| s.to_string()).collect();
        assert!(contains_phrase(&tokens, &bc));
        assert!(!contains_phrase(&tokens, &ca));
        assert!(!contains_phrase(&tokens, &[]));
    }
}
