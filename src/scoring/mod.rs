// Relevance scoring: TF-IDF vectors over a vocabulary, compared by cosine.
//
// Document 0 of every fitted corpus is the job description; documents 1..
// are the resumes that passed the prefilter. Scores are the cosine between
// each resume vector and the job vector.

pub mod prefilter;
pub mod similarity;
pub mod suggest;
pub mod tfidf;
pub mod vocabulary;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use similarity::cosine_similarity;
use tfidf::TfIdfModel;
use vocabulary::{SynonymMap, Vocabulary};

/// Where the TF-IDF feature space comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyMode {
    /// Only the job's keyword list
    Controlled,
    /// Every word in the job description and resumes
    Open,
}

/// Scores for one batch, aligned with the resumes passed in.
#[derive(Debug, Clone)]
pub struct CorpusScores {
    pub scores: Vec<f64>,
    pub model: TfIdfModel,
}

/// Fit TF-IDF over `[job] + resumes` and score every resume against the job.
///
/// `job` and `resumes` are normalized documents. `keywords` are raw keywords
/// (used only in controlled mode).
pub fn score_corpus(
    job: &str,
    resumes: &[String],
    mode: VocabularyMode,
    keywords: &[String],
    synonyms: &SynonymMap,
) -> CorpusScores {
    let documents: Vec<Vec<String>> = std::iter::once(job)
        .chain(resumes.iter().map(String::as_str))
        .map(|d| synonyms.apply(d))
        .collect();

    let vocabulary = match mode {
        VocabularyMode::Controlled => Vocabulary::controlled(keywords),
        VocabularyMode::Open => {
            let joined: Vec<String> = documents.iter().map(|d| d.join(" ")).collect();
            Vocabulary::open(&joined)
        }
    };

    let model = TfIdfModel::fit(vocabulary, &documents);
    info!(
        mode = ?mode,
        vocabulary = model.vocabulary().len(),
        documents = model.document_count(),
        "Fitted TF-IDF model"
    );

    let scores = match model.vector(0) {
        Some(job_vector) => (1..model.document_count())
            .map(|i| {
                model
                    .vector(i)
                    .map(|v| cosine_similarity(v, job_vector))
                    .unwrap_or(0.0)
            })
            .collect(),
        None => vec![0.0; resumes.len()],
    };

    CorpusScores { scores, model }
}

/// Vocabulary terms present in a normalized resume, in order of first
/// appearance, without duplicates, capped at `limit`.
pub fn matched_keywords(
    resume: &str,
    vocabulary: &Vocabulary,
    synonyms: &SynonymMap,
    limit: usize,
) -> Vec<String> {
    let tokens = synonyms.apply(resume);
    let mut seen = BTreeSet::new();
    let mut matched = Vec::new();
    for (_, idx) in vocabulary.occurrences(&tokens) {
        if matched.len() >= limit {
            break;
        }
        if seen.insert(idx) {
            matched.push(vocabulary.terms()[idx].clone());
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::preprocess_text;

    fn keywords() -> Vec<String> {
        ["oracle", "postgresql", "python", "spark", "docker"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_relevant_resume_scores_higher() {
        let job = preprocess_text("Oracle and PostgreSQL DBA with Python, Spark and Docker");
        let resumes = vec![
            preprocess_text("Oracle DBA, PostgreSQL tuning, Python automation, Docker images"),
            preprocess_text("Graphic designer with Photoshop and a little Python"),
        ];
        let result = score_corpus(
            &job,
            &resumes,
            VocabularyMode::Controlled,
            &keywords(),
            &SynonymMap::default(),
        );
        assert_eq!(result.scores.len(), 2);
        assert!(result.scores[0] > result.scores[1]);
        assert!(result.scores.iter().all(|s| (0.0..=1.0).contains(s)));
        assert_eq!(result.model.vocabulary().len(), 5);
    }

    #[test]
    fn test_short_tech_keywords_score() {
        let job = preprocess_text("Research engineer: AI, ML, C and R");
        let resumes = vec![
            preprocess_text("Shipped ML pipelines in C and R for an AI lab"),
            preprocess_text("Graphic designer with Photoshop"),
        ];
        let keywords: Vec<String> = ["AI", "ML", "C", "R"].iter().map(|s| s.to_string()).collect();
        let result = score_corpus(
            &job,
            &resumes,
            VocabularyMode::Controlled,
            &keywords,
            &SynonymMap::default(),
        );
        assert_eq!(result.model.vocabulary().len(), 4);
        assert!(result.scores[0] > 0.0);
        assert_eq!(result.scores[1], 0.0);
    }

    #[test]
    fn test_no_resumes() {
        let result = score_corpus(
            "oracle",
            &[],
            VocabularyMode::Controlled,
            &keywords(),
            &SynonymMap::default(),
        );
        assert!(result.scores.is_empty());
    }

    #[test]
    fn test_job_without_keywords_scores_zero() {
        let resumes = vec![preprocess_text("Oracle Python")];
        let result = score_corpus(
            "gardening",
            &resumes,
            VocabularyMode::Controlled,
            &keywords(),
            &SynonymMap::default(),
        );
        assert_eq!(result.scores, vec![0.0]);
    }

    #[test]
    fn test_open_vocabulary_covers_corpus() {
        let result = score_corpus(
            "sql oracle",
            &["sql python".to_string()],
            VocabularyMode::Open,
            &[],
            &SynonymMap::default(),
        );
        assert_eq!(result.model.vocabulary().terms(), &["oracle", "python", "sql"]);
        assert!(result.scores[0] > 0.0);
    }

    #[test]
    fn test_matched_keywords_order_and_dedupe() {
        let vocab = Vocabulary::controlled(&keywords());
        let resume = preprocess_text("Docker, Python, more Docker, Oracle");
        let matched = matched_keywords(&resume, &vocab, &SynonymMap::default(), 10);
        assert_eq!(matched, vec!["docker", "python", "oracle"]);
    }

    #[test]
    fn test_matched_keywords_limit() {
        let vocab = Vocabulary::controlled(&keywords());
        let resume = preprocess_text("Docker Python Oracle Spark");
        let matched = matched_keywords(&resume, &vocab, &SynonymMap::default(), 2);
        assert_eq!(matched, vec!["docker", "python"]);
    }
}
