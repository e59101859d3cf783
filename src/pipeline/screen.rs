// Screen a batch of resumes against one job profile.
//
// Steps:
//   1. Extract text from every resume (OCR for images, read for .txt),
//      then clean and lemmatize it. A resume that fails here is logged and
//      skipped; it never aborts the batch.
//   2. Drop resumes missing any required keyword.
//   3. Fit TF-IDF over [job description] + surviving resumes.
//   4. Score each survivor by cosine similarity to the job vector, pull
//      contact entities from its raw text, and list its matched keywords.
//   5. Rank by score (ties by filename) and apply the optional top-N cut.

use std::cmp::Ordering;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::entities::extract_entities;
use crate::entities::traits::NameRecognizer;
use crate::ingest::{ResumeFile, SourceKind};
use crate::job::JobProfile;
use crate::ocr::retry::{perform_ocr, RetryPolicy};
use crate::ocr::spell::SpellCorrector;
use crate::ocr::traits::OcrEngine;
use crate::scoring::vocabulary::SynonymMap;
use crate::scoring::{matched_keywords, prefilter::prefilter, score_corpus, VocabularyMode};
use crate::text::{clean_extracted_text, preprocess_text};

/// At most this many matched keywords are reported per resume.
pub const MATCHED_KEYWORD_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct ScreenOptions {
    pub vocabulary_mode: VocabularyMode,
    /// Keep only the N best-ranked resumes (None = all)
    pub top: Option<usize>,
    pub retry_policy: RetryPolicy,
    /// Draw a progress bar while extracting text
    pub show_progress: bool,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            vocabulary_mode: VocabularyMode::Controlled,
            top: None,
            retry_policy: RetryPolicy::default(),
            show_progress: false,
        }
    }
}

/// One ranked resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub rank: usize,
    pub filename: String,
    /// Empty when no entity was found
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Cosine similarity to the job description, 4 decimal places
    pub score: f64,
    /// Mean OCR word confidence, 2 decimal places (None for text resumes)
    pub ocr_avg_confidence: Option<f64>,
    /// OCR engine calls made for this resume (0 for text resumes)
    pub ocr_attempts: u32,
    pub matched_keywords: Vec<String>,
    pub tfidf_vocab_size: usize,
}

/// Everything a screening run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub generated_at: DateTime<Utc>,
    pub job_title: String,
    pub vocabulary_mode: VocabularyMode,
    /// Resumes whose text was extracted
    pub screened: usize,
    /// Resumes that passed the prefilter and were scored
    pub shortlisted: usize,
    pub rejected_by_prefilter: usize,
    /// Resumes skipped because text extraction failed
    pub failed: usize,
    pub results: Vec<ScreeningResult>,
}

/// A resume after text extraction and normalization.
#[derive(Debug, Clone)]
pub struct ExtractedResume {
    pub filename: String,
    /// Text as recognized or read, used for entity extraction
    pub raw_text: String,
    /// Cleaned and lemmatized text, used for scoring
    pub normalized: String,
    pub confidence: Option<f64>,
    pub attempts: u32,
}

/// Run the full screening pipeline over already-discovered files.
pub fn screen(
    files: &[ResumeFile],
    job: &JobProfile,
    options: &ScreenOptions,
    engine: &dyn OcrEngine,
    recognizer: &dyn NameRecognizer,
    speller: &SpellCorrector,
) -> Result<ScreeningReport> {
    let keywords = job.effective_keywords(options.vocabulary_mode)?;
    let synonyms = SynonymMap::new(&job.synonyms);

    // Step 1: extract and normalize
    let pb = if options.show_progress {
        progress_bar(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut extracted = Vec::with_capacity(files.len());
    let mut failed = 0;
    for file in files {
        pb.set_message(file.filename.clone());
        match extract_text(file, engine, &options.retry_policy, speller) {
            Ok(resume) => {
                info!(
                    file = %resume.filename,
                    confidence = ?resume.confidence,
                    attempts = resume.attempts,
                    "Resume text extracted"
                );
                debug!(file = %resume.filename, text = %resume.raw_text, "Extracted text");
                extracted.push(resume);
            }
            Err(e) => {
                warn!(file = %file.filename, error = format!("{e:#}"), "Skipping resume");
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    // Step 2: prefilter
    let normalized: Vec<&str> = extracted.iter().map(|r| r.normalized.as_str()).collect();
    let kept = prefilter(&normalized, &job.required_keywords, &synonyms);
    let rejected = extracted.len() - kept.len();
    info!(
        screened = extracted.len(),
        kept = kept.len(),
        rejected,
        "Prefilter applied"
    );

    // Step 3: fit and score
    let job_text = preprocess_text(&clean_extracted_text(&job.description));
    let kept_texts: Vec<String> = kept
        .iter()
        .map(|&i| extracted[i].normalized.clone())
        .collect();
    let scored = score_corpus(
        &job_text,
        &kept_texts,
        options.vocabulary_mode,
        &keywords,
        &synonyms,
    );
    let vocabulary = scored.model.vocabulary();

    // Step 4: per-resume details
    let mut results: Vec<ScreeningResult> = kept
        .iter()
        .zip(&scored.scores)
        .map(|(&i, &score)| {
            let resume = &extracted[i];
            let entities = extract_entities(&resume.raw_text, recognizer);
            ScreeningResult {
                rank: 0,
                filename: resume.filename.clone(),
                name: entities.name,
                email: entities.email,
                phone: entities.phone,
                score: round_to(score, 4),
                ocr_avg_confidence: resume.confidence.map(|c| round_to(c, 2)),
                ocr_attempts: resume.attempts,
                matched_keywords: matched_keywords(
                    &resume.normalized,
                    vocabulary,
                    &synonyms,
                    MATCHED_KEYWORD_LIMIT,
                ),
                tfidf_vocab_size: vocabulary.len(),
            }
        })
        .collect();

    // Step 5: rank
    rank_results(&mut results, options.top);

    Ok(ScreeningReport {
        generated_at: Utc::now(),
        job_title: job.title.clone(),
        vocabulary_mode: options.vocabulary_mode,
        screened: extracted.len(),
        shortlisted: kept.len(),
        rejected_by_prefilter: rejected,
        failed,
        results,
    })
}

/// Sort by score descending (ties by filename), number from 1, then cut to `top`.
pub fn rank_results(results: &mut Vec<ScreeningResult>, top: Option<usize>) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.filename.cmp(&b.filename))
    });
    if let Some(n) = top {
        results.truncate(n);
    }
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = i + 1;
    }
}

/// OCR (images) or read (text) one resume, then clean and lemmatize it.
pub fn extract_text(
    file: &ResumeFile,
    engine: &dyn OcrEngine,
    policy: &RetryPolicy,
    speller: &SpellCorrector,
) -> Result<ExtractedResume> {
    let (raw_text, confidence, attempts) = match file.kind {
        SourceKind::Image => {
            let outcome = perform_ocr(engine, &file.path, policy, speller)
                .with_context(|| format!("OCR failed for {}", file.path.display()))?;
            (outcome.text, Some(outcome.confidence), outcome.attempts)
        }
        SourceKind::Text => {
            let text = std::fs::read_to_string(&file.path)
                .with_context(|| format!("Failed to read {}", file.path.display()))?;
            (text, None, 0)
        }
    };

    Ok(ExtractedResume {
        filename: file.filename.clone(),
        normalized: preprocess_text(&clean_extracted_text(&raw_text)),
        raw_text,
        confidence,
        attempts,
    })
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template("  Resumes [{bar:30}] {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
