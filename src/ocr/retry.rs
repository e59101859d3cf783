// Confidence-driven OCR retry.
//
// The first attempt runs on an Otsu-binarized page. If the engine's mean word
// confidence comes back below the threshold, we retry on an adaptively
// thresholded version of the same grayscale page, up to `retries` times. The
// final attempt is returned even if it is still below threshold: a faint
// resume is still worth scoring.

use std::path::Path;

use anyhow::Result;
use image::GrayImage;
use tracing::{debug, warn};

use super::preprocess::{adaptive_binarize, load_grayscale, otsu_binarize};
use super::spell::SpellCorrector;
use super::traits::OcrEngine;

/// When and how to retry a low-confidence OCR pass.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Mean word confidence (0-100) below which a retry is attempted
    pub confidence_threshold: f64,
    /// Maximum number of retries after the first attempt
    pub retries: u32,
    /// Neighbourhood size for the adaptive threshold pass
    pub adaptive_block_size: u32,
    /// Constant subtracted from the local mean in the adaptive pass
    pub adaptive_offset: i16,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: 40.0,
            retries: 2,
            adaptive_block_size: 11,
            adaptive_offset: 2,
        }
    }
}

/// Final OCR result for one resume image.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutcome {
    pub text: String,
    /// Mean word confidence (0-100) of the attempt that produced `text`
    pub confidence: f64,
    /// Total engine calls made, including the first
    pub attempts: u32,
}

/// Run OCR on a grayscale page, retrying with adaptive thresholding while
/// confidence stays below the policy threshold.
pub fn recognize_with_retry(
    engine: &dyn OcrEngine,
    gray: &GrayImage,
    policy: &RetryPolicy,
) -> Result<OcrOutcome> {
    let mut page = engine.recognize(&otsu_binarize(gray))?;
    let mut attempts = 1;
    debug!(
        confidence = page.confidence,
        words = page.word_count,
        "OCR first pass"
    );

    let mut retry = 0;
    while page.confidence < policy.confidence_threshold && retry < policy.retries {
        warn!(
            confidence = format!("{:.2}", page.confidence),
            threshold = policy.confidence_threshold,
            "Low OCR confidence, retrying with adaptive threshold"
        );
        let adaptive = adaptive_binarize(gray, policy.adaptive_block_size, policy.adaptive_offset);
        page = engine.recognize(&adaptive)?;
        attempts += 1;
        retry += 1;
    }

    Ok(OcrOutcome {
        text: page.text,
        confidence: page.confidence,
        attempts,
    })
}

/// Load a resume image, OCR it with retry, and spell-correct the result.
pub fn perform_ocr(
    engine: &dyn OcrEngine,
    path: &Path,
    policy: &RetryPolicy,
    speller: &SpellCorrector,
) -> Result<OcrOutcome> {
    let gray = load_grayscale(path)?;
    let mut outcome = recognize_with_retry(engine, &gray, policy)?;
    outcome.text = speller.correct_text(&outcome.text);
    Ok(outcome)
}
