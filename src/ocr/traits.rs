// OCR engine trait: swap-ready abstraction over the text recognizer.

use anyhow::Result;
use image::GrayImage;

/// The recognized text of one page plus how sure the engine was about it.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPage {
    /// Recognized words, one output line per detected text line
    pub text: String,
    /// Mean word confidence on a 0-100 scale (0 when no words were found)
    pub confidence: f64,
    /// Number of non-empty words recognized
    pub word_count: usize,
}

/// Trait for turning a preprocessed grayscale image into text.
///
/// Engines are synchronous: recognition is CPU-bound and the whole batch
/// already runs on a blocking thread.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text on a single page image.
    fn recognize(&self, image: &GrayImage) -> Result<OcrPage>;
}

/// Placeholder engine for builds without the `ocr` feature.
/// Every call fails, so image resumes are reported and skipped rather than
/// silently scored as empty documents.
pub struct UnavailableEngine;

impl OcrEngine for UnavailableEngine {
    fn recognize(&self, _image: &GrayImage) -> Result<OcrPage> {
        anyhow::bail!(
            "shortlist was built without OCR support. Rebuild with: cargo build --features ocr"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_engine_errors() {
        let image = GrayImage::new(4, 4);
        let err = UnavailableEngine.recognize(&image).unwrap_err();
        assert!(err.to_string().contains("--features ocr"));
    }
}
