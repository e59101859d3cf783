// Tesseract OCR engine.
//
// Recognition runs the LSTM engine in page segmentation mode 6 ("assume a
// single uniform block of text"), which suits single-column resume scans.
// Confidence comes from Tesseract's word-level TSV output rather than
// `mean_text_conf`, so that empty detections (conf = -1) can be excluded.

use std::collections::BTreeMap;

use super::traits::OcrPage;

/// Tesseract page segmentation mode: single uniform block of text.
pub const PAGE_SEG_MODE: &str = "6";

/// One word-level row of Tesseract TSV output.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvWord {
    pub block: u32,
    pub paragraph: u32,
    pub line: u32,
    pub confidence: f64,
    pub text: String,
}

/// Parse Tesseract TSV output, keeping level-5 (word) rows.
///
/// Columns: level page_num block_num par_num line_num word_num left top width
/// height conf text. The header row and malformed rows are skipped.
pub fn parse_tsv(tsv: &str) -> Vec<TsvWord> {
    tsv.lines()
        .filter_map(|row| {
            let fields: Vec<&str> = row.split('\t').collect();
            if fields.len() < 11 || fields[0] != "5" {
                return None;
            }
            Some(TsvWord {
                block: fields[2].parse().ok()?,
                paragraph: fields[3].parse().ok()?,
                line: fields[4].parse().ok()?,
                confidence: fields[10].parse().ok()?,
                text: fields.get(11).map(|t| t.trim().to_string()).unwrap_or_default(),
            })
        })
        .collect()
}

/// Assemble a page from word rows: words joined by spaces within a line,
/// lines joined by newlines. Confidence is the mean over rows whose
/// confidence is not -1; zero when there are none.
pub fn page_from_words(words: &[TsvWord]) -> OcrPage {
    let mut lines: BTreeMap<(u32, u32, u32), Vec<&str>> = BTreeMap::new();
    for word in words.iter().filter(|w| !w.text.is_empty()) {
        lines
            .entry((word.block, word.paragraph, word.line))
            .or_default()
            .push(&word.text);
    }
    let text = lines
        .values()
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    let scored: Vec<f64> = words
        .iter()
        .map(|w| w.confidence)
        .filter(|&c| c >= 0.0)
        .collect();
    let confidence = if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    };

    OcrPage {
        text,
        confidence,
        word_count: words.iter().filter(|w| !w.text.is_empty()).count(),
    }
}

#[cfg(feature = "ocr")]
pub use engine::TesseractEngine;

#[cfg(feature = "ocr")]
mod engine {
    use std::path::PathBuf;

    use anyhow::{anyhow, Result};
    use image::GrayImage;
    use tesseract::Tesseract;
    use tracing::debug;

    use super::{page_from_words, parse_tsv, PAGE_SEG_MODE};
    use crate::ocr::preprocess::encode_png;
    use crate::ocr::traits::{OcrEngine, OcrPage};

    /// Tesseract-backed OCR engine. A fresh Tesseract handle is created per
    /// page; handles are not `Sync`, and initialization is cheap next to
    /// recognition.
    pub struct TesseractEngine {
        tessdata_dir: Option<PathBuf>,
        language: String,
    }

    impl TesseractEngine {
        pub fn new(tessdata_dir: Option<PathBuf>, language: &str) -> Self {
            Self {
                tessdata_dir,
                language: language.to_string(),
            }
        }
    }

    impl OcrEngine for TesseractEngine {
        fn recognize(&self, image: &GrayImage) -> Result<OcrPage> {
            let png = encode_png(image)?;

            let datapath = match &self.tessdata_dir {
                Some(dir) => Some(
                    dir.to_str()
                        .ok_or_else(|| anyhow!("Invalid tessdata path: {}", dir.display()))?,
                ),
                None => None,
            };

            let tess = Tesseract::new(datapath, Some(&self.language))
                .map_err(|e| anyhow!("Failed to initialize Tesseract: {e:?}"))?
                .set_variable("tessedit_pageseg_mode", PAGE_SEG_MODE)
                .map_err(|e| anyhow!("Failed to set page segmentation mode: {e:?}"))?;

            let mut tess = tess
                .set_image_from_mem(&png)
                .map_err(|e| anyhow!("Failed to load image into Tesseract: {e:?}"))?
                .recognize()
                .map_err(|e| anyhow!("Tesseract recognition failed: {e:?}"))?;

            let tsv = tess
                .get_tsv_text(0)
                .map_err(|e| anyhow!("Failed to read Tesseract TSV output: {e:?}"))?;

            let page = page_from_words(&parse_tsv(&tsv));
            debug!(
                words = page.word_count,
                confidence = page.confidence,
                "Tesseract pass complete"
            );
            Ok(page)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t
4\t1\t1\t1\t1\t0\t10\t10\t300\t20\t-1\t
5\t1\t1\t1\t1\t1\t10\t10\t60\t20\t95.5\tJane
5\t1\t1\t1\t1\t2\t80\t10\t60\t20\t90.5\tDoe
5\t1\t1\t1\t2\t1\t10\t40\t200\t20\t70\tjane@mail.com
5\t1\t1\t1\t2\t2\t220\t40\t5\t20\t-1\t
";

    #[test]
    fn test_parse_tsv_keeps_word_rows() {
        let words = parse_tsv(SAMPLE_TSV);
        assert_eq!(words.len(), 4);
        assert_eq!(words[0].text, "Jane");
        assert_eq!(words[2].line, 2);
        assert_eq!(words[3].text, "");
    }

    #[test]
    fn test_page_from_words_lines_and_confidence() {
        let page = page_from_words(&parse_tsv(SAMPLE_TSV));
        assert_eq!(page.text, "Jane Doe\njane@mail.com");
        assert_eq!(page.word_count, 3);
        // (95.5 + 90.5 + 70) / 3, the -1 row excluded
        assert!((page.confidence - 256.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_from_no_words() {
        let page = page_from_words(&[]);
        assert_eq!(page.text, "");
        assert_eq!(page.confidence, 0.0);
        assert_eq!(page.word_count, 0);
    }

    #[test]
    fn test_parse_tsv_skips_malformed_rows() {
        let words = parse_tsv("5\t1\tx\n5\t1\t1\t1\t1\t1\t0\t0\t1\t1\tnotanumber\tword\n");
        assert!(words.is_empty());
    }
}
