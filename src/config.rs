use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::entities::download::{default_model_dir, ner_files_present, ner_model_dir};
use crate::ocr::retry::RetryPolicy;

/// Which name recognizer to use for entity extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackend {
    /// ONNX if the model files are present, otherwise heuristic (default)
    Auto,
    /// Local ONNX bert-base-NER model, run `shortlist download-model` first
    Onnx,
    /// Capitalized-line heuristic, no model needed
    Heuristic,
}

impl NerBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "onnx" => Ok(Self::Onnx),
            "heuristic" => Ok(Self::Heuristic),
            other => anyhow::bail!(
                "Invalid SHORTLIST_NER value {other:?}: expected auto, onnx, or heuristic"
            ),
        }
    }
}

/// Word list used to spell-correct OCR output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellDictionary {
    /// English list compiled into the binary (default)
    Bundled,
    /// No correction
    Off,
    /// "word [frequency]" file on disk
    File(PathBuf),
}

impl SpellDictionary {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "bundled" => Self::Bundled,
            "off" | "none" => Self::Off,
            _ => Self::File(PathBuf::from(value.trim())),
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing downloaded model files
    pub model_dir: PathBuf,
    pub ner_backend: NerBackend,
    /// Tesseract language data directory (None = Tesseract's default search path)
    pub tessdata_dir: Option<PathBuf>,
    pub ocr_language: String,
    pub ocr_confidence_threshold: f64,
    pub ocr_retries: u32,
    pub spell_dictionary: SpellDictionary,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `load()` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RetryPolicy::default();

        let ner_backend = match lookup("SHORTLIST_NER") {
            Some(value) => NerBackend::parse(&value)?,
            None => NerBackend::Auto,
        };

        Ok(Self {
            model_dir: lookup("SHORTLIST_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_model_dir),
            ner_backend,
            tessdata_dir: lookup("SHORTLIST_TESSDATA").map(PathBuf::from),
            ocr_language: lookup("SHORTLIST_OCR_LANG").unwrap_or_else(|| "eng".to_string()),
            ocr_confidence_threshold: parse_confidence(&lookup, defaults.confidence_threshold)?,
            ocr_retries: parse_var(&lookup, "SHORTLIST_OCR_RETRIES", defaults.retries)?,
            spell_dictionary: lookup("SHORTLIST_SPELL_DICT")
                .map(|value| SpellDictionary::parse(&value))
                .unwrap_or(SpellDictionary::Bundled),
        })
    }

    /// OCR retry policy with the configured threshold and retry count.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            confidence_threshold: self.ocr_confidence_threshold,
            retries: self.ocr_retries,
            ..RetryPolicy::default()
        }
    }

    /// Resolve `Auto` against the model files on disk.
    pub fn resolved_ner_backend(&self) -> NerBackend {
        match self.ner_backend {
            NerBackend::Auto if ner_files_present(&self.model_dir) => NerBackend::Onnx,
            NerBackend::Auto => NerBackend::Heuristic,
            other => other,
        }
    }

    /// Validate that the chosen NER backend has what it needs.
    pub fn require_ner(&self) -> Result<()> {
        if self.ner_backend == NerBackend::Onnx && !ner_files_present(&self.model_dir) {
            anyhow::bail!(
                "NER model files not found in {}\n\
                 Run `shortlist download-model` to download them.\n\
                 Or set SHORTLIST_NER=heuristic to skip the model.",
                ner_model_dir(&self.model_dir).display()
            );
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value {value:?}")),
        None => Ok(default),
    }
}

/// OCR confidence threshold. NaN would compare false against every page and
/// silently disable retries, so only finite values are accepted.
fn parse_confidence<F>(lookup: &F, default: f64) -> Result<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let key = "SHORTLIST_OCR_CONFIDENCE";
    let threshold: f64 = parse_var(lookup, key, default)?;
    if !threshold.is_finite() {
        anyhow::bail!("Invalid {key} value {threshold}: expected a finite number (0-100)");
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.ner_backend, NerBackend::Auto);
        assert_eq!(config.ocr_language, "eng");
        assert_eq!(config.ocr_confidence_threshold, 40.0);
        assert_eq!(config.ocr_retries, 2);
        assert!(config.tessdata_dir.is_none());
        assert_eq!(config.spell_dictionary, SpellDictionary::Bundled);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SHORTLIST_NER", "Heuristic"),
            ("SHORTLIST_OCR_CONFIDENCE", "55.5"),
            ("SHORTLIST_OCR_RETRIES", "0"),
            ("SHORTLIST_MODEL_DIR", "/tmp/models"),
            ("SHORTLIST_OCR_LANG", "deu"),
        ])
        .unwrap();
        assert_eq!(config.ner_backend, NerBackend::Heuristic);
        assert_eq!(config.ocr_confidence_threshold, 55.5);
        assert_eq!(config.ocr_retries, 0);
        assert_eq!(config.model_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.ocr_language, "deu");

        let policy = config.retry_policy();
        assert_eq!(policy.retries, 0);
        assert_eq!(policy.adaptive_block_size, 11);
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err = config_from(&[("SHORTLIST_OCR_RETRIES", "two")]).unwrap_err();
        assert!(err.to_string().contains("SHORTLIST_OCR_RETRIES"));
    }

    #[test]
    fn test_invalid_backend() {
        let err = config_from(&[("SHORTLIST_NER", "spacy")]).unwrap_err();
        assert!(err.to_string().contains("SHORTLIST_NER"));
    }

    #[test]
    fn test_auto_resolves_to_heuristic_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            config_from(&[("SHORTLIST_MODEL_DIR", dir.path().to_str().unwrap())]).unwrap();
        assert_eq!(config.resolved_ner_backend(), NerBackend::Heuristic);
        assert!(config.require_ner().is_ok());
    }

    #[test]
    fn test_onnx_without_model_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_from(&[
            ("SHORTLIST_MODEL_DIR", dir.path().to_str().unwrap()),
            ("SHORTLIST_NER", "onnx"),
        ])
        .unwrap();
        let err = config.require_ner().unwrap_err().to_string();
        assert!(err.contains(&ner_model_dir(dir.path()).display().to_string()));
        assert!(err.contains("bert-base-NER"));
    }

    #[test]
    fn test_non_finite_confidence_rejected() {
        for value in ["NaN", "inf", "-inf"] {
            let err = config_from(&[("SHORTLIST_OCR_CONFIDENCE", value)]).unwrap_err();
            assert!(err.to_string().contains("SHORTLIST_OCR_CONFIDENCE"), "{value}");
        }
    }

    #[test]
    fn test_spell_dictionary_values() {
        let spell = |value: &str| {
            config_from(&[("SHORTLIST_SPELL_DICT", value)])
                .unwrap()
                .spell_dictionary
        };
        assert_eq!(spell("off"), SpellDictionary::Off);
        assert_eq!(spell("None"), SpellDictionary::Off);
        assert_eq!(spell("bundled"), SpellDictionary::Bundled);
        assert_eq!(
            spell("./words.txt"),
            SpellDictionary::File(PathBuf::from("./words.txt"))
        );
    }
}
