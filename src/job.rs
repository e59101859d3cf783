// Job profile: the description resumes are scored against, plus the
// keyword lists that drive prefiltering and the controlled vocabulary.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring::suggest::suggest_keywords;
use crate::scoring::VocabularyMode;

/// How many keywords to suggest when the profile lists none.
pub const SUGGESTED_KEYWORD_COUNT: usize = 20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobProfile {
    #[serde(default)]
    pub title: String,
    pub description: String,
    /// Every one of these must appear in a resume for it to be scored
    #[serde(default)]
    pub required_keywords: Vec<String>,
    /// Controlled vocabulary for TF-IDF
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Canonical keyword → aliases that should count as it
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
}

impl JobProfile {
    /// Read and validate a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job profile {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid job profile {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(raw)?;
        if profile.description.trim().is_empty() {
            anyhow::bail!("Job description is empty");
        }
        Ok(profile)
    }

    /// Keywords to build the vocabulary from.
    ///
    /// In controlled mode with no listed keywords, falls back to keywords
    /// suggested from the description itself.
    pub fn effective_keywords(&self, mode: VocabularyMode) -> Result<Vec<String>> {
        if mode == VocabularyMode::Open || !self.keywords.is_empty() {
            return Ok(self.keywords.clone());
        }
        let suggested = suggest_keywords(&self.description, SUGGESTED_KEYWORD_COUNT)?;
        warn!(
            count = suggested.len(),
            "Job profile has no keywords; using keywords suggested from the description"
        );
        Ok(suggested)
    }
}
