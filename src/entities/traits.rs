// Name recognizer trait: lets the pipeline run with or without the NER model.

use anyhow::Result;

/// Trait for finding person names in free text.
pub trait NameRecognizer: Send + Sync {
    /// Return PERSON spans in document order. The text is raw OCR output,
    /// with line breaks and capitalization intact.
    fn person_candidates(&self, text: &str) -> Result<Vec<String>>;
}
