// Contact entity extraction: rules for email/phone, a model for names.
//
// Emails and phone numbers have rigid enough shapes that regexes beat any
// model. Names don't, so they go through a NameRecognizer: a local BERT NER
// model when it's downloaded, a layout heuristic otherwise.

pub mod download;
pub mod heuristic;
pub mod onnx;
pub mod rules;
pub mod traits;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use traits::NameRecognizer;

/// A name candidate with more words than this is almost certainly a
/// sentence fragment the model mis-tagged.
const MAX_NAME_WORDS: usize = 5;

/// Contact details pulled from a resume. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntities {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Extract name, email, and phone from raw (uncleaned) resume text.
///
/// Recognizer failures are logged and leave the name empty; they never fail
/// the resume.
pub fn extract_entities(text: &str, recognizer: &dyn NameRecognizer) -> ContactEntities {
    let mut entities = ContactEntities {
        email: rules::find_email(text).unwrap_or_default(),
        phone: rules::find_phone(text).unwrap_or_default(),
        ..ContactEntities::default()
    };

    // Only the first PERSON span counts; later ones tend to be references.
    match recognizer.person_candidates(text) {
        Ok(candidates) => {
            if let Some(first) = candidates.first() {
                if is_plausible_name(first) {
                    entities.name = first.clone();
                } else {
                    debug!(candidate = %first, "Rejected implausible name candidate");
                }
            }
        }
        Err(e) => warn!(error = %e, "Name recognition failed"),
    }

    entities
}

fn is_plausible_name(candidate: &str) -> bool {
    let words = candidate.split_whitespace().count();
    words > 0 && words <= MAX_NAME_WORDS && !candidate.chars().any(|c| c.is_ascii_digit())
}
