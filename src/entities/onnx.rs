// Local ONNX named-entity recognizer for candidate names.
//
// Runs a BERT token-classification model fine-tuned on CoNLL-2003
// (bert-base-NER). The model tags every word piece with one of nine BIO
// labels; we merge consecutive PER pieces back into spans using the
// tokenizer's byte offsets into the original text.
//
// Model: protectai/bert-base-NER-onnx (~430MB)

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::{Encoding, Tokenizer};
use tracing::debug;

use super::traits::NameRecognizer;

/// bert-base-NER label order, used when the model directory has no config.json.
pub const DEFAULT_LABELS: [&str; 9] = [
    "O", "B-MISC", "I-MISC", "B-PER", "I-PER", "B-ORG", "I-ORG", "B-LOC", "I-LOC",
];

/// BERT's positional embedding limit.
const MAX_TOKENS: usize = 512;

/// The subset of a HuggingFace config.json we need.
#[derive(Debug, Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

/// ONNX-backed NER tagger. The session sits behind a Mutex because
/// `Session::run` takes `&mut self` and the trait requires `Sync`.
pub struct OnnxNerTagger {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
}

impl OnnxNerTagger {
    /// Load the model, tokenizer, and (optionally) label config from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json`. Run `shortlist download-model`
    /// first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "NER model not found: {}\nRun `shortlist download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "NER tokenizer not found: {}\nRun `shortlist download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        let labels = load_labels(&model_dir.join("config.json"))?;

        debug!(
            labels = labels.len(),
            "Loaded ONNX NER model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
        })
    }
}

impl NameRecognizer for OnnxNerTagger {
    fn person_candidates(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let mut input = EncodedInput::from_encoding(&encoding);
        input.truncate(MAX_TOKENS);
        let EncodedInput {
            ids,
            mask,
            type_ids,
            offsets,
            special,
        } = input;

        let seq_len = ids.len();
        let shape = [1_i64, seq_len as i64];
        let input_ids = Tensor::from_array((shape, ids)).context("Failed to create input_ids tensor")?;
        let attention_mask =
            Tensor::from_array((shape, mask)).context("Failed to create attention_mask tensor")?;
        let token_type_ids =
            Tensor::from_array((shape, type_ids)).context("Failed to create token_type_ids tensor")?;

        let logits = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs! {
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                    "token_type_ids" => token_type_ids
                })
                .context("ONNX inference failed")?;

            // Output shape: [1, seq_len, num_labels]
            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .context("Failed to extract logits tensor")?;
            data.to_vec()
        };

        let token_labels = argmax_labels(&logits, seq_len, &self.labels)?;
        let spans = decode_person_spans(text, &offsets, &token_labels, &special);
        debug!(spans = spans.len(), "NER tagged person spans");
        Ok(spans)
    }
}

/// Model inputs plus the per-token data needed to decode spans.
#[derive(Debug, Clone, PartialEq)]
struct EncodedInput {
    ids: Vec<i64>,
    mask: Vec<i64>,
    type_ids: Vec<i64>,
    offsets: Vec<(usize, usize)>,
    special: Vec<bool>,
}

impl EncodedInput {
    fn from_encoding(encoding: &Encoding) -> Self {
        Self {
            ids: encoding.get_ids().iter().map(|&i| i as i64).collect(),
            mask: encoding.get_attention_mask().iter().map(|&m| m as i64).collect(),
            type_ids: encoding.get_type_ids().iter().map(|&t| t as i64).collect(),
            offsets: encoding.get_offsets().to_vec(),
            special: encoding.get_special_tokens_mask().iter().map(|&s| s == 1).collect(),
        }
    }

    /// Keep the head of long resumes (where the name is) and move the final
    /// [SEP] token into the last kept slot.
    fn truncate(&mut self, max_tokens: usize) {
        if max_tokens == 0 || self.ids.len() <= max_tokens {
            return;
        }
        let last = self.ids.len() - 1;
        let keep = max_tokens - 1;
        for v in [&mut self.ids, &mut self.mask, &mut self.type_ids] {
            v[keep] = v[last];
            v.truncate(max_tokens);
        }
        self.offsets[keep] = (0, 0);
        self.offsets.truncate(max_tokens);
        self.special[keep] = true;
        self.special.truncate(max_tokens);
    }
}

/// Read `id2label` from a HuggingFace config, falling back to the CoNLL set.
fn load_labels(config_path: &Path) -> Result<Vec<String>> {
    if !config_path.exists() {
        return Ok(DEFAULT_LABELS.iter().map(|s| s.to_string()).collect());
    }
    let json = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: ModelConfig = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    labels_from_id2label(&config.id2label)
}

/// Turn a `{"0": "O", "1": "B-MISC", ...}` map into an index-ordered list.
fn labels_from_id2label(id2label: &HashMap<String, String>) -> Result<Vec<String>> {
    let mut labels = vec![String::new(); id2label.len()];
    for (id, label) in id2label {
        let idx: usize = id
            .parse()
            .with_context(|| format!("Non-numeric label id in id2label: {id}"))?;
        let slot = labels
            .get_mut(idx)
            .with_context(|| format!("Label id {idx} out of range in id2label"))?;
        *slot = label.clone();
    }
    Ok(labels)
}

/// Pick the highest-scoring label for each token from flat row-major logits.
fn argmax_labels<'a>(logits: &[f32], seq_len: usize, labels: &'a [String]) -> Result<Vec<&'a str>> {
    let num_labels = labels.len();
    if num_labels == 0 || logits.len() != seq_len * num_labels {
        anyhow::bail!(
            "Unexpected logits size {} for {} tokens x {} labels",
            logits.len(),
            seq_len,
            num_labels
        );
    }
    Ok(logits
        .chunks(num_labels)
        .map(|row| {
            let best = row
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0);
            labels[best].as_str()
        })
        .collect())
}

/// Merge B-PER/I-PER tokens into text spans.
///
/// A B-PER always opens a new span; an I-PER extends the open span (or opens
/// one if the model skipped the B- tag). Any other label closes the span.
/// Special tokens are ignored.
pub fn decode_person_spans(
    text: &str,
    offsets: &[(usize, usize)],
    labels: &[&str],
    special: &[bool],
) -> Vec<String> {
    let mut spans = Vec::new();
    let mut open: Option<(usize, usize)> = None;

    let close = |open: &mut Option<(usize, usize)>, spans: &mut Vec<String>| {
        if let Some((start, end)) = open.take() {
            if let Some(s) = text.get(start..end) {
                let s = s.trim();
                if !s.is_empty() {
                    spans.push(s.to_string());
                }
            }
        }
    };

    for ((&(start, end), &label), &is_special) in offsets.iter().zip(labels).zip(special) {
        if is_special {
            continue;
        }
        match label {
            "B-PER" => {
                close(&mut open, &mut spans);
                open = Some((start, end));
            }
            "I-PER" => {
                open = Some(match open {
                    Some((s, _)) => (s, end),
                    None => (start, end),
                });
            }
            _ => close(&mut open, &mut spans),
        }
    }
    close(&mut open, &mut spans);
    spans
}
