// Selective spell correction for OCR output.
//
// Tesseract tends to garble individual letters in otherwise clean words
// ("Exper1ence", "Pythcn"). Given a frequency dictionary, we replace unknown
// alphabetic words with the most frequent known word within edit distance
// one, falling back to distance two. Numbers, short words, and anything with
// punctuation are left alone since those are usually names, versions, or
// identifiers that no dictionary knows.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Default dictionary: common English plus resume vocabulary.
const BUNDLED_WORDS: &str = include_str!("words_en.txt");

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Words shorter than this are never corrected.
const MIN_CORRECTABLE_LEN: usize = 4;

/// Dictionary-backed corrector. A disabled corrector passes text through.
#[derive(Debug, Clone, Default)]
pub struct SpellCorrector {
    frequencies: Option<HashMap<String, u64>>,
}

impl SpellCorrector {
    /// A corrector that never changes anything.
    pub fn disabled() -> Self {
        Self { frequencies: None }
    }

    /// Build a corrector from an in-memory word/frequency list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let frequencies = words
            .into_iter()
            .map(|(w, f)| (w.into().to_lowercase(), f))
            .collect();
        Self {
            frequencies: Some(frequencies),
        }
    }

    /// Load a dictionary file: one word per line, optionally followed by a
    /// whitespace-separated frequency. Lines starting with `#` are ignored.
    /// Words without a frequency count as 1.
    pub fn from_dictionary(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read spell dictionary {}", path.display()))?;
        let source = path.display().to_string();
        let frequencies = parse_frequencies(&contents, &source)?;

        info!(
            words = frequencies.len(),
            path = %source,
            "Loaded spell dictionary"
        );
        Ok(Self {
            frequencies: Some(frequencies),
        })
    }

    /// The English word list compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let frequencies = parse_frequencies(BUNDLED_WORDS, "bundled word list")?;
        debug!(words = frequencies.len(), "Loaded bundled spell dictionary");
        Ok(Self {
            frequencies: Some(frequencies),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.frequencies.is_some()
    }

    /// Correct every eligible word, preserving line structure.
    pub fn correct_text(&self, text: &str) -> String {
        if !self.is_enabled() {
            return text.to_string();
        }
        text.lines()
            .map(|line| {
                line.split_whitespace()
                    .map(|word| self.correct_word(word))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Correct a single token, or return it unchanged.
    pub fn correct_word(&self, word: &str) -> String {
        let Some(freqs) = &self.frequencies else {
            return word.to_string();
        };
        if word.chars().count() < MIN_CORRECTABLE_LEN || !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }

        let lower = word.to_lowercase();
        if freqs.contains_key(&lower) {
            return word.to_string();
        }

        let first = edits1(&lower);
        let candidate = best_known(freqs, first.iter().cloned())
            .or_else(|| best_known(freqs, first.iter().flat_map(|e| edits1(e))));

        match candidate {
            Some(fixed) => restore_case(word, &fixed),
            None => word.to_string(),
        }
    }
}

/// Parse "word [frequency]" lines; `source` names the input in errors.
fn parse_frequencies(contents: &str, source: &str) -> Result<HashMap<String, u64>> {
    let mut frequencies = HashMap::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else { continue };
        let freq = match parts.next() {
            Some(f) => f
                .parse::<u64>()
                .with_context(|| format!("Invalid frequency on line {} of {}", line_no + 1, source))?,
            None => 1,
        };
        *frequencies.entry(word.to_lowercase()).or_insert(0) += freq;
    }
    Ok(frequencies)
}

/// The most frequent known word among `candidates`; ties break alphabetically.
fn best_known<I>(freqs: &HashMap<String, u64>, candidates: I) -> Option<String>
where
    I: Iterator<Item = String>,
{
    let mut best: Option<(u64, String)> = None;
    for candidate in candidates {
        if let Some(&freq) = freqs.get(&candidate) {
            let better = match &best {
                None => true,
                Some((best_freq, best_word)) => {
                    freq > *best_freq || (freq == *best_freq && candidate < *best_word)
                }
            };
            if better {
                best = Some((freq, candidate));
            }
        }
    }
    best.map(|(_, word)| word)
}

/// All strings one deletion, transposition, replacement, or insertion away.
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut out = Vec::with_capacity(54 * n + 25);

    for i in 0..n {
        let mut v = chars.clone();
        v.remove(i);
        out.push(v.into_iter().collect());
    }
    for i in 0..n.saturating_sub(1) {
        let mut v = chars.clone();
        v.swap(i, i + 1);
        out.push(v.into_iter().collect());
    }
    for i in 0..n {
        for c in ALPHABET.chars() {
            if chars[i] != c {
                let mut v = chars.clone();
                v[i] = c;
                out.push(v.into_iter().collect());
            }
        }
    }
    for i in 0..=n {
        for c in ALPHABET.chars() {
            let mut v = chars.clone();
            v.insert(i, c);
            out.push(v.into_iter().collect());
        }
    }
    out
}

/// Apply the capitalization pattern of `original` to `fixed`.
fn restore_case(original: &str, fixed: &str) -> String {
    if original.chars().all(char::is_uppercase) {
        fixed.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = fixed.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        fixed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> SpellCorrector {
        SpellCorrector::from_words([
            ("experience", 500),
            ("python", 300),
            ("database", 200),
            ("manager", 120),
            ("manage", 80),
        ])
    }

    #[test]
    fn test_disabled_passthrough() {
        let s = SpellCorrector::disabled();
        assert_eq!(s.correct_text("Pythcn  databse"), "Pythcn  databse");
    }

    #[test]
    fn test_single_edit_correction() {
        assert_eq!(corrector().correct_word("pythcn"), "python");
        assert_eq!(corrector().correct_word("databse"), "database");
    }

    #[test]
    fn test_two_edit_correction() {
        assert_eq!(corrector().correct_word("expirence"), "experience");
    }

    #[test]
    fn test_case_restored() {
        assert_eq!(corrector().correct_word("Pythcn"), "Python");
        assert_eq!(corrector().correct_word("PYTHCN"), "PYTHON");
    }

    #[test]
    fn test_frequency_breaks_ties() {
        // "managr" is one edit from both "manager" and "manage".
        assert_eq!(corrector().correct_word("managr"), "manager");
    }

    #[test]
    fn test_ineligible_words_untouched() {
        let s = corrector();
        assert_eq!(s.correct_word("SQL"), "SQL");
        assert_eq!(s.correct_word("py3k"), "py3k");
        assert_eq!(s.correct_word("jane@mail.com"), "jane@mail.com");
        assert_eq!(s.correct_word("Zyxwvut"), "Zyxwvut");
    }

    #[test]
    fn test_known_word_untouched() {
        assert_eq!(corrector().correct_word("Database"), "Database");
    }

    #[test]
    fn test_lines_preserved() {
        let out = corrector().correct_text("Pythcn  dev\nDatabse admin");
        assert_eq!(out, "Python dev\nDatabase admin");
    }

    #[test]
    fn test_from_dictionary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "# common words\npython 10\ndatabase\n\n").unwrap();
        let s = SpellCorrector::from_dictionary(&path).unwrap();
        assert!(s.is_enabled());
        assert_eq!(s.correct_word("pythn"), "python");
    }

    #[test]
    fn test_from_dictionary_bad_frequency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "python lots\n").unwrap();
        let err = SpellCorrector::from_dictionary(&path).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_bundled_dictionary_corrects_resume_words() {
        let s = SpellCorrector::bundled().unwrap();
        assert!(s.is_enabled());
        assert_eq!(s.correct_word("Experiance"), "Experience");
        assert_eq!(s.correct_word("Managment"), "Management");
        assert_eq!(s.correct_word("pythcn"), "python");
        assert_eq!(s.correct_word("Oracle"), "Oracle");
        assert_eq!(s.correct_text("Databse engineer"), "Database engineer");
    }
}
