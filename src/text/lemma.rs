// Stop word removal and rule-based English lemmatization.
//
// The lemmatizer is deliberately conservative: it only undoes inflection
// (plural nouns, -ing/-ed verb forms) and leaves anything that does not look
// like a plain English word untouched. Technology names like `node.js`,
// `sql-server` or `k8s` pass through unchanged.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use stop_words::{get, LANGUAGE};

static STOP_WORDS: LazyLock<HashSet<String>> =
    LazyLock::new(|| get(LANGUAGE::English).into_iter().collect());

/// Irregular inflections that suffix rules cannot recover.
static IRREGULAR: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("led", "lead"),
        ("built", "build"),
        ("ran", "run"),
        ("wrote", "write"),
        ("written", "write"),
        ("taught", "teach"),
        ("won", "win"),
        ("grew", "grow"),
        ("grown", "grow"),
        ("began", "begin"),
        ("begun", "begin"),
        ("made", "make"),
        ("drove", "drive"),
        ("driven", "drive"),
        ("brought", "bring"),
        ("thought", "think"),
        ("sought", "seek"),
        ("children", "child"),
        ("people", "person"),
        ("men", "man"),
        ("women", "woman"),
        ("analyses", "analysis"),
        ("indices", "index"),
        ("criteria", "criterion"),
    ])
});

/// Lowercase, tokenize, drop punctuation and stop words, and lemmatize.
///
/// The output is the surviving lemmas joined by single spaces. This is the
/// canonical form every TF-IDF document is built from.
pub fn preprocess_text(text: &str) -> String {
    let lemmas: Vec<String> = plain_tokens(text)
        .into_iter()
        .filter(|token| !is_stop_word(token))
        .map(|token| lemmatize(&token))
        .collect();
    lemmas.join(" ")
}

/// Lowercased whitespace tokens with leading/trailing punctuation trimmed.
/// Punctuation-only tokens are dropped; stop words are kept.
pub fn plain_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Reduce an inflected lowercase word to its dictionary form.
pub fn lemmatize(word: &str) -> String {
    if let Some(lemma) = IRREGULAR.get(word) {
        return lemma.to_string();
    }
    if word.len() <= 3 || !word.chars().all(|c| c.is_ascii_lowercase()) {
        return word.to_string();
    }
    if ["ss", "us", "is", "os"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }

    if let Some(lemma) = strip_plural(word) {
        return lemma;
    }
    if let Some(lemma) = strip_verbal(word) {
        return lemma;
    }
    word.to_string()
}

fn strip_plural(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return Some(format!("{stem}y"));
        }
    }
    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if word.ends_with(suffix) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    // "ss" endings were already excluded by the caller.
    word.strip_suffix('s').map(str::to_string)
}

fn strip_verbal(word: &str) -> Option<String> {
    if word.ends_with("eed") {
        return None;
    }
    let stem = word
        .strip_suffix("ing")
        .or_else(|| word.strip_suffix("ed"))?;
    if stem.len() < 3 || !stem.chars().any(is_vowel) {
        return None;
    }
    Some(restore_stem(stem))
}

/// Undo the spelling changes English makes when adding -ing/-ed:
/// consonant doubling (`running`) and silent-e dropping (`optimized`).
fn restore_stem(stem: &str) -> String {
    if ["at", "bl", "iz"].iter().any(|s| stem.ends_with(s)) {
        return format!("{stem}e");
    }

    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    let last = chars[n - 1];
    let prev = chars[n - 2];

    if last == prev && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z') {
        return chars[..n - 1].iter().collect();
    }
    if last == 'v' {
        return format!("{stem}e");
    }
    if matches!(last, 'c' | 'g') && is_vowel(prev) && !is_vowel(chars[n.saturating_sub(3)]) {
        return format!("{stem}e");
    }
    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}
