// Vocabularies and synonym folding for TF-IDF.
//
// A controlled vocabulary pins the feature space to the job's keywords, so a
// resume's score reflects only the skills the job asks for rather than
// whatever else happens to be frequent in the batch. An open vocabulary
// (every word in the corpus) is available for exploratory runs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::text::normalize_keyword;

/// An ordered set of normalized terms. Terms may be multi-word phrases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    max_ngram: usize,
}

impl Vocabulary {
    /// Build from raw keywords. Each keyword is normalized like resume text
    /// (stop-word-only keywords are kept literally); punctuation-only
    /// keywords are dropped, and duplicates keep their first position.
    pub fn controlled<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self::from_terms(keywords.iter().map(|k| normalize_keyword(k.as_ref())))
    }

    /// Build from every distinct token in already-normalized documents,
    /// sorted alphabetically.
    pub fn open<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokens: BTreeSet<&str> = documents
            .iter()
            .flat_map(|d| d.as_ref().split_whitespace())
            .collect();
        Self::from_terms(tokens.into_iter().map(str::to_string))
    }

    /// Build from terms that are already normalized.
    pub fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Self {
        let mut vocab = Self::default();
        for term in terms {
            let term = term.split_whitespace().collect::<Vec<_>>().join(" ");
            if term.is_empty() || vocab.index.contains_key(&term) {
                continue;
            }
            vocab.max_ngram = vocab.max_ngram.max(term.split(' ').count());
            vocab.index.insert(term.clone(), vocab.terms.len());
            vocab.terms.push(term);
        }
        vocab
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Word count of the longest term (0 for an empty vocabulary).
    pub fn max_ngram(&self) -> usize {
        self.max_ngram
    }

    /// Vocabulary indexes of every term occurrence in a token stream,
    /// counting all n-grams up to the longest term.
    pub fn occurrences<'a>(&'a self, tokens: &'a [String]) -> impl Iterator<Item = (usize, usize)> + 'a {
        (0..tokens.len()).flat_map(move |pos| {
            (1..=self.max_ngram)
                .filter(move |n| pos + n <= tokens.len())
                .filter_map(move |n| {
                    self.index_of(&tokens[pos..pos + n].join(" "))
                        .map(|idx| (pos, idx))
                })
        })
    }
}

/// Folds aliases into their canonical keyword before counting,
/// e.g. `postgres` → `postgresql`.
#[derive(Debug, Clone, Default)]
pub struct SynonymMap {
    // (alias tokens, canonical tokens), longest alias first
    rules: Vec<(Vec<String>, Vec<String>)>,
}

impl SynonymMap {
    /// Build from a canonical → aliases map. Both sides are normalized.
    pub fn new(synonyms: &BTreeMap<String, Vec<String>>) -> Self {
        let mut rules = Vec::new();
        for (canonical, aliases) in synonyms {
            let canonical = tokens_of(&normalize_keyword(canonical));
            if canonical.is_empty() {
                continue;
            }
            for alias in aliases {
                let alias = tokens_of(&normalize_keyword(alias));
                if !alias.is_empty() && alias != canonical {
                    rules.push((alias, canonical.clone()));
                }
            }
        }
        rules.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Tokenize a normalized document, replacing aliases with their
    /// canonical form.
    pub fn apply(&self, normalized: &str) -> Vec<String> {
        let tokens = tokens_of(normalized);
        if self.rules.is_empty() {
            return tokens;
        }

        let mut out = Vec::with_capacity(tokens.len());
        let mut pos = 0;
        'outer: while pos < tokens.len() {
            for (alias, canonical) in &self.rules {
                if tokens[pos..].starts_with(alias) {
                    out.extend(canonical.iter().cloned());
                    pos += alias.len();
                    continue 'outer;
                }
            }
            out.push(tokens[pos].clone());
            pos += 1;
        }
        out
    }
}

fn tokens_of(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
