// TF-IDF vectorization over a fixed vocabulary.
//
// Weights follow the common smoothed formulation:
//
//   tf(t, d)  = raw count of t in d
//   idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//   w(t, d)   = tf(t, d) * idf(t), then each document vector is L2-normalized
//
// The +1 smoothing keeps idf positive even for a term present in every
// document, so a keyword shared by the job and every resume still counts.

use std::collections::BTreeMap;

use super::vocabulary::Vocabulary;

/// Sparse document vector: vocabulary index → weight.
pub type SparseVector = BTreeMap<usize, f64>;

/// A fitted TF-IDF model holding one vector per input document.
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl TfIdfModel {
    /// Fit IDF over `documents` (already tokenized) and vectorize each one.
    pub fn fit(vocabulary: Vocabulary, documents: &[Vec<String>]) -> Self {
        let counts: Vec<BTreeMap<usize, f64>> = documents
            .iter()
            .map(|tokens| {
                let mut tf = BTreeMap::new();
                for (_, idx) in vocabulary.occurrences(tokens) {
                    *tf.entry(idx).or_insert(0.0) += 1.0;
                }
                tf
            })
            .collect();

        let mut df = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for &idx in tf.keys() {
                df[idx] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .into_iter()
            .map(|tf| {
                let weighted: SparseVector =
                    tf.into_iter().map(|(idx, c)| (idx, c * idf[idx])).collect();
                l2_normalize(weighted)
            })
            .collect();

        Self {
            vocabulary,
            idf,
            vectors,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The vector for document `i`, in the order documents were passed to `fit`.
    pub fn vector(&self, i: usize) -> Option<&SparseVector> {
        self.vectors.get(i)
    }

    pub fn document_count(&self) -> usize {
        self.vectors.len()
    }

    /// Fitted IDF weight for a vocabulary term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.index_of(term).map(|i| self.idf[i])
    }
}

fn l2_normalize(mut v: SparseVector) -> SparseVector {
    let norm = v.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in v.values_mut() {
            *w /= norm;
        }
    }
    v
}
