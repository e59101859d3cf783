// Cosine similarity between sparse TF-IDF vectors.

use super::tfidf::SparseVector;

/// Cosine of the angle between two sparse vectors.
///
/// Returns 0.0 when either vector has (near) zero magnitude, and clamps the
/// result to 0.0..=1.0 so floating-point drift never reports >1 or a
/// negative score.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(idx, wa)| large.get(idx).map(|wb| wa * wb))
        .sum();

    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
    let denom = norm_a * norm_b;
    if denom < f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(pairs: &[(usize, f64)]) -> SparseVector {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_identical_vectors() {
        let a = vec_of(&[(0, 0.6), (1, 0.8)]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let a = vec_of(&[(0, 1.0)]);
        let b = vec_of(&[(1, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_vector_scores_zero() {
        let a = vec_of(&[(0, 1.0)]);
        let empty = SparseVector::new();
        assert_eq!(cosine_similarity(&a, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_scale_invariant() {
        let a = vec_of(&[(0, 1.0), (2, 3.0)]);
        let b = vec_of(&[(0, 10.0), (2, 30.0)]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let a = vec_of(&[(0, 0.5), (1, 0.3)]);
        let b = vec_of(&[(0, 0.2), (3, 0.8), (4, 0.1)]);
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-12);
    }
}
