//! Vector primitives used by the semantic cache

/// Guard added to norms so degenerate (all-zero) vectors never divide by zero
pub const NORM_EPSILON: f32 = 1e-8;

/// Euclidean length of a vector
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scales a vector to unit length in place
///
/// An all-zero vector stays all-zero.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v) + NORM_EPSILON;

    for x in v.iter_mut() {
        *x /= norm;
    }
}

/// Cosine similarity `dot(a, b) / (|a| * |b| + eps)`
///
/// Returns 0.0 for vectors of different length or for empty input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();

    dot_product / (l2_norm(a) * l2_norm(b) + NORM_EPSILON)
}

/// Truncates or zero-pads `v` to exactly `dim` entries
///
/// Returns the original length so callers can report drift.
pub fn coerce_dimension(v: &mut Vec<f32>, dim: usize) -> usize {
    let original = v.len();
    v.resize(dim, 0.0);
    original
}
