/// Compute cosine similarity between two feature vectors.
///
/// Returns a value in [-1.0, 1.0] where 1.0 means identical direction.
/// Empty, mismatched or zero-magnitude inputs score 0.0 so the result is
/// never NaN.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
  if a.is_empty() || b.is_empty() || a.len() != b.len() {
    return 0.0;
  }

  let mut dot = 0.0_f64;
  let mut norm_a = 0.0_f64;
  let mut norm_b = 0.0_f64;

  for (&x, &y) in a.iter().zip(b.iter()) {
    dot = x.mul_add(y, dot);
    norm_a = x.mul_add(x, norm_a);
    norm_b = y.mul_add(y, norm_b);
  }

  let denom = norm_a.sqrt() * norm_b.sqrt();
  if denom == 0.0 || !denom.is_finite() {
    return 0.0;
  }

  // Rounding can push identical vectors a hair past 1.0.
  (dot / denom).clamp(-1.0, 1.0)
}
