use anyhow::bail;
use serde::Serialize;

use crate::EmbeddingMatrix;

/// Added to every L2 norm so all-zero vectors normalise to zero instead of NaN.
pub const NORM_EPSILON: f32 = 1e-10;

/// A catalog position and its cosine similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedResult {
  pub index: usize,
  /// Cosine similarity in [-1.0, 1.0]
  pub score: f32,
}

/// Scale `vector` to unit length, with [`NORM_EPSILON`] guarding the denominator.
#[must_use]
pub fn l2_normalize(vector: &[f32]) -> Vec<f32> {
  let norm_sq = vector
    .iter()
    .map(|&x| f64::from(x))
    .fold(0.0_f64, |acc, x| x.mul_add(x, acc));
  #[allow(clippy::cast_possible_truncation)]
  let denom = norm_sq.sqrt() as f32 + NORM_EPSILON;
  vector.iter().map(|x| x / denom).collect()
}

/// Rank catalog rows by cosine similarity to `query`, best first.
///
/// Returns at most `k` results; ties keep ascending catalog order. An absent
/// matrix yields an empty ranking rather than an error.
pub fn top_k(
  query: &[f32],
  matrix: Option<&EmbeddingMatrix>,
  k: usize,
) -> anyhow::Result<Vec<RankedResult>> {
  let Some(matrix) = matrix else {
    return Ok(vec![]);
  };
  if query.len() != matrix.dim() {
    bail!(
      "query embedding has dimension {}, catalog embeddings have {}",
      query.len(),
      matrix.dim()
    );
  }

  let query = l2_normalize(query);
  let mut ranked: Vec<RankedResult> = matrix
    .iter_rows()
    .enumerate()
    .map(|(index, row)| RankedResult {
      index,
      score: dot(&query, row).clamp(-1.0, 1.0),
    })
    .collect();

  // `sort_by` is stable; the explicit index tie-break keeps equal scores in catalog order.
  ranked.sort_by(|a, b| {
    b.score
      .total_cmp(&a.score)
      .then_with(|| a.index.cmp(&b.index))
  });
  ranked.truncate(k);

  Ok(ranked)
}

#[allow(clippy::cast_possible_truncation)]
fn dot(a: &[f32], b: &[f32]) -> f32 {
  a.iter()
    .zip(b)
    .fold(0.0_f64, |acc, (&x, &y)| f64::from(x).mul_add(f64::from(y), acc)) as f32
}
