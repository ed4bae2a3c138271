use anyhow::{anyhow, bail};
use pathpilot_ai::Embedder;
use pathpilot_shared::RetryPolicy;

use crate::similarity::l2_normalize;

/// Dense `[rows, dim]` matrix of catalog embeddings; row `i` belongs to catalog entry `i`.
///
/// Rows are stored L2-normalised, so a dot product against a normalised query
/// is the cosine similarity. A matrix is always complete: construction fails
/// rather than producing a partially populated one.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
  rows: usize,
  dim: usize,
  data: Vec<f32>,
}

impl EmbeddingMatrix {
  pub fn from_rows(rows: Vec<Vec<f32>>) -> anyhow::Result<Self> {
    let dim = rows
      .first()
      .map(Vec::len)
      .ok_or_else(|| anyhow!("cannot build an embedding matrix without rows"))?;
    if dim == 0 {
      bail!("embedding rows must not be empty");
    }

    let count = rows.len();
    let mut data = Vec::with_capacity(count * dim);
    for (index, row) in rows.iter().enumerate() {
      if row.len() != dim {
        bail!(
          "embedding row {index} has dimension {}, expected {dim}",
          row.len()
        );
      }
      data.extend(l2_normalize(row));
    }

    Ok(Self {
      rows: count,
      dim,
      data,
    })
  }

  #[must_use]
  pub const fn rows(&self) -> usize {
    self.rows
  }

  #[must_use]
  pub const fn dim(&self) -> usize {
    self.dim
  }

  pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
    self.data.chunks_exact(self.dim)
  }
}

/// Embed every catalog text once, at startup.
///
/// Returns `None` instead of an error when there is nothing to embed or the
/// provider keeps failing; retrieval then runs without catalog context.
pub async fn build_embedding_matrix(
  embedder: &dyn Embedder,
  texts: &[String],
  retry: &RetryPolicy,
) -> Option<EmbeddingMatrix> {
  if texts.is_empty() {
    tracing::warn!("career dataset is empty, continuing without embeddings");
    return None;
  }

  let matrix = retry
    .run("embed career dataset", || embedder.embed(texts))
    .await
    .and_then(|rows| {
      if rows.len() == texts.len() {
        EmbeddingMatrix::from_rows(rows)
      } else {
        Err(anyhow!(
          "expected {} embeddings, provider returned {}",
          texts.len(),
          rows.len()
        ))
      }
    });

  match matrix {
    Ok(matrix) => {
      tracing::info!(
        rows = matrix.rows(),
        dim = matrix.dim(),
        "career embeddings ready"
      );
      Some(matrix)
    }
    Err(err) => {
      tracing::error!("failed to precompute career embeddings, continuing without them: {err:#}");
      None
    }
  }
}
