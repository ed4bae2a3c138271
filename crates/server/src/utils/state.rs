use std::sync::Arc;

use anyhow::anyhow;
use pathpilot_ai::{Embedder, GenerationOptions, OpenAiProvider, TextGenerator, extract_json};
use pathpilot_core::{
  Catalog, CatalogEntry, EmbeddingMatrix, RankedResult, build_embedding_matrix, top_k,
};
use pathpilot_shared::{AppEnv, AppError, RetryPolicy};
use serde_json::Value;

const MISSING_KEY_HINT: &str = "Set GEMINI_API_KEY in the server environment and restart";

/// Everything a request handler needs, built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
  pub env: Arc<AppEnv>,
  pub catalog: Arc<Catalog>,
  /// `None` when the catalog could not be embedded; retrieval is then skipped.
  pub embeddings: Option<Arc<EmbeddingMatrix>>,
  pub generator: Arc<dyn TextGenerator>,
  pub embedder: Arc<dyn Embedder>,
  pub retry: RetryPolicy,
}

impl AppState {
  #[must_use]
  pub fn new(
    env: AppEnv,
    catalog: Catalog,
    embeddings: Option<EmbeddingMatrix>,
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
  ) -> Self {
    let retry = RetryPolicy::new(env.max_retries, env.retry_backoff);
    Self {
      env: Arc::new(env),
      catalog: Arc::new(catalog),
      embeddings: embeddings.map(Arc::new),
      generator,
      embedder,
      retry,
    }
  }

  /// Load the catalog and embed it with the hosted provider.
  pub async fn bootstrap(env: AppEnv) -> Self {
    let provider = Arc::new(OpenAiProvider::new(&env));
    Self::bootstrap_with(env, provider.clone(), provider).await
  }

  /// Same as [`AppState::bootstrap`], with explicit providers.
  pub async fn bootstrap_with(
    env: AppEnv,
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
  ) -> Self {
    let catalog = Catalog::load(&env.data_path);
    let retry = RetryPolicy::new(env.max_retries, env.retry_backoff);

    let embeddings = if !env.has_api_key() {
      tracing::warn!("GEMINI_API_KEY is not set, continuing without career embeddings");
      None
    } else {
      tracing::info!(entries = catalog.len(), "generating embeddings for career dataset");
      build_embedding_matrix(embedder.as_ref(), &catalog.embedding_texts(), &retry).await
    };

    Self::new(env, catalog, embeddings, generator, embedder)
  }

  /// Fail fast, before any provider call, when no credential is configured.
  pub fn require_api_key(&self) -> Result<(), AppError> {
    if self.env.has_api_key() {
      Ok(())
    } else {
      Err(
        AppError::configuration(anyhow!("GEMINI_API_KEY is not configured on the server"))
          .with_hint(MISSING_KEY_HINT),
      )
    }
  }

  pub async fn generate(
    &self,
    prompt: &str,
    options: GenerationOptions,
  ) -> Result<String, AppError> {
    self
      .retry
      .run("generate", || self.generator.generate(prompt, options))
      .await
      .map_err(|err| AppError::generation(err.context("Generation error")))
  }

  /// Generate and recover JSON from the reply; the raw reply is kept on parse failure.
  pub async fn generate_json(
    &self,
    prompt: &str,
    options: GenerationOptions,
  ) -> Result<(Value, String), AppError> {
    let text = self.generate(prompt, options).await?;
    match extract_json(&text) {
      Ok(value) => Ok((value, text)),
      Err(err) => Err(AppError::parse(
        err.context("Failed to parse model output"),
        text,
      )),
    }
  }

  /// Embed `text` and rank the catalog against it.
  ///
  /// Returns an empty list without calling the provider when no embeddings are loaded.
  pub async fn retrieve(
    &self,
    text: &str,
    k: usize,
  ) -> Result<Vec<(RankedResult, &CatalogEntry)>, AppError> {
    let Some(matrix) = self.embeddings.as_deref() else {
      return Ok(vec![]);
    };

    let input = [text.to_owned()];
    let query = self
      .retry
      .run("embed query", || self.embedder.embed(&input))
      .await
      .and_then(|mut rows| {
        rows
          .pop()
          .ok_or_else(|| anyhow!("provider returned no embedding"))
      })
      .map_err(|err| AppError::embedding(err.context("Embedding error")))?;

    let ranked = top_k(&query, Some(matrix), k)
      .map_err(|err| AppError::embedding(err.context("Embedding error")))?;

    ranked
      .into_iter()
      .map(|result| -> Result<_, AppError> { Ok((result, self.catalog.get(result.index)?)) })
      .collect()
  }
}
