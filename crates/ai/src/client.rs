use async_openai::{Client, config::OpenAIConfig};
use pathpilot_shared::AppEnv;

/// Adapter for an OpenAI-compatible API, serving both chat completions and embeddings.
///
/// Gemini exposes such an endpoint, which is what the default base URL points at.
#[derive(Clone)]
pub struct OpenAiProvider {
  pub(crate) client: Client<OpenAIConfig>,
  pub(crate) chat_model: String,
  pub(crate) embedding_model: String,
}

impl OpenAiProvider {
  /// Build the adapter from configuration.
  ///
  /// A missing key yields a client that the server never calls;
  /// handlers reject requests before reaching the provider.
  #[must_use]
  pub fn new(env: &AppEnv) -> Self {
    let api_key = env.api_key.clone().unwrap_or_default();
    let config = OpenAIConfig::new()
      .with_api_key(&api_key)
      .with_api_base(&env.api_base_url);

    Self {
      client: Client::with_config(config),
      chat_model: env.gen_model.clone(),
      embedding_model: env.embed_model.clone(),
    }
  }
}
