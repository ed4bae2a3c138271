use anyhow::anyhow;
use async_openai::types::chat::{
  ChatCompletionRequestMessage, ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;

use crate::OpenAiProvider;

/// Sampling settings for a single generation call. `None` leaves the provider default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationOptions {
  pub temperature: Option<f32>,
  pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
  #[must_use]
  pub const fn new(max_output_tokens: u32, temperature: f32) -> Self {
    Self {
      temperature: Some(temperature),
      max_output_tokens: Some(max_output_tokens),
    }
  }
}

/// Text-generation collaborator: prompt in, generated text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
  /// Model id reported by the health route.
  fn model(&self) -> &str;

  async fn generate(&self, prompt: &str, options: GenerationOptions) -> anyhow::Result<String>;
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
  fn model(&self) -> &str {
    &self.chat_model
  }

  async fn generate(&self, prompt: &str, options: GenerationOptions) -> anyhow::Result<String> {
    let messages = vec![ChatCompletionRequestMessage::User(
      ChatCompletionRequestUserMessage::from(prompt.to_owned()),
    )];

    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(&self.chat_model).messages(messages);
    if let Some(temperature) = options.temperature {
      args.temperature(temperature);
    }
    if let Some(max_tokens) = options.max_output_tokens {
      args.max_completion_tokens(max_tokens);
    }
    let request = args.build()?;

    let text = self
      .client
      .chat()
      .create(request)
      .await
      .map(|r| r.choices.into_iter())?
      .filter_map(|c| c.message.content)
      .last()
      .ok_or_else(|| anyhow!("empty message content"))?;

    Ok(text.trim().to_owned())
  }
}
