use anyhow::anyhow;
use async_openai::types::embeddings::CreateEmbeddingRequestArgs;
use async_trait::async_trait;

use crate::OpenAiProvider;

/// Embedding collaborator.
///
/// Implementations hide the provider's response shape: callers always get one
/// row per input text, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
  async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

impl OpenAiProvider {
  async fn embed_request(&self, inputs: Vec<String>) -> anyhow::Result<Vec<(u32, Vec<f32>)>> {
    let request = CreateEmbeddingRequestArgs::default()
      .model(&self.embedding_model)
      .input(inputs)
      .build()?;

    let response = self.client.embeddings().create(request).await?;

    Ok(
      response
        .data
        .into_iter()
        .map(|e| (e.index, e.embedding))
        .collect(),
    )
  }
}

#[async_trait]
impl Embedder for OpenAiProvider {
  async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
      return Ok(vec![]);
    }

    match self.embed_request(texts.to_vec()).await {
      Ok(batch) => {
        if let Some(rows) = order_rows(batch, texts.len()) {
          return Ok(rows);
        }
        tracing::debug!(
          inputs = texts.len(),
          "batch embedding not honoured by provider, embedding one text per request"
        );
      }
      // A single text has no smaller form to fall back to.
      Err(err) if texts.len() == 1 => return Err(err),
      Err(err) => {
        tracing::debug!(
          inputs = texts.len(),
          "batch embedding rejected, embedding one text per request: {err:#}"
        );
      }
    }

    let mut rows = Vec::with_capacity(texts.len());
    for text in texts {
      let single = self.embed_request(vec![text.clone()]).await?;
      let row = order_rows(single, 1)
        .and_then(|mut r| r.pop())
        .ok_or_else(|| anyhow!("provider returned no embedding for a single input"))?;
      rows.push(row);
    }
    Ok(rows)
  }
}

/// Normalise a provider answer into input order.
///
/// Returns `None` when the answer does not carry exactly one embedding per input,
/// e.g. a single embedding for a whole batch.
#[must_use]
pub fn order_rows(mut data: Vec<(u32, Vec<f32>)>, expected: usize) -> Option<Vec<Vec<f32>>> {
  if data.len() != expected {
    return None;
  }
  data.sort_by_key(|(index, _)| *index);
  Some(data.into_iter().map(|(_, embedding)| embedding).collect())
}

#[cfg(test)]
mod tests {
  use pathpilot_shared::AppEnv;
  use pretty_assertions::assert_eq;
  use serde_json::{Value, json};
  use wiremock::{
    Match, Mock, MockServer, Request, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;

  /// Matches embedding requests by their `input` array.
  struct Inputs(&'static [&'static str]);

  impl Match for Inputs {
    fn matches(&self, request: &Request) -> bool {
      serde_json::from_slice::<Value>(&request.body)
        .is_ok_and(|body| body["input"] == json!(self.0))
    }
  }

  fn embedding_response(rows: &[(u32, Vec<f32>)]) -> ResponseTemplate {
    let data: Vec<Value> = rows
      .iter()
      .map(|(index, embedding)| {
        json!({"object": "embedding", "index": index, "embedding": embedding})
      })
      .collect();
    ResponseTemplate::new(200).set_body_json(json!({
      "object": "list",
      "model": "text-embedding-004",
      "data": data,
      "usage": {"prompt_tokens": 3, "total_tokens": 3}
    }))
  }

  fn rejection() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
      "error": {
        "message": "batch input is not supported",
        "type": "invalid_request_error",
        "param": null,
        "code": null
      }
    }))
  }

  async fn mount(server: &MockServer, inputs: &'static [&'static str], response: ResponseTemplate) {
    Mock::given(method("POST"))
      .and(path("/embeddings"))
      .and(Inputs(inputs))
      .respond_with(response)
      .expect(1)
      .mount(server)
      .await;
  }

  fn provider(server: &MockServer) -> OpenAiProvider {
    let base_url = server.uri();
    let env = AppEnv::from_lookup(|key| match key {
      "GEMINI_API_KEY" => Some("test-key".to_owned()),
      "API_BASE_URL" => Some(base_url.clone()),
      _ => None,
    })
    .unwrap();
    OpenAiProvider::new(&env)
  }

  fn texts(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
  }

  #[tokio::test]
  async fn batch_answer_is_used_in_one_request() {
    let server = MockServer::start().await;
    mount(
      &server,
      &["a", "b", "c"],
      embedding_response(&[
        (0, vec![1.0, 0.0]),
        (1, vec![0.0, 1.0]),
        (2, vec![1.0, 1.0]),
      ]),
    )
    .await;

    let rows = provider(&server).embed(&texts(&["a", "b", "c"])).await.unwrap();
    assert_eq!(rows, vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]);
  }

  #[tokio::test]
  async fn batch_rows_follow_input_order() {
    let server = MockServer::start().await;
    mount(
      &server,
      &["a", "b", "c"],
      embedding_response(&[(2, vec![3.0]), (0, vec![1.0]), (1, vec![2.0])]),
    )
    .await;

    let rows = provider(&server).embed(&texts(&["a", "b", "c"])).await.unwrap();
    assert_eq!(rows, vec![vec![1.0], vec![2.0], vec![3.0]]);
  }

  #[tokio::test]
  async fn single_vector_for_a_batch_falls_back_to_per_text_requests() {
    let server = MockServer::start().await;
    mount(&server, &["a", "b", "c"], embedding_response(&[(0, vec![9.0])])).await;
    mount(&server, &["a"], embedding_response(&[(0, vec![1.0])])).await;
    mount(&server, &["b"], embedding_response(&[(0, vec![2.0])])).await;
    mount(&server, &["c"], embedding_response(&[(0, vec![3.0])])).await;

    let rows = provider(&server).embed(&texts(&["a", "b", "c"])).await.unwrap();
    assert_eq!(rows, vec![vec![1.0], vec![2.0], vec![3.0]]);
  }

  #[tokio::test]
  async fn rejected_batch_falls_back_to_per_text_requests() {
    let server = MockServer::start().await;
    mount(&server, &["a", "b"], rejection()).await;
    mount(&server, &["a"], embedding_response(&[(0, vec![1.0, 0.0])])).await;
    mount(&server, &["b"], embedding_response(&[(0, vec![0.0, 1.0])])).await;

    let rows = provider(&server).embed(&texts(&["a", "b"])).await.unwrap();
    assert_eq!(rows, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
  }

  #[tokio::test]
  async fn rejected_single_text_is_an_error() {
    let server = MockServer::start().await;
    mount(&server, &["a"], rejection()).await;

    assert!(provider(&server).embed(&texts(&["a"])).await.is_err());
  }

  #[tokio::test]
  async fn empty_input_makes_no_request() {
    let server = MockServer::start().await;
    assert_eq!(provider(&server).embed(&[]).await.unwrap(), Vec::<Vec<f32>>::new());
    assert!(server.received_requests().await.unwrap().is_empty());
  }

  #[test]
  fn rows_follow_provider_index() {
    let data = vec![(1, vec![0.0, 1.0]), (0, vec![1.0, 0.0])];
    assert_eq!(
      order_rows(data, 2),
      Some(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
    );
  }

  #[test]
  fn single_embedding_for_a_batch_is_rejected() {
    let data = vec![(0, vec![1.0, 0.0])];
    assert_eq!(order_rows(data, 3), None);
  }

  #[test]
  fn single_input_single_answer() {
    let data = vec![(0, vec![0.5, 0.5])];
    assert_eq!(order_rows(data, 1), Some(vec![vec![0.5, 0.5]]));
  }
}
