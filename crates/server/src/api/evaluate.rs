use anyhow::anyhow;
use axum::extract::State;
use pathpilot_ai::GenerationOptions;
use pathpilot_core::prompts::evaluation_prompt;
use pathpilot_shared::{AppError, Json};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::assessment::DEFAULT_CAREER;
use crate::utils::{ApiKeyConfigured, AppState};

const DEFAULT_LANGUAGE: &str = "Python";

/// Assessment score as sent by clients: a number or a numeric string.
#[derive(Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Score {
  Int(i64),
  Float(f64),
  Text(String),
}

impl Score {
  #[allow(clippy::cast_possible_truncation)]
  fn value(&self) -> Result<i64, AppError> {
    match self {
      Self::Int(score) => Ok(*score),
      Self::Float(score) if score.is_finite() => Ok(score.trunc() as i64),
      Self::Float(score) => Err(AppError::validation(anyhow!("invalid score: {score}"))),
      Self::Text(raw) => raw
        .trim()
        .parse()
        .map_err(|_| AppError::validation(anyhow!("invalid score: {raw:?}"))),
    }
  }
}

#[derive(Deserialize, ToSchema)]
pub struct Evaluate {
  /// Baseline test score out of 10, defaults to 0
  pub score: Option<Score>,
  /// Defaults to "Software Engineer"
  pub career: Option<String>,
  /// Defaults to "Python"
  pub language: Option<String>,
}

/// Learning roadmap tailored to an assessment score
#[utoipa::path(
  post,
  path = "/evaluate",
  request_body = Evaluate,
  responses(
    (status = 200, description = "Roadmap of phases, topics, resources and quizzes"),
    (status = 400, description = "Score is not a number", body = pathpilot_shared::ErrorBody),
    (status = 500, description = "Missing API key, provider failure or model output without a roadmap", body = pathpilot_shared::ErrorBody)
  )
)]
#[axum::debug_handler]
pub async fn evaluate(
  State(state): State<AppState>,
  _: ApiKeyConfigured,
  Json(payload): Json<Evaluate>,
) -> Result<Json<Value>, AppError> {
  let score = payload.score.as_ref().map_or(Ok(0), Score::value)?;
  let career = payload.career.as_deref().unwrap_or(DEFAULT_CAREER);
  let language = payload.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);

  let (parsed, raw) = state
    .generate_json(
      &evaluation_prompt(score, career, language),
      GenerationOptions::default(),
    )
    .await?;

  if parsed.get("roadmap").is_none() {
    return Err(AppError::parse(
      anyhow!("AI response is missing the 'roadmap' key"),
      raw,
    ));
  }

  Ok(Json(parsed))
}
