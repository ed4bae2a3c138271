use anyhow::anyhow;
use axum::extract::State;
use pathpilot_ai::GenerationOptions;
use pathpilot_core::prompts::assessment_prompt;
use pathpilot_shared::{AppError, Json};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

use crate::utils::{ApiKeyConfigured, AppState};

pub(crate) const DEFAULT_CAREER: &str = "Software Engineer";

#[derive(Deserialize, ToSchema)]
pub struct Assessment {
  /// Defaults to "Software Engineer" when omitted; null or empty is rejected
  #[serde(default = "default_career", deserialize_with = "null_as_empty")]
  pub career: String,
}

fn default_career() -> String {
  DEFAULT_CAREER.to_owned()
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Proficiency quiz for a career
#[utoipa::path(
  post,
  path = "/assessment",
  request_body = Assessment,
  responses(
    (status = 200, description = "`{questions: [...], roadmap: string}`"),
    (status = 400, description = "No career path provided", body = pathpilot_shared::ErrorBody),
    (status = 500, description = "Missing API key, provider failure or unparseable model output", body = pathpilot_shared::ErrorBody)
  )
)]
#[axum::debug_handler]
pub async fn assessment(
  State(state): State<AppState>,
  _: ApiKeyConfigured,
  Json(payload): Json<Assessment>,
) -> Result<Json<Value>, AppError> {
  let career = payload.career.trim();
  if career.is_empty() {
    return Err(AppError::validation(anyhow!("No career path provided")));
  }

  let (parsed, raw) = state
    .generate_json(&assessment_prompt(career), GenerationOptions::default())
    .await?;

  if parsed.get("questions").is_none() {
    return Err(AppError::parse(
      anyhow!("AI response is missing the 'questions' key"),
      raw,
    ));
  }

  Ok(Json(parsed))
}
