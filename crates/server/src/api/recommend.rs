use axum::extract::State;
use pathpilot_ai::GenerationOptions;
use pathpilot_core::{
  Profile,
  prompts::{recommendation_prompt, resume_prompt, retrieved_context},
};
use pathpilot_shared::{AppError, Json};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::utils::{ApiKeyConfigured, AppState};

const PROFILE_OPTIONS: GenerationOptions = GenerationOptions::new(700, 0.2);

/// Either a résumé, or the structured profile fields.
#[derive(Deserialize, ToSchema)]
pub struct Recommend {
  /// Plain résumé text; when non-empty the profile fields are ignored
  pub resume: Option<String>,
  #[serde(flatten)]
  pub profile: Profile,
}

/// Career recommendations from a résumé or a profile
#[utoipa::path(
  post,
  path = "/recommend",
  request_body = Recommend,
  responses(
    (status = 200, description = "`{recommendations: [...]}` for a résumé, the model's object for a profile"),
    (status = 500, description = "Missing API key, provider failure or unparseable model output", body = pathpilot_shared::ErrorBody)
  )
)]
#[axum::debug_handler]
pub async fn recommend(
  State(state): State<AppState>,
  _: ApiKeyConfigured,
  Json(payload): Json<Recommend>,
) -> Result<Json<Value>, AppError> {
  match payload.resume.as_deref().map(str::trim) {
    Some(resume) if !resume.is_empty() => recommend_from_resume(&state, resume).await,
    _ => recommend_from_profile(&state, &payload.profile).await,
  }
}

async fn recommend_from_resume(state: &AppState, resume: &str) -> Result<Json<Value>, AppError> {
  let (recommendations, _) = state
    .generate_json(&resume_prompt(resume), GenerationOptions::default())
    .await?;

  Ok(Json(json!({ "recommendations": recommendations })))
}

async fn recommend_from_profile(
  state: &AppState,
  profile: &Profile,
) -> Result<Json<Value>, AppError> {
  let profile_text = profile.to_prompt_text();

  let retrieved = state.retrieve(&profile_text, state.env.top_k).await?;
  for (rank, entry) in &retrieved {
    tracing::debug!(
      index = rank.index,
      score = rank.score,
      title = %entry.title,
      "retrieved career"
    );
  }
  let context = retrieved_context(retrieved.iter().map(|(_, entry)| *entry));

  let (parsed, raw) = state
    .generate_json(&recommendation_prompt(&profile_text, &context), PROFILE_OPTIONS)
    .await?;

  if is_blank(&parsed) {
    return Err(AppError::parse(
      anyhow::anyhow!("Failed to parse model output: empty result"),
      raw,
    ));
  }

  Ok(Json(parsed))
}

fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Object(map) => map.is_empty(),
    Value::Array(items) => items.is_empty(),
    _ => false,
  }
}
