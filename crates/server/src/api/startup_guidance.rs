use axum::extract::State;
use pathpilot_ai::GenerationOptions;
use pathpilot_core::{ProjectDetails, prompts::startup_guidance_prompt};
use pathpilot_shared::{AppError, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::utils::{ApiKeyConfigured, AppState};

const GUIDANCE_OPTIONS: GenerationOptions = GenerationOptions::new(1000, 0.3);

#[derive(Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StartupGuidance {
  pub project_details: ProjectDetails,
  /// Identifiers of the journey steps already done
  #[schema(value_type = Vec<Object>)]
  pub completed_steps: Vec<Value>,
  pub current_stage: String,
}

#[derive(Serialize, ToSchema)]
pub struct StartupGuidanceResult {
  /// HTML formatted guidance
  pub guidance: String,
}

/// Advice for the next steps of a startup project
#[utoipa::path(
  post,
  path = "/get-startup-guidance",
  request_body = StartupGuidance,
  responses(
    (status = 200, description = "HTML guidance", body = StartupGuidanceResult),
    (status = 500, description = "Missing API key or provider failure", body = pathpilot_shared::ErrorBody)
  )
)]
#[axum::debug_handler]
pub async fn get_startup_guidance(
  State(state): State<AppState>,
  _: ApiKeyConfigured,
  Json(payload): Json<StartupGuidance>,
) -> Result<Json<StartupGuidanceResult>, AppError> {
  let prompt = startup_guidance_prompt(
    &payload.project_details,
    &payload.completed_steps,
    &payload.current_stage,
  );
  let guidance = state.generate(&prompt, GUIDANCE_OPTIONS).await?;

  Ok(Json(StartupGuidanceResult { guidance }))
}
