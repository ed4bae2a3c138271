use anyhow::anyhow;
use axum::extract::State;
use pathpilot_ai::GenerationOptions;
use pathpilot_core::prompts::role_roadmap_prompt;
use pathpilot_shared::{AppError, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::{ApiKeyConfigured, AppState};

#[derive(Deserialize, ToSchema)]
pub struct RoleRoadmap {
  pub role: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RoleRoadmapResult {
  /// Model output, passed through unparsed
  pub result: String,
}

/// Skills and learning roadmap for a job role
#[utoipa::path(
  post,
  path = "/get-role-roadmap",
  request_body = RoleRoadmap,
  responses(
    (status = 200, description = "Raw model text describing the roadmap", body = RoleRoadmapResult),
    (status = 400, description = "Role is required", body = pathpilot_shared::ErrorBody),
    (status = 500, description = "Missing API key or provider failure", body = pathpilot_shared::ErrorBody)
  )
)]
#[axum::debug_handler]
pub async fn get_role_roadmap(
  State(state): State<AppState>,
  _: ApiKeyConfigured,
  Json(payload): Json<RoleRoadmap>,
) -> Result<Json<RoleRoadmapResult>, AppError> {
  let role = payload
    .role
    .as_deref()
    .map(str::trim)
    .filter(|r| !r.is_empty())
    .ok_or_else(|| AppError::validation(anyhow!("Role is required")))?;

  let result = state
    .generate(&role_roadmap_prompt(role), GenerationOptions::default())
    .await?;

  Ok(Json(RoleRoadmapResult { result }))
}
