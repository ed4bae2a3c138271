use axum::extract::State;
use pathpilot_shared::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::AppState;

#[derive(Serialize, ToSchema)]
pub struct Health {
  pub status: String,
  /// Generation model id in use
  pub model: String,
}

/// Liveness probe
#[utoipa::path(
  get,
  path = "/",
  responses(
    (status = 200, description = "Service is up", body = Health)
  )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
  Json(Health {
    status: "ok".to_owned(),
    model: state.generator.model().to_owned(),
  })
}
