use axum::{extract::FromRequestParts, http::request::Parts};
use pathpilot_shared::AppError;

use super::AppState;

/// Guard for routes that call the model provider.
///
/// Runs before the body is read, so a server without a key reports the
/// configuration error even for malformed requests.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyConfigured;

impl FromRequestParts<AppState> for ApiKeyConfigured {
  type Rejection = AppError;

  async fn from_request_parts(
    _parts: &mut Parts,
    state: &AppState,
  ) -> Result<Self, Self::Rejection> {
    state.require_api_key()?;
    Ok(Self)
  }
}
