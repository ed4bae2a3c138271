use axum::Router;
use pathpilot_shared::AppError;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
  api,
  utils::{AppState, shutdown_signal},
};

/// Full application router, CORS and request tracing included.
pub fn router(state: AppState) -> Router {
  api::app()
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

pub async fn server(state: AppState) -> Result<(), AppError> {
  let port = state.env.port;
  let app = router(state);

  let listener = TcpListener::bind(("0.0.0.0", port)).await?;

  tracing::info!("server started at http://0.0.0.0:{port}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}
