use pathpilot_server::{AppState, server};
use pathpilot_shared::{AppEnv, AppError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
  dotenvy::dotenv().ok();
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
          "{}=debug,pathpilot_server=debug,pathpilot_core=debug,pathpilot_ai=debug,pathpilot_shared=debug,tower_http=debug",
          env!("CARGO_CRATE_NAME")
        )
        .into()
      }),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let env = AppEnv::from_env()?;
  if !env.has_api_key() {
    tracing::warn!(
      "GEMINI_API_KEY is not set, generation routes will answer with a configuration error"
    );
  }

  // Catalog embeddings are built before the listener binds.
  let state = AppState::bootstrap(env).await;

  server(state).await
}
