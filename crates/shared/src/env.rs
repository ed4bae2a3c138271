use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, anyhow};

const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_GEN_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_EMBED_MODEL: &str = "text-embedding-004";
const DEFAULT_TOP_K: usize = 3;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_BACKOFF: f64 = 1.5;
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_PATH: &str = "data/careers.json";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppEnv {
  /// `None` when `GEMINI_API_KEY` is unset or blank.
  pub api_key: Option<String>,
  pub api_base_url: String,
  /// Always carries the `models/` prefix.
  pub gen_model: String,
  pub embed_model: String,
  pub top_k: usize,
  pub max_retries: u32,
  pub retry_backoff: f64,
  pub port: u16,
  pub data_path: PathBuf,
}

impl AppEnv {
  /// Read configuration from the process environment.
  ///
  /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Build configuration from an arbitrary key lookup.
  pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let var = |key: &str| {
      lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
    };

    let retry_backoff = parse_or(&var, "GEN_RETRY_BACKOFF", DEFAULT_RETRY_BACKOFF)?;
    if !retry_backoff.is_finite() || retry_backoff < 0.0 {
      return Err(anyhow!(
        "GEN_RETRY_BACKOFF must be a non-negative number, got {retry_backoff}"
      ));
    }

    Ok(Self {
      api_key: var("GEMINI_API_KEY"),
      api_base_url: var("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned()),
      gen_model: normalize_model(&var("GEN_MODEL").unwrap_or_default()),
      embed_model: var("EMBED_MODEL").unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_owned()),
      top_k: parse_or(&var, "TOP_K", DEFAULT_TOP_K)?,
      max_retries: parse_or(&var, "GEN_RETRIES", DEFAULT_MAX_RETRIES)?,
      retry_backoff,
      port: parse_or(&var, "PORT", DEFAULT_PORT)?,
      data_path: var("DATA_PATH").map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from),
    })
  }

  #[must_use]
  pub fn has_api_key(&self) -> bool {
    self.api_key.is_some()
  }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
  F: Fn(&str) -> Option<String>,
{
  var(key).map_or(Ok(default), |raw| {
    raw
      .parse()
      .with_context(|| format!("invalid value for {key}: {raw:?}"))
  })
}

/// Accept either `gemini-1.5-flash` or `models/gemini-1.5-flash`.
#[must_use]
pub fn normalize_model(model: &str) -> String {
  let model = model.trim();
  if model.is_empty() {
    format!("models/{DEFAULT_GEN_MODEL}")
  } else if model.starts_with("models/") {
    model.to_owned()
  } else {
    format!("models/{model}")
  }
}
