use std::{backtrace::BacktraceStatus, fmt::Display};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Machine-readable failure category carried in every error body.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  /// Missing or invalid server configuration, e.g. no API key.
  Configuration,
  /// Required request input missing or malformed.
  Validation,
  /// The embedding provider failed after retries.
  Embedding,
  /// The text-generation provider failed after retries.
  Generation,
  /// Model output could not be recovered as the expected JSON.
  Parse,
  Internal,
}

/// JSON body written for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
  pub error: String,
  pub kind: ErrorKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
  /// Raw model output, attached when parsing it failed.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub raw: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub backtrace: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
  err: anyhow::Error,
  kind: ErrorKind,
  status_code: StatusCode,
  hint: Option<String>,
  raw: Option<String>,
}

impl AppError {
  /// Create with 500 status
  pub fn new<E: Into<anyhow::Error>>(err: E) -> Self {
    Self::with_kind(ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR, err)
  }

  /// Create with custom status; 4xx statuses are reported as validation errors
  pub fn with_status<E: Into<anyhow::Error>>(status: StatusCode, err: E) -> Self {
    let kind = if status.is_client_error() {
      ErrorKind::Validation
    } else {
      ErrorKind::Internal
    };
    Self::with_kind(kind, status, err)
  }

  pub fn with_kind<E: Into<anyhow::Error>>(kind: ErrorKind, status: StatusCode, err: E) -> Self {
    Self {
      err: err.into(),
      kind,
      status_code: status,
      hint: None,
      raw: None,
    }
  }

  pub fn configuration<E: Into<anyhow::Error>>(err: E) -> Self {
    Self::with_kind(
      ErrorKind::Configuration,
      StatusCode::INTERNAL_SERVER_ERROR,
      err,
    )
  }

  pub fn validation<E: Into<anyhow::Error>>(err: E) -> Self {
    Self::with_kind(ErrorKind::Validation, StatusCode::BAD_REQUEST, err)
  }

  pub fn embedding<E: Into<anyhow::Error>>(err: E) -> Self {
    Self::with_kind(ErrorKind::Embedding, StatusCode::INTERNAL_SERVER_ERROR, err)
  }

  pub fn generation<E: Into<anyhow::Error>>(err: E) -> Self {
    Self::with_kind(
      ErrorKind::Generation,
      StatusCode::INTERNAL_SERVER_ERROR,
      err,
    )
  }

  /// Parse failure with the offending model output attached.
  pub fn parse<E: Into<anyhow::Error>>(err: E, raw: impl Into<String>) -> Self {
    Self::with_kind(ErrorKind::Parse, StatusCode::INTERNAL_SERVER_ERROR, err).with_raw(raw)
  }

  #[must_use]
  pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
    self.hint = Some(hint.into());
    self
  }

  #[must_use]
  pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
    self.raw = Some(raw.into());
    self
  }

  #[must_use]
  pub const fn status_code(&self) -> StatusCode {
    self.status_code
  }

  #[must_use]
  pub const fn kind(&self) -> ErrorKind {
    self.kind
  }

  fn into_body(self) -> ErrorBody {
    // Backtraces only leak into responses from debug builds (requires `RUST_BACKTRACE=1`)
    let backtrace = if cfg!(debug_assertions) {
      let bt = self.err.backtrace();
      (bt.status() == BacktraceStatus::Captured).then(|| bt.to_string())
    } else {
      None
    };

    ErrorBody {
      error: format!("{:#}", self.err),
      kind: self.kind,
      hint: self.hint,
      raw: self.raw,
      backtrace,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    if self.status_code.is_server_error() {
      tracing::error!(kind = %self.kind, status = %self.status_code, "{:#}", self.err);
    } else {
      tracing::debug!(kind = %self.kind, status = %self.status_code, "{:#}", self.err);
    }

    let status = self.status_code;
    (status, Json(self.into_body())).into_response()
  }
}

impl Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}: {:#}", self.status_code, self.kind, self.err)
  }
}

impl<E> From<E> for AppError
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Self::new(err)
  }
}

#[cfg(test)]
mod tests {
  use anyhow::anyhow;
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn kind_serializes_as_snake_case() {
    assert_eq!(ErrorKind::Configuration.to_string(), "configuration");
    let kind: &'static str = ErrorKind::Parse.into();
    assert_eq!(kind, "parse");
    assert_eq!(
      serde_json::to_value(ErrorKind::Generation).unwrap(),
      serde_json::json!("generation")
    );
  }

  #[test]
  fn status_defaults_follow_kind() {
    assert_eq!(
      AppError::validation(anyhow!("role is required")).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      AppError::configuration(anyhow!("no key")).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
      AppError::with_status(StatusCode::NOT_FOUND, anyhow!("nope")).kind(),
      ErrorKind::Validation
    );
  }

  #[test]
  fn body_carries_hint_and_raw() {
    let body = AppError::parse(anyhow!("not json"), "oops")
      .with_hint("retry later")
      .into_body();
    assert_eq!(body.kind, ErrorKind::Parse);
    assert_eq!(body.error, "not json");
    assert_eq!(body.hint.as_deref(), Some("retry later"));
    assert_eq!(body.raw.as_deref(), Some("oops"));
  }

  #[test]
  fn context_chain_is_flattened_into_message() {
    let err = anyhow!("connection reset").context("Generation error");
    let body = AppError::generation(err).into_body();
    assert_eq!(body.error, "Generation error: connection reset");
  }
}
