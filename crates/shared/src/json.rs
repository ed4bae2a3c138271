use anyhow::anyhow;
use axum::{
  extract::{FromRequest, Request},
  response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::AppError;

/// `axum::Json` whose rejections are [`AppError`]s, so a malformed body gets
/// the same `{error, kind}` response as every other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = AppError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    match axum::Json::<T>::from_request(req, state).await {
      Ok(axum::Json(value)) => Ok(Self(value)),
      Err(rejection) => Err(AppError::with_status(
        rejection.status(),
        anyhow!(rejection.body_text()),
      )),
    }
  }
}

impl<T: Serialize> IntoResponse for Json<T> {
  fn into_response(self) -> Response {
    axum::Json(self.0).into_response()
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{self, StatusCode},
  };
  use pretty_assertions::assert_eq;
  use serde::Deserialize;

  use super::*;
  use crate::ErrorKind;

  #[derive(Debug, Deserialize)]
  struct Payload {
    role: String,
  }

  fn request(content_type: &str, body: &'static str) -> Request {
    http::Request::builder()
      .method("POST")
      .uri("/")
      .header("content-type", content_type)
      .body(Body::from(body))
      .unwrap()
  }

  #[tokio::test]
  async fn valid_body_is_extracted() {
    let req = request("application/json", r#"{"role": "SRE"}"#);
    let Json(payload) = Json::<Payload>::from_request(req, &()).await.unwrap();
    assert_eq!(payload.role, "SRE");
  }

  #[tokio::test]
  async fn syntax_error_is_a_validation_error() {
    let err = Json::<Payload>::from_request(request("application/json", "not json"), &())
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn wrong_field_type_is_a_validation_error() {
    let err = Json::<Payload>::from_request(request("application/json", r#"{"role": 5}"#), &())
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn missing_content_type_is_a_validation_error() {
    let err = Json::<Payload>::from_request(request("text/plain", r#"{"role": "SRE"}"#), &())
      .await
      .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
  }
}
