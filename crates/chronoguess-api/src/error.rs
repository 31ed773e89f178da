//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chronoguess_core::{Error as CoreError, ErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unavailable: {0}")]
  Unavailable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub(crate) fn not_found() -> Self { ApiError::NotFound("Not found".into()) }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    if e.kind() == ErrorKind::NotFound {
      return ApiError::not_found();
    }
    match e {
      CoreError::UnknownLanguage(_) => {
        ApiError::BadRequest("Invalid language".into())
      }
      CoreError::InvalidPosition { .. } => {
        ApiError::BadRequest("Invalid position".into())
      }
      CoreError::NotInHand(_) => {
        ApiError::BadRequest("Occurrence not in player's hand".into())
      }
      CoreError::MatchFinished(_) => {
        ApiError::BadRequest("Match is already finished".into())
      }
      CoreError::InsufficientData { language, .. } => ApiError::Unavailable(
        format!("Not enough occurrences for language {language}"),
      ),
      other => ApiError::Store(Box::new(other)),
    }
  }
}

/// Lift a store backend error into an [`ApiError`].
pub fn store_error<E: Into<CoreError>>(e: E) -> ApiError {
  ApiError::from(Into::<CoreError>::into(e))
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
