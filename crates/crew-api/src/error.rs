//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"message": "..."}`. Store failures are logged with
//! their cause and answered with a generic message only.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The request body could not be read as JSON; keeps axum's status
  /// (400 syntax, 413 too large, 415 content type, 422 wrong shape).
  #[error("rejected body ({0}): {1}")]
  Rejected(StatusCode, String),

  /// `message` is what the client sees; `source` is only logged.
  #[error("{message}: {source}")]
  Store {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a store failure under a client-facing `message`.
  pub fn store<E>(message: &'static str) -> impl FnOnce(E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    move |e| ApiError::Store { message, source: Box::new(e) }
  }

  pub fn person_not_found() -> Self { ApiError::NotFound("Person not found".into()) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Rejected(rejection.status(), rejection.body_text())
  }
}

impl From<crew_core::Error> for ApiError {
  fn from(e: crew_core::Error) -> Self {
    match e {
      crew_core::Error::Validation(m) => ApiError::BadRequest(m),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Rejected(status, m) => (status, m),
      ApiError::Store { message, source } => {
        tracing::error!(error = %source, "{message}");
        (StatusCode::INTERNAL_SERVER_ERROR, message.to_owned())
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
