//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
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

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<recall_core::Error> for ApiError {
  fn from(err: recall_core::Error) -> Self {
    match err {
      recall_core::Error::MissingField(field) => {
        ApiError::BadRequest(format!("{field} must not be null"))
      }
      e @ recall_core::Error::NotFound { .. } => ApiError::NotFound(e.to_string()),
      recall_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      ApiError::Store(e) => tracing::error!(error = %e, "store failure"),
      other => tracing::warn!(error = %other, "rejected request"),
    }
    let message = match &self {
      ApiError::NotFound(m) | ApiError::BadRequest(m) => m.clone(),
      ApiError::Store(e) => e.to_string(),
    };
    (status, Json(json!({ "code": status.as_u16(), "error": message }))).into_response()
  }
}
