//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
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

  /// The request would break term uniqueness. Reported as 400.
  #[error("conflict: {0}")]
  Conflict(String),

  /// Malformed path, query string or body, caught before the store is
  /// touched.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<glossary_core::Error> for ApiError {
  fn from(err: glossary_core::Error) -> Self {
    match err {
      glossary_core::Error::TermNotFound(id) => {
        ApiError::NotFound(format!("term {id} not found"))
      }
      glossary_core::Error::DuplicateTerm(term) => {
        ApiError::Conflict(format!("term {term:?} already exists"))
      }
      glossary_core::Error::Backend(e) => ApiError::Store(e),
    }
  }
}

/// Classify a backend error. Usable directly in `map_err`.
pub fn store_error<E: Into<glossary_core::Error>>(err: E) -> ApiError {
  ApiError::from(err.into())
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => {
        tracing::warn!(reason = %m, "rejected duplicate term");
        (StatusCode::BAD_REQUEST, m.clone())
      }
      ApiError::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
