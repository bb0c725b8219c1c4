//! Error types for `glossary-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("term not found: {0}")]
  TermNotFound(i64),

  #[error("term already exists: {0:?}")]
  DuplicateTerm(String),

  /// Any failure inside a storage backend that is not one of the above.
  #[error("storage backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
