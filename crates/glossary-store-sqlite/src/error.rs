//! Error type for `glossary-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] glossary_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<Error> for glossary_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(core) => core,
      other => glossary_core::Error::Backend(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
