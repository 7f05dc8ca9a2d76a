//! Error type for `wordhero-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] wordhero_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("id list encoding error: {0}")]
  Json(#[from] serde_json::Error),

  /// A column held a value that does not map onto a domain type.
  #[error("decode error: {0}")]
  Decode(String),

  /// A uniqueness constraint rejected the write.
  #[error("conflict: {0}")]
  Conflict(String),
}

impl Error {
  /// Translate a unique-constraint violation into [`Error::Conflict`] and
  /// leave every other database error untouched.
  pub(crate) fn from_write(err: tokio_rusqlite::Error, what: &str) -> Self {
    match &err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
        if f.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Self::Conflict(format!("{what} already exists"))
      }
      _ => Self::Database(err),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
