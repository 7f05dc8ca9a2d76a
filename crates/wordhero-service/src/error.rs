//! Error type for `wordhero-service`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] wordhero_core::Error),

  /// The underlying store failed. Never retried.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("password hashing failed: {0}")]
  PasswordHash(String),
}

impl Error {
  /// The domain error carried by this error, if any.
  pub fn as_core(&self) -> Option<&wordhero_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

/// Wrap a store error.
pub(crate) fn storage<E>(err: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Storage(Box::new(err))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
