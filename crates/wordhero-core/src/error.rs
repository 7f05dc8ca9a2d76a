//! Error types for `wordhero-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("word not found: {0}")]
  WordNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("word tag not found for word {word_id} and user {user_id}")]
  TagNotFound { word_id: Uuid, user_id: Uuid },

  #[error("validation failed: {0}")]
  Validation(String),

  #[error("{0} already exists")]
  AlreadyExists(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("invalid username or password")]
  InvalidCredentials,

  #[error("account is disabled")]
  AccountDisabled,

  #[error("confirmation required to forget all words")]
  ConfirmationRequired,

  #[error("invalid search pattern: {0}")]
  InvalidPattern(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
