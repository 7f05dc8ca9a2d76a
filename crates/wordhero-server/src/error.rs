//! Error type for server startup and the one-shot subcommands.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  Config(#[from] config::ConfigError),

  #[error("store error: {0}")]
  Store(#[from] wordhero_store_sqlite::Error),

  #[error("import error: {0}")]
  Import(#[from] wordhero_import::Error),

  #[error(transparent)]
  Service(#[from] wordhero_service::Error),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
