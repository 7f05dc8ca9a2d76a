//! Error type for `wordhero-import`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot read word file: {0}")]
  Io(#[from] std::io::Error),

  #[error("cannot open workbook: {0}")]
  Open(#[from] calamine::Error),

  #[error("no valid words found in {0}")]
  NoValidRows(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
