//! The `{code, data?, msg?}` response envelope.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, code};

/// Every response body, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub code: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub msg:  Option<String>,
}

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self { Self { code: code::SUCCESS, data: Some(data), msg: None } }
}

impl Envelope<()> {
  /// Success with nothing to return.
  pub fn empty() -> Self { Self { code: code::SUCCESS, data: None, msg: None } }

  pub fn error(code: u32, msg: impl Into<String>) -> Self {
    Self { code, data: None, msg: Some(msg.into()) }
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}

/// Fallback for unrouted paths.
pub async fn not_found() -> impl IntoResponse {
  (
    StatusCode::NOT_FOUND,
    Envelope::<()>::error(code::NOT_FOUND, code::message(code::NOT_FOUND)),
  )
}
