//! API error type, application codes and [`axum::response::IntoResponse`].

use axum::{
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;
use wordhero_core::Error as CoreError;
use wordhero_service::Error as ServiceError;

use crate::envelope::Envelope;

/// Application codes carried in the envelope's `code` field.
pub mod code {
  pub const SUCCESS: u32 = 0;

  pub const SYSTEM_ERROR: u32 = 100_000_001;
  pub const INVALID_REQUEST: u32 = 100_000_002;
  pub const UNAUTHORIZED: u32 = 100_000_003;
  pub const FORBIDDEN: u32 = 100_000_004;
  pub const NOT_FOUND: u32 = 100_000_005;

  pub const USER_NOT_FOUND: u32 = 100_000_101;
  pub const USER_ALREADY_EXISTS: u32 = 100_000_102;
  pub const USER_DISABLED: u32 = 100_000_104;
  pub const INVALID_TOKEN: u32 = 100_000_106;

  pub const INVALID_CREDENTIALS: u32 = 100_000_205;

  pub const WORD_NOT_FOUND: u32 = 100_000_301;

  pub const WORD_TAG_NOT_FOUND: u32 = 100_000_401;

  pub const INVALID_SEARCH_QUERY: u32 = 100_000_602;

  pub const DATABASE_ERROR: u32 = 100_000_701;

  pub const INVALID_OPERATION: u32 = 100_001_102;

  pub const VALIDATION_ERROR: u32 = 100_001_201;

  /// The canned message for `code`.
  pub fn message(code: u32) -> &'static str {
    match code {
      SUCCESS => "success",
      INVALID_REQUEST => "invalid request parameters",
      UNAUTHORIZED => "unauthorized",
      FORBIDDEN => "forbidden",
      NOT_FOUND => "resource not found",
      USER_NOT_FOUND => "user not found",
      USER_ALREADY_EXISTS => "user already exists",
      USER_DISABLED => "user is disabled",
      INVALID_TOKEN => "invalid token",
      INVALID_CREDENTIALS => "invalid credentials",
      WORD_NOT_FOUND => "word not found",
      WORD_TAG_NOT_FOUND => "word tag not found",
      INVALID_SEARCH_QUERY => "invalid search query",
      DATABASE_ERROR => "database error",
      INVALID_OPERATION => "invalid operation",
      VALIDATION_ERROR => "validation failed",
      _ => "internal system error",
    }
  }
}

/// An error returned by an API handler or extractor.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Service(#[from] ServiceError),

  #[error("missing or malformed bearer token")]
  MissingToken,

  #[error("admin role required")]
  Forbidden,

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl From<CoreError> for ApiError {
  fn from(err: CoreError) -> Self { Self::Service(err.into()) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl ApiError {
  /// The application code reported for this error.
  pub fn code(&self) -> u32 {
    match self {
      Self::MissingToken => code::UNAUTHORIZED,
      Self::Forbidden => code::FORBIDDEN,
      Self::BadRequest(_) => code::INVALID_REQUEST,
      Self::Service(ServiceError::Storage(_)) => code::DATABASE_ERROR,
      Self::Service(ServiceError::Token(_)) => code::INVALID_TOKEN,
      Self::Service(ServiceError::PasswordHash(_)) => code::SYSTEM_ERROR,
      Self::Service(ServiceError::Core(e)) => match e {
        CoreError::WordNotFound(_) => code::WORD_NOT_FOUND,
        CoreError::UserNotFound(_) => code::USER_NOT_FOUND,
        CoreError::TagNotFound { .. } => code::WORD_TAG_NOT_FOUND,
        CoreError::Validation(_) => code::VALIDATION_ERROR,
        CoreError::AlreadyExists(_) => code::USER_ALREADY_EXISTS,
        CoreError::Unauthorized(_) => code::UNAUTHORIZED,
        CoreError::InvalidCredentials => code::INVALID_CREDENTIALS,
        CoreError::AccountDisabled => code::USER_DISABLED,
        CoreError::ConfirmationRequired => code::INVALID_OPERATION,
        CoreError::InvalidPattern(_) => code::INVALID_SEARCH_QUERY,
      },
    }
  }

  pub fn status(&self) -> StatusCode {
    match self.code() {
      code::UNAUTHORIZED | code::INVALID_TOKEN | code::INVALID_CREDENTIALS => {
        StatusCode::UNAUTHORIZED
      }
      code::FORBIDDEN | code::USER_DISABLED => StatusCode::FORBIDDEN,
      code::USER_NOT_FOUND | code::WORD_NOT_FOUND | code::WORD_TAG_NOT_FOUND => {
        StatusCode::NOT_FOUND
      }
      code::USER_ALREADY_EXISTS => StatusCode::CONFLICT,
      code::DATABASE_ERROR | code::SYSTEM_ERROR => StatusCode::INTERNAL_SERVER_ERROR,
      _ => StatusCode::BAD_REQUEST,
    }
  }

  /// Client-facing message. Internal failures only ever report the canned
  /// text for their code.
  fn message(&self) -> String {
    match self {
      Self::BadRequest(detail) => detail.clone(),
      Self::Service(ServiceError::Core(
        e @ (CoreError::Validation(_)
        | CoreError::AlreadyExists(_)
        | CoreError::Unauthorized(_)
        | CoreError::InvalidPattern(_)
        | CoreError::ConfirmationRequired),
      )) => e.to_string(),
      other => code::message(other.code()).to_owned(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, "request rejected");
    }
    let body = Envelope::<()>::error(self.code(), self.message());
    (status, body).into_response()
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn storage_errors_never_leak_detail() {
    let err = ApiError::Service(ServiceError::Storage("disk on fire".into()));
    assert_eq!(err.code(), code::DATABASE_ERROR);
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message(), "database error");
  }

  #[test]
  fn domain_errors_map_to_their_codes() {
    let missing = ApiError::from(CoreError::WordNotFound(Uuid::new_v4()));
    assert_eq!(missing.code(), code::WORD_NOT_FOUND);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let invalid = ApiError::from(CoreError::Validation("wordIds must not be empty".into()));
    assert_eq!(invalid.code(), code::VALIDATION_ERROR);
    assert_eq!(invalid.message(), "validation failed: wordIds must not be empty");

    assert_eq!(ApiError::from(CoreError::AccountDisabled).status(), StatusCode::FORBIDDEN);
    assert_eq!(ApiError::from(CoreError::ConfirmationRequired).code(), code::INVALID_OPERATION);
  }

  #[test]
  fn every_code_is_non_zero() {
    assert_ne!(ApiError::MissingToken.code(), code::SUCCESS);
    assert_ne!(ApiError::Forbidden.code(), code::SUCCESS);
    assert_ne!(ApiError::BadRequest("x".into()).code(), code::SUCCESS);
  }
}
