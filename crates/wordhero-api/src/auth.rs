//! Bearer-token extractors.
//!
//! [`CurrentUser`] resolves `Authorization: Bearer <token>` through the auth
//! service, so a deactivated or deleted account is rejected even while its
//! token is unexpired. [`AdminUser`] additionally requires the admin role.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use uuid::Uuid;
use wordhero_core::user::Role;

use crate::{AppState, Backend, error::ApiError};

/// The raw token from the `Authorization` header, unverified.
pub struct BearerToken(pub String);

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser {
  pub user_id:  Uuid,
  pub username: String,
  pub role:     Role,
}

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

fn bearer(headers: &HeaderMap) -> Result<String, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .ok_or(ApiError::MissingToken)
}

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
    bearer(&parts.headers).map(BearerToken)
  }
}

impl<S: Backend> FromRequestParts<AppState<S>> for CurrentUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer(&parts.headers)?;
    let user = state.auth.validate_token(&token).await?;
    Ok(CurrentUser { user_id: user.id, username: user.username, role: user.role })
  }
}

impl<S: Backend> FromRequestParts<AppState<S>> for AdminUser {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = CurrentUser::from_request_parts(parts, state).await?;
    if !user.role.is_admin() {
      tracing::warn!(user_id = %user.user_id, "admin route refused");
      return Err(ApiError::Forbidden);
    }
    Ok(AdminUser(user))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    map
  }

  #[test]
  fn extracts_bearer_token() {
    assert_eq!(bearer(&headers("Bearer abc.def")).unwrap(), "abc.def");
  }

  #[test]
  fn missing_header() {
    assert!(matches!(bearer(&HeaderMap::new()), Err(ApiError::MissingToken)));
  }

  #[test]
  fn wrong_scheme_or_empty_token() {
    assert!(matches!(bearer(&headers("Basic dXNlcjpwYXNz")), Err(ApiError::MissingToken)));
    assert!(matches!(bearer(&headers("Bearer   ")), Err(ApiError::MissingToken)));
  }
}
