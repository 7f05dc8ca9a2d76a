//! Handlers for `/api/auth` and `/api/user` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/auth/register` | Body: [`RegisterRequest`]; returns an [`AuthSession`] |
//! | `POST` | `/api/auth/login` | Body: `{"username","password"}`; username or email |
//! | `POST` | `/api/auth/refresh` | Bearer token in, fresh [`AuthSession`] out |
//! | `GET`  | `/api/user/profile` | The caller's account |
//! | `PUT`  | `/api/user/profile` | Body: [`UserPatch`] |
//! | `POST` | `/api/user/password` | Body: [`ChangePasswordRequest`] |

use axum::extract::State;
use wordhero_core::user::{User, UserPatch};
use wordhero_service::auth::{
  AuthSession, ChangePasswordRequest, LoginRequest, RegisterRequest,
};

use crate::{
  AppState, Backend,
  auth::{BearerToken, CurrentUser},
  envelope::{ApiResult, Envelope},
  extract::Json,
};

/// `POST /api/auth/register`
pub async fn register<S: Backend>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterRequest>,
) -> ApiResult<AuthSession> {
  Ok(Envelope::ok(state.auth.register(body).await?))
}

/// `POST /api/auth/login`
pub async fn login<S: Backend>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginRequest>,
) -> ApiResult<AuthSession> {
  Ok(Envelope::ok(state.auth.login(body).await?))
}

/// `POST /api/auth/refresh`
pub async fn refresh<S: Backend>(
  State(state): State<AppState<S>>,
  BearerToken(token): BearerToken,
) -> ApiResult<AuthSession> {
  Ok(Envelope::ok(state.auth.refresh_token(&token).await?))
}

/// `GET /api/user/profile`
pub async fn profile<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> ApiResult<User> {
  Ok(Envelope::ok(state.users.get_profile(user.user_id).await?))
}

/// `PUT /api/user/profile`
pub async fn update_profile<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(patch): Json<UserPatch>,
) -> ApiResult<User> {
  Ok(Envelope::ok(state.users.update_profile(user.user_id, patch).await?))
}

/// `POST /api/user/password`
pub async fn change_password<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
  state.auth.change_password(user.user_id, body).await?;
  Ok(Envelope::empty())
}
