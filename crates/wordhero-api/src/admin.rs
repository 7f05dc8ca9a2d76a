//! Handlers for `/api/admin` endpoints. Every route requires the admin role.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/admin/users` | Optional `pageNum`, `pageSize` |
//! | `POST`   | `/api/admin/users/{id}/{action}` | `activate`, `deactivate`, `promote`, `demote` |
//! | `DELETE` | `/api/admin/users/{id}` | Soft delete |
//! | `POST`   | `/api/admin/words` | Body: [`NewWord`]; returns 201 + stored word |
//! | `PUT`    | `/api/admin/words/{id}` | Body: [`WordPatch`] |
//! | `DELETE` | `/api/admin/words/{id}` | Also drops every mark on the word |

use axum::{extract::State, http::StatusCode};
use uuid::Uuid;
use wordhero_core::{
  Error as CoreError,
  page::Page,
  user::User,
  word::{NewWord, Word, WordPatch},
};
use wordhero_service::user::UserAction;

use crate::{
  AppState, Backend,
  auth::AdminUser,
  envelope::{ApiResult, Envelope},
  error::ApiError,
  extract::{Json, Path, Query},
  words::PageParams,
};

// ─── Users ────────────────────────────────────────────────────────────────────

/// `GET /api/admin/users[?pageNum=..][&pageSize=..]`
pub async fn list_users<S: Backend>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  Query(params): Query<PageParams>,
) -> ApiResult<Page<User>> {
  let page = state.paging.resolve(params.page_num, params.page_size);
  Ok(Envelope::ok(state.users.list_users(page).await?))
}

/// `POST /api/admin/users/{id}/{action}`
///
/// An admin may not deactivate or demote their own account.
pub async fn user_action<S: Backend>(
  State(state): State<AppState<S>>,
  AdminUser(admin): AdminUser,
  Path((id, action)): Path<(Uuid, String)>,
) -> ApiResult<User> {
  let action: UserAction = action.parse()?;
  if id == admin.user_id && matches!(action, UserAction::Deactivate | UserAction::Demote) {
    return Err(CoreError::Validation("cannot deactivate or demote yourself".into()).into());
  }
  let user = state.users.apply(id, action).await?;
  tracing::info!(admin_id = %admin.user_id, user_id = %id, ?action, "user action applied");
  Ok(Envelope::ok(user))
}

/// `DELETE /api/admin/users/{id}`
pub async fn delete_user<S: Backend>(
  State(state): State<AppState<S>>,
  AdminUser(admin): AdminUser,
  Path(id): Path<Uuid>,
) -> ApiResult<()> {
  if id == admin.user_id {
    return Err(CoreError::Validation("cannot delete yourself".into()).into());
  }
  state.users.delete_user(id).await?;
  Ok(Envelope::empty())
}

// ─── Words ────────────────────────────────────────────────────────────────────

/// `POST /api/admin/words`
pub async fn create_word<S: Backend>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  Json(body): Json<NewWord>,
) -> Result<(StatusCode, Envelope<Word>), ApiError> {
  let word = state.vocabulary.create_word(body).await?;
  Ok((StatusCode::CREATED, Envelope::ok(word)))
}

/// `PUT /api/admin/words/{id}`
pub async fn update_word<S: Backend>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  Path(id): Path<Uuid>,
  Json(patch): Json<WordPatch>,
) -> ApiResult<Word> {
  Ok(Envelope::ok(state.vocabulary.update_word(id, patch).await?))
}

/// `DELETE /api/admin/words/{id}`
pub async fn delete_word<S: Backend>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  Path(id): Path<Uuid>,
) -> ApiResult<()> {
  state.vocabulary.delete_word(id).await?;
  Ok(Envelope::empty())
}
