//! Handlers for `/api/word-tags` endpoints. All require a bearer token and
//! act on the caller's own marks; `stats` is admin-only.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/word-tags/mark` | Body: `{"wordId"}` |
//! | `POST` | `/api/word-tags/unmark` | Body: `{"wordId"}` |
//! | `GET`  | `/api/word-tags/status/{wordId}` | One word's [`MarkStatus`] |
//! | `POST` | `/api/word-tags/status` | Body: `{"wordIds":[..]}` |
//! | `GET`  | `/api/word-tags/progress` | [`UserProgress`] |
//! | `GET`  | `/api/word-tags/known` | Known words, most recent first; optional paging |
//! | `GET`  | `/api/word-tags/known-ids` | Ids of known words |
//! | `GET`  | `/api/word-tags/user-stats` | [`UserWordStats`] |
//! | `POST` | `/api/word-tags/forget` | Body: `{"wordIds":[..]}` |
//! | `POST` | `/api/word-tags/forget-all` | Body: `{"confirm":true}` |
//! | `GET`  | `/api/word-tags/stats` | Admin; [`WordTagStats`] |

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wordhero_core::{
  page::Page,
  tag::{
    ForgetResult, KnownWordIds, MarkStatus, MarkedWord, UserProgress, UserWordStats,
    WordTagStats,
  },
};

use crate::{
  AppState, Backend,
  auth::{AdminUser, CurrentUser},
  envelope::{ApiResult, Envelope},
  extract::{Json, Path, Query},
  words::PageParams,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordIdBody {
  pub word_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordIdsBody {
  pub word_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmBody {
  #[serde(default)]
  pub confirm: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatus {
  pub word_mark_statuses: Vec<MarkStatus>,
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// `POST /api/word-tags/mark`
pub async fn mark<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<WordIdBody>,
) -> ApiResult<MarkStatus> {
  Ok(Envelope::ok(state.tags.mark_as_known(body.word_id, user.user_id).await?))
}

/// `POST /api/word-tags/unmark`
pub async fn unmark<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<WordIdBody>,
) -> ApiResult<MarkStatus> {
  Ok(Envelope::ok(state.tags.remove_mark(body.word_id, user.user_id).await?))
}

/// `POST /api/word-tags/forget`
pub async fn forget<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<WordIdsBody>,
) -> ApiResult<ForgetResult> {
  Ok(Envelope::ok(state.tags.forget_words(user.user_id, body.word_ids).await?))
}

/// `POST /api/word-tags/forget-all`
pub async fn forget_all<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<ConfirmBody>,
) -> ApiResult<ForgetResult> {
  Ok(Envelope::ok(state.tags.forget_all_words(user.user_id, body.confirm).await?))
}

// ─── Queries ──────────────────────────────────────────────────────────────────

/// `GET /api/word-tags/status/{wordId}`
pub async fn status<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Path(word_id): Path<Uuid>,
) -> ApiResult<MarkStatus> {
  Ok(Envelope::ok(state.tags.get_mark_status(word_id, user.user_id).await?))
}

/// `POST /api/word-tags/status`
pub async fn batch_status<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<WordIdsBody>,
) -> ApiResult<BatchStatus> {
  let word_mark_statuses = state
    .tags
    .get_batch_mark_status(user.user_id, body.word_ids)
    .await?;
  Ok(Envelope::ok(BatchStatus { word_mark_statuses }))
}

/// `GET /api/word-tags/progress`
pub async fn progress<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> ApiResult<UserProgress> {
  Ok(Envelope::ok(state.tags.get_user_progress(user.user_id).await?))
}

/// `GET /api/word-tags/known[?pageNum=..][&pageSize=..]`
pub async fn known<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<PageParams>,
) -> ApiResult<Page<MarkedWord>> {
  let page = state.paging.resolve(params.page_num, params.page_size);
  let words = state
    .vocabulary
    .get_known_words_by_user(user.user_id, page)
    .await?;
  Ok(Envelope::ok(words))
}

/// `GET /api/word-tags/known-ids`
pub async fn known_ids<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> ApiResult<KnownWordIds> {
  Ok(Envelope::ok(state.tags.get_known_word_ids(user.user_id).await?))
}

/// `GET /api/word-tags/user-stats`
pub async fn user_stats<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> ApiResult<UserWordStats> {
  Ok(Envelope::ok(state.tags.get_user_word_stats(user.user_id).await?))
}

/// `GET /api/word-tags/stats`
pub async fn stats<S: Backend>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
) -> ApiResult<WordTagStats> {
  Ok(Envelope::ok(state.tags.get_word_tag_stats().await?))
}
