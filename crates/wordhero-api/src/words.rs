//! Handlers for `/api/words` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/words` | Optional `pageNum`, `pageSize` |
//! | `GET`  | `/api/words/marked` | Bearer; same paging, each word carries the caller's mark |
//! | `GET`  | `/api/words/search` | `q` required; `regex=true` for pattern search; optional paging |
//! | `GET`  | `/api/words/random` | Optional `count` (default 10, max 100) |
//! | `GET`  | `/api/words/stats` | Corpus size by category and difficulty |
//! | `GET`  | `/api/words/count` | Corpus size |
//! | `GET`  | `/api/words/category/{category}` | Exact category match |
//! | `GET`  | `/api/words/difficulty/{difficulty}` | Exact difficulty match |
//! | `GET`  | `/api/words/{id}` | Single word |

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wordhero_core::{
  page::{Page, Pager},
  tag::MarkedWord,
  word::{Word, WordStats},
};

use crate::{
  AppState, Backend,
  auth::CurrentUser,
  envelope::{ApiResult, Envelope},
  extract::{Path, Query},
};

/// `pageNum` / `pageSize`, both optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
  pub page_num:  Option<u32>,
  pub page_size: Option<u32>,
}

// ─── Pages ────────────────────────────────────────────────────────────────────

/// `GET /api/words[?pageNum=..][&pageSize=..]`
pub async fn list<S: Backend>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> ApiResult<Page<Word>> {
  let page = state.paging.resolve(params.page_num, params.page_size);
  Ok(Envelope::ok(state.vocabulary.get_words_by_page(page).await?))
}

/// `GET /api/words/marked[?pageNum=..][&pageSize=..]`
pub async fn list_marked<S: Backend>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Query(params): Query<PageParams>,
) -> ApiResult<Page<MarkedWord>> {
  let page = state.paging.resolve(params.page_num, params.page_size);
  let words = state
    .vocabulary
    .get_words_by_page_with_marks(page, user.user_id)
    .await?;
  Ok(Envelope::ok(words))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  #[serde(default)]
  pub q:         String,
  /// Treat `q` as a case-insensitive regular expression.
  #[serde(default)]
  pub regex:     bool,
  pub page_num:  Option<u32>,
  pub page_size: Option<u32>,
}

/// `GET /api/words/search?q=..[&regex=true][&pageNum=..][&pageSize=..]`
///
/// Queries shorter than two characters return an empty result.
pub async fn search<S: Backend>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> ApiResult<Page<Word>> {
  let hits = if params.regex {
    state.vocabulary.search_words_with_regex(&params.q).await?
  } else {
    state.vocabulary.search_words(&params.q).await?
  };

  let page = match state.paging.resolve(params.page_num, params.page_size) {
    Some(p) => Pager::new(hits, p.page_size).page(p.page_num),
    None => {
      let total = hits.len() as u64;
      Page::unpaginated(hits, total)
    }
  };
  Ok(Envelope::ok(page))
}

// ─── Lookups ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RandomParams {
  pub count: Option<u32>,
}

/// `GET /api/words/random[?count=..]`
pub async fn random<S: Backend>(
  State(state): State<AppState<S>>,
  Query(params): Query<RandomParams>,
) -> ApiResult<Vec<Word>> {
  let words = state
    .vocabulary
    .get_random_words(params.count.unwrap_or(0))
    .await?;
  Ok(Envelope::ok(words))
}

/// `GET /api/words/stats`
pub async fn stats<S: Backend>(State(state): State<AppState<S>>) -> ApiResult<WordStats> {
  Ok(Envelope::ok(state.vocabulary.get_stats().await?))
}

#[derive(Debug, Serialize)]
pub struct WordCount {
  pub total: u64,
}

/// `GET /api/words/count`
pub async fn count<S: Backend>(State(state): State<AppState<S>>) -> ApiResult<WordCount> {
  let total = state.vocabulary.get_word_count().await?;
  Ok(Envelope::ok(WordCount { total }))
}

/// `GET /api/words/category/{category}`
pub async fn by_category<S: Backend>(
  State(state): State<AppState<S>>,
  Path(category): Path<String>,
) -> ApiResult<Vec<Word>> {
  Ok(Envelope::ok(state.vocabulary.get_words_by_category(&category).await?))
}

/// `GET /api/words/difficulty/{difficulty}`
pub async fn by_difficulty<S: Backend>(
  State(state): State<AppState<S>>,
  Path(difficulty): Path<String>,
) -> ApiResult<Vec<Word>> {
  Ok(Envelope::ok(state.vocabulary.get_words_by_difficulty(&difficulty).await?))
}

/// `GET /api/words/{id}`
pub async fn get_one<S: Backend>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> ApiResult<Word> {
  Ok(Envelope::ok(state.vocabulary.get_word(id).await?))
}
