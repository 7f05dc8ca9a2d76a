//! JSON REST API for Word Hero.
//!
//! Exposes an axum [`Router`] backed by any store implementing the word,
//! user and word-tag store traits. Every body is an [`Envelope`]; success
//! carries `code = 0`, failures carry one of the codes in [`error::code`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(store.clone(), tokens, PagingConfig::default());
//! let app   = wordhero_api::router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod word_tags;
pub mod words;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use wordhero_core::{
  page::{DEFAULT_PAGE_SIZE, Pagination},
  store::{UserStore, WordStore, WordTagStore},
};
use wordhero_service::{
  AuthService, TokenIssuer, UserService, VocabularyService, WordTagService,
};

pub use envelope::{ApiResult, Envelope};
pub use error::ApiError;

/// Everything a store must implement to back the API.
pub trait Backend: WordStore + UserStore + WordTagStore + 'static {}

impl<T> Backend for T where T: WordStore + UserStore + WordTagStore + 'static {}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Page-size policy applied to `pageNum` / `pageSize` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
  pub default_page_size: u32,
  pub max_page_size:     u32,
}

impl Default for PagingConfig {
  fn default() -> Self {
    Self { default_page_size: DEFAULT_PAGE_SIZE, max_page_size: 100 }
  }
}

impl PagingConfig {
  /// Turn optional query parameters into a page request.
  ///
  /// Neither parameter present means "no paging". A missing or zero size
  /// uses the default; sizes above the maximum are clamped.
  pub fn resolve(&self, page_num: Option<u32>, page_size: Option<u32>) -> Option<Pagination> {
    if page_num.is_none() && page_size.is_none() {
      return None;
    }
    let size = match page_size {
      None | Some(0) => self.default_page_size,
      Some(n) => n.min(self.max_page_size),
    };
    Some(Pagination::new(page_num.unwrap_or(1), size))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub auth:       AuthService<S>,
  pub users:      UserService<S>,
  pub vocabulary: VocabularyService<S>,
  pub tags:       WordTagService<S>,
  pub paging:     PagingConfig,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      auth:       self.auth.clone(),
      users:      self.users.clone(),
      vocabulary: self.vocabulary.clone(),
      tags:       self.tags.clone(),
      paging:     self.paging,
    }
  }
}

impl<S: Backend> AppState<S> {
  /// Build every service over one shared store.
  pub fn new(store: Arc<S>, tokens: Arc<TokenIssuer>, paging: PagingConfig) -> Self {
    Self {
      auth: AuthService::new(store.clone(), tokens),
      users: UserService::new(store.clone()),
      vocabulary: VocabularyService::new(store.clone()),
      tags: WordTagService::new(store),
      paging,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router. Unknown paths answer with an enveloped 404.
pub fn router<S: Backend>(state: AppState<S>) -> Router {
  Router::new()
    // Accounts
    .route("/api/auth/register",                 post(account::register::<S>))
    .route("/api/auth/login",                    post(account::login::<S>))
    .route("/api/auth/refresh",                  post(account::refresh::<S>))
    .route("/api/user/profile",                  get(account::profile::<S>).put(account::update_profile::<S>))
    .route("/api/user/password",                 post(account::change_password::<S>))
    // Words
    .route("/api/words",                         get(words::list::<S>))
    .route("/api/words/marked",                  get(words::list_marked::<S>))
    .route("/api/words/search",                  get(words::search::<S>))
    .route("/api/words/random",                  get(words::random::<S>))
    .route("/api/words/stats",                   get(words::stats::<S>))
    .route("/api/words/count",                   get(words::count::<S>))
    .route("/api/words/category/{category}",     get(words::by_category::<S>))
    .route("/api/words/difficulty/{difficulty}", get(words::by_difficulty::<S>))
    .route("/api/words/{id}",                    get(words::get_one::<S>))
    // Word tags
    .route("/api/word-tags/mark",                post(word_tags::mark::<S>))
    .route("/api/word-tags/unmark",              post(word_tags::unmark::<S>))
    .route("/api/word-tags/status",              post(word_tags::batch_status::<S>))
    .route("/api/word-tags/status/{word_id}",    get(word_tags::status::<S>))
    .route("/api/word-tags/progress",            get(word_tags::progress::<S>))
    .route("/api/word-tags/known",               get(word_tags::known::<S>))
    .route("/api/word-tags/known-ids",           get(word_tags::known_ids::<S>))
    .route("/api/word-tags/user-stats",          get(word_tags::user_stats::<S>))
    .route("/api/word-tags/forget",              post(word_tags::forget::<S>))
    .route("/api/word-tags/forget-all",          post(word_tags::forget_all::<S>))
    .route("/api/word-tags/stats",               get(word_tags::stats::<S>))
    // Admin
    .route("/api/admin/users",                   get(admin::list_users::<S>))
    .route("/api/admin/users/{id}",              delete(admin::delete_user::<S>))
    .route("/api/admin/users/{id}/{action}",     post(admin::user_action::<S>))
    .route("/api/admin/words",                   post(admin::create_word::<S>))
    .route("/api/admin/words/{id}",              put(admin::update_word::<S>).delete(admin::delete_word::<S>))
    .fallback(envelope::not_found)
    .with_state(state)
}
