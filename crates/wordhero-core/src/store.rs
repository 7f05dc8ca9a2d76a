//! The storage traits: [`WordStore`], [`UserStore`] and [`WordTagStore`].
//!
//! Backends (e.g. `wordhero-store-sqlite`) implement all three. Services in
//! `wordhero-service` depend on these abstractions and receive a concrete
//! store at construction time.
//!
//! All methods return `Send` futures so the traits can be used from a
//! multi-threaded tokio runtime behind `axum`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  page::Pagination,
  tag::{KnownWord, WordTag, WordTagStats},
  user::{NewUser, Role, User, UserPatch},
  word::{NewWord, Word, WordFilter, WordPatch, WordStats},
};

// ─── Words ───────────────────────────────────────────────────────────────────

pub trait WordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new word. The input is expected to be normalised already.
  fn create_word(
    &self,
    input: NewWord,
  ) -> impl Future<Output = Result<Word, Self::Error>> + Send + '_;

  fn get_word(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Word>, Self::Error>> + Send + '_;

  /// Fetch many words in one round trip. Unknown ids are skipped; the
  /// result order is unspecified.
  fn get_words(
    &self,
    ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Vec<Word>, Self::Error>> + Send + '_;

  /// Apply `patch` to an existing word. Returns `None` if it does not exist.
  fn update_word(
    &self,
    id: Uuid,
    patch: WordPatch,
  ) -> impl Future<Output = Result<Option<Word>, Self::Error>> + Send + '_;

  /// Hard-delete a word and its tags. Returns whether a row was removed.
  fn delete_word(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// One page of the corpus in insertion order, plus the corpus size.
  /// `None` returns the entire corpus.
  fn list_words(
    &self,
    page: Option<Pagination>,
  ) -> impl Future<Output = Result<(Vec<Word>, u64), Self::Error>> + Send + '_;

  /// Every word, ordered by English text.
  fn all_words(
    &self,
  ) -> impl Future<Output = Result<Vec<Word>, Self::Error>> + Send + '_;

  /// Substring match over English and Chinese text, ordered by English
  /// text. Only ASCII letters are matched case-insensitively.
  fn search_words(
    &self,
    text: String,
  ) -> impl Future<Output = Result<Vec<Word>, Self::Error>> + Send + '_;

  fn random_words(
    &self,
    count: u32,
  ) -> impl Future<Output = Result<Vec<Word>, Self::Error>> + Send + '_;

  fn filter_words(
    &self,
    filter: WordFilter,
  ) -> impl Future<Output = Result<Vec<Word>, Self::Error>> + Send + '_;

  fn count_words(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Insert every word in a single transaction. Returns the inserted count.
  fn bulk_import(
    &self,
    words: Vec<NewWord>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Remove the whole corpus (and, through it, every tag).
  fn delete_all_words(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Empty the corpus and insert `words` in a single transaction. Returns
  /// the removed and inserted counts; on failure the old corpus is kept.
  fn replace_words(
    &self,
    words: Vec<NewWord>,
  ) -> impl Future<Output = Result<(u64, u64), Self::Error>> + Send + '_;

  fn word_stats(
    &self,
  ) -> impl Future<Output = Result<WordStats, Self::Error>> + Send + '_;
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Account storage. Soft-deleted users are invisible to every read.
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether `error` is a uniqueness violation raised by
  /// [`create_user`](Self::create_user).
  fn is_conflict(error: &Self::Error) -> bool;

  /// Persist a new account. Fails if the username or email is taken by a
  /// non-deleted user.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Resolve a login identifier that may be either a username or an email.
  fn find_by_login(
    &self,
    login: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn username_exists(
    &self,
    username: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn email_exists(
    &self,
    email: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn touch_last_login(
    &self,
    id: Uuid,
    at: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_profile(
    &self,
    id: Uuid,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn update_password(
    &self,
    id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn set_active(
    &self,
    id: Uuid,
    active: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn set_role(
    &self,
    id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn soft_delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Users ordered by creation time, newest first.
  fn list_users(
    &self,
    page: Option<Pagination>,
  ) -> impl Future<Output = Result<(Vec<User>, u64), Self::Error>> + Send + '_;

  fn count_users(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}

// ─── Word tags ───────────────────────────────────────────────────────────────

/// The per-user "known" relation. At most one row exists per
/// `(word_id, user_id)`.
pub trait WordTagStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the tag row if needed and set `known = at`. An existing
  /// timestamp is only ever moved forward.
  fn mark_known(
    &self,
    word_id: Uuid,
    user_id: Uuid,
    at: i64,
  ) -> impl Future<Output = Result<WordTag, Self::Error>> + Send + '_;

  fn get_tag(
    &self,
    word_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<WordTag>, Self::Error>> + Send + '_;

  /// Tags of `user_id` for the given words, in one round trip.
  fn get_tags(
    &self,
    user_id: Uuid,
    word_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Vec<WordTag>, Self::Error>> + Send + '_;

  /// Null the `known` column. Returns `false` if no row exists for the pair.
  fn unmark(
    &self,
    word_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Known words of a user, most recently marked first, plus their count.
  fn known_words(
    &self,
    user_id: Uuid,
    page: Option<Pagination>,
  ) -> impl Future<Output = Result<(Vec<KnownWord>, u64), Self::Error>> + Send + '_;

  fn count_known(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Known words marked at or after `since`.
  fn count_known_since(
    &self,
    user_id: Uuid,
    since: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Null `known` for the listed words that this user currently knows.
  /// Returns the number of rows that changed.
  fn forget_words(
    &self,
    user_id: Uuid,
    word_ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn forget_all(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Global tag statistics with the `recent` most recently marked tags.
  fn tag_stats(
    &self,
    recent: u32,
  ) -> impl Future<Output = Result<WordTagStats, Self::Error>> + Send + '_;
}
