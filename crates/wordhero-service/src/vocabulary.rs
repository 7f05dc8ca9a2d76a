//! Paged, searched and annotated views over the shared word corpus.

use std::{collections::HashMap, sync::Arc};

use regex::RegexBuilder;
use serde::Serialize;
use uuid::Uuid;
use wordhero_core::{
  Error as CoreError,
  page::{Page, Pagination},
  store::{UserStore, WordStore, WordTagStore},
  tag::{MarkStatus, MarkedWord},
  word::{NewWord, Word, WordFilter, WordPatch, WordStats},
};

use crate::{error::storage, Result};

/// Queries shorter than this (in characters) return nothing.
pub const MIN_QUERY_LEN: usize = 2;

pub const DEFAULT_RANDOM_COUNT: u32 = 10;
pub const MAX_RANDOM_COUNT: u32 = 100;

/// Outcome of [`VocabularyService::import_words`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
  pub imported: u64,
  /// Words deleted first because a clean import was requested.
  pub removed:  u64,
  /// Input rows dropped for blank text.
  pub skipped:  u64,
}

pub struct VocabularyService<S> {
  store: Arc<S>,
}

impl<S> Clone for VocabularyService<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

fn search_query(query: &str) -> Option<&str> {
  let query = query.trim();
  (query.chars().count() >= MIN_QUERY_LEN).then_some(query)
}

impl<S> VocabularyService<S>
where
  S: WordStore + UserStore + WordTagStore,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  // ── Pages ───────────────────────────────────────────────────────────────

  /// `None` returns the whole corpus as one page. Pages past the end are
  /// empty, never an error.
  pub async fn get_words_by_page(&self, page: Option<Pagination>) -> Result<Page<Word>> {
    let (words, total) = self.store.list_words(page).await.map_err(storage)?;
    Ok(Page::new(words, total, page))
  }

  /// Like [`get_words_by_page`](Self::get_words_by_page) with each word
  /// annotated with `user_id`'s mark. A failed mark lookup is logged and the
  /// page is served with every word unmarked.
  pub async fn get_words_by_page_with_marks(
    &self,
    page: Option<Pagination>,
    user_id: Uuid,
  ) -> Result<Page<MarkedWord>> {
    let words = self.get_words_by_page(page).await?;
    let ids = words.items.iter().map(|w| w.id).collect::<Vec<_>>();

    let known: HashMap<Uuid, Option<i64>> = match self.store.get_tags(user_id, ids).await {
      Ok(tags) => tags.into_iter().map(|t| (t.word_id, t.known)).collect(),
      Err(e) => {
        tracing::warn!(%user_id, error = %e, "mark lookup failed; serving page unmarked");
        HashMap::new()
      }
    };

    Ok(words.map(|word| {
      let status = match known.get(&word.id).copied().flatten() {
        Some(at) => MarkStatus {
          word_id:    word.id,
          is_marked:  true,
          mark_count: 1,
          marked_at:  Some(at),
        },
        None => MarkStatus::unmarked(word.id),
      };
      MarkedWord::new(word, &status)
    }))
  }

  // ── Search ──────────────────────────────────────────────────────────────

  /// Case-insensitive substring search over English and Chinese text.
  pub async fn search_words(&self, query: &str) -> Result<Vec<Word>> {
    let Some(query) = search_query(query) else {
      return Ok(Vec::new());
    };
    let words = self.store.search_words(query.to_owned()).await.map_err(storage)?;
    tracing::debug!(%query, hits = words.len(), "word search");
    Ok(words)
  }

  /// Case-insensitive regular-expression search over English and Chinese
  /// text. An invalid pattern is an [`CoreError::InvalidPattern`].
  pub async fn search_words_with_regex(&self, query: &str) -> Result<Vec<Word>> {
    let Some(query) = search_query(query) else {
      return Ok(Vec::new());
    };
    let re = RegexBuilder::new(query)
      .case_insensitive(true)
      .build()
      .map_err(|e| CoreError::InvalidPattern(e.to_string()))?;

    let mut words = self.store.all_words().await.map_err(storage)?;
    words.retain(|w| re.is_match(&w.english) || re.is_match(&w.chinese));
    tracing::debug!(%query, hits = words.len(), "regex word search");
    Ok(words)
  }

  // ── Known words ─────────────────────────────────────────────────────────

  /// The user's known words, most recently marked first, resolved with a
  /// single batch lookup. An unknown user is [`CoreError::UserNotFound`].
  pub async fn get_known_words_by_user(
    &self,
    user_id: Uuid,
    page: Option<Pagination>,
  ) -> Result<Page<MarkedWord>> {
    if self.store.get_user(user_id).await.map_err(storage)?.is_none() {
      return Err(CoreError::UserNotFound(user_id).into());
    }
    let (known, total) = self.store.known_words(user_id, page).await.map_err(storage)?;
    let ids = known.iter().map(|k| k.word_id).collect();
    let mut words: HashMap<Uuid, Word> = self
      .store
      .get_words(ids)
      .await
      .map_err(storage)?
      .into_iter()
      .map(|w| (w.id, w))
      .collect();

    let items = known
      .into_iter()
      .filter_map(|k| {
        let word = words.remove(&k.word_id)?;
        let status = MarkStatus {
          word_id:    k.word_id,
          is_marked:  true,
          mark_count: 1,
          marked_at:  Some(k.known_at),
        };
        Some(MarkedWord::new(word, &status))
      })
      .collect();

    Ok(Page::new(items, total, page))
  }

  // ── Lookups ─────────────────────────────────────────────────────────────

  pub async fn get_word(&self, id: Uuid) -> Result<Word> {
    self
      .store
      .get_word(id)
      .await
      .map_err(storage)?
      .ok_or_else(|| CoreError::WordNotFound(id).into())
  }

  /// `count` of 0 means [`DEFAULT_RANDOM_COUNT`]; larger requests are capped
  /// at [`MAX_RANDOM_COUNT`].
  pub async fn get_random_words(&self, count: u32) -> Result<Vec<Word>> {
    let count = match count {
      0 => DEFAULT_RANDOM_COUNT,
      n => n.min(MAX_RANDOM_COUNT),
    };
    self.store.random_words(count).await.map_err(storage)
  }

  pub async fn get_words_by_category(&self, category: &str) -> Result<Vec<Word>> {
    self
      .store
      .filter_words(WordFilter { category: Some(category.to_owned()), difficulty: None })
      .await
      .map_err(storage)
  }

  pub async fn get_words_by_difficulty(&self, difficulty: &str) -> Result<Vec<Word>> {
    self
      .store
      .filter_words(WordFilter { category: None, difficulty: Some(difficulty.to_owned()) })
      .await
      .map_err(storage)
  }

  pub async fn get_word_count(&self) -> Result<u64> {
    self.store.count_words().await.map_err(storage)
  }

  pub async fn get_stats(&self) -> Result<WordStats> {
    self.store.word_stats().await.map_err(storage)
  }

  // ── Admin edits ─────────────────────────────────────────────────────────

  pub async fn create_word(&self, input: NewWord) -> Result<Word> {
    let word = self
      .store
      .create_word(input.normalized()?)
      .await
      .map_err(storage)?;
    tracing::info!(word_id = %word.id, english = %word.english, "word created");
    Ok(word)
  }

  pub async fn update_word(&self, id: Uuid, patch: WordPatch) -> Result<Word> {
    patch.validate()?;
    let word = self
      .store
      .update_word(id, patch)
      .await
      .map_err(storage)?
      .ok_or(CoreError::WordNotFound(id))?;
    tracing::info!(word_id = %id, "word updated");
    Ok(word)
  }

  pub async fn delete_word(&self, id: Uuid) -> Result<()> {
    if !self.store.delete_word(id).await.map_err(storage)? {
      return Err(CoreError::WordNotFound(id).into());
    }
    tracing::info!(word_id = %id, "word deleted");
    Ok(())
  }

  /// Bulk-load `words` in one transaction.
  ///
  /// A non-empty corpus is only imported into when `force` is set; `clean`
  /// additionally empties the corpus (and every tag) in the same
  /// transaction.
  pub async fn import_words(
    &self,
    words: Vec<NewWord>,
    force: bool,
    clean: bool,
  ) -> Result<ImportSummary> {
    let total = words.len() as u64;
    let words: Vec<NewWord> = words
      .into_iter()
      .filter_map(|w| w.normalized().ok())
      .collect();
    let skipped = total - words.len() as u64;
    if words.is_empty() {
      return Err(CoreError::Validation("no valid words to import".into()).into());
    }

    let existing = self.store.count_words().await.map_err(storage)?;
    if existing > 0 && !force {
      return Err(
        CoreError::Validation(format!(
          "corpus already holds {existing} words; force is required to import"
        ))
        .into(),
      );
    }

    let (removed, imported) = if clean && existing > 0 {
      let (removed, imported) = self.store.replace_words(words).await.map_err(storage)?;
      tracing::info!(removed, "existing corpus cleaned");
      (removed, imported)
    } else {
      (0, self.store.bulk_import(words).await.map_err(storage)?)
    };
    tracing::info!(imported, skipped, "words imported");
    Ok(ImportSummary { imported, removed, skipped })
  }
}

