//! State transitions and aggregates over the per-user "known" relation.
//!
//! Every write validates that both the user and the word exist before
//! touching a tag. A tag's `known` timestamp is the only state: marking sets
//! it, unmarking and forgetting clear it, and no row is ever deleted here.

use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;
use wordhero_core::{
  Error as CoreError, now_millis,
  page::Pagination,
  store::{UserStore, WordStore, WordTagStore},
  tag::{
    progress_rate, ForgetResult, KnownWordIds, MarkStatus, UserProgress,
    UserWordStats, WordTagStats,
  },
  user::User,
  word::Word,
};

use crate::{error::storage, Result};

/// How many recent marks the statistics endpoints include.
pub const RECENT_MARKS: u32 = 10;

/// Window for [`UserProgress::recent_activity`].
pub const RECENT_ACTIVITY_MS: i64 = 7 * 24 * 60 * 60 * 1000;

pub struct WordTagService<S> {
  store: Arc<S>,
}

impl<S> Clone for WordTagService<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S> WordTagService<S>
where
  S: WordStore + UserStore + WordTagStore,
{
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  async fn require_user(&self, user_id: Uuid) -> Result<User> {
    self
      .store
      .get_user(user_id)
      .await
      .map_err(storage)?
      .ok_or_else(|| CoreError::UserNotFound(user_id).into())
  }

  async fn require_word(&self, word_id: Uuid) -> Result<Word> {
    self
      .store
      .get_word(word_id)
      .await
      .map_err(storage)?
      .ok_or_else(|| CoreError::WordNotFound(word_id).into())
  }

  // ── Transitions ─────────────────────────────────────────────────────────

  /// Mark a word as known now. Marking a known word again refreshes its
  /// timestamp.
  pub async fn mark_as_known(&self, word_id: Uuid, user_id: Uuid) -> Result<MarkStatus> {
    let user = self.require_user(user_id).await?;
    let word = self.require_word(word_id).await?;

    let tag = self
      .store
      .mark_known(word_id, user_id, now_millis())
      .await
      .map_err(storage)?;

    tracing::info!(
      %user_id,
      username = %user.username,
      %word_id,
      english = %word.english,
      "word marked as known"
    );
    Ok(MarkStatus::from_tag(word_id, Some(&tag)))
  }

  /// Clear a mark. Fails with [`CoreError::TagNotFound`] if the user never
  /// tagged the word.
  pub async fn remove_mark(&self, word_id: Uuid, user_id: Uuid) -> Result<MarkStatus> {
    self.require_user(user_id).await?;
    let word = self.require_word(word_id).await?;

    if !self.store.unmark(word_id, user_id).await.map_err(storage)? {
      return Err(CoreError::TagNotFound { word_id, user_id }.into());
    }

    tracing::info!(%user_id, %word_id, english = %word.english, "word mark removed");
    Ok(MarkStatus::unmarked(word_id))
  }

  /// Forget the listed words. Only words the user currently knows count.
  pub async fn forget_words(&self, user_id: Uuid, word_ids: Vec<Uuid>) -> Result<ForgetResult> {
    if word_ids.is_empty() {
      return Err(CoreError::Validation("word ids must not be empty".into()).into());
    }
    self.require_user(user_id).await?;

    let forgotten_count = self
      .store
      .forget_words(user_id, word_ids.clone())
      .await
      .map_err(storage)?;

    tracing::info!(%user_id, requested = word_ids.len(), forgotten_count, "words forgotten");
    Ok(ForgetResult { word_ids, forgotten_count })
  }

  /// Forget every known word of the user. Requires `confirm`.
  pub async fn forget_all_words(&self, user_id: Uuid, confirm: bool) -> Result<ForgetResult> {
    if !confirm {
      return Err(CoreError::ConfirmationRequired.into());
    }
    self.require_user(user_id).await?;

    let forgotten_count = self.store.forget_all(user_id).await.map_err(storage)?;
    tracing::info!(%user_id, forgotten_count, "all words forgotten");
    Ok(ForgetResult { word_ids: Vec::new(), forgotten_count })
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub async fn get_mark_status(&self, word_id: Uuid, user_id: Uuid) -> Result<MarkStatus> {
    self.require_user(user_id).await?;
    self.require_word(word_id).await?;

    let tag = self.store.get_tag(word_id, user_id).await.map_err(storage)?;
    Ok(MarkStatus::from_tag(word_id, tag.as_ref()))
  }

  /// Status for each requested word, in request order. Unknown word ids are
  /// skipped with a warning.
  pub async fn get_batch_mark_status(
    &self,
    user_id: Uuid,
    word_ids: Vec<Uuid>,
  ) -> Result<Vec<MarkStatus>> {
    if word_ids.is_empty() {
      return Err(CoreError::Validation("word ids must not be empty".into()).into());
    }
    self.require_user(user_id).await?;

    let existing: HashSet<Uuid> = self
      .store
      .get_words(word_ids.clone())
      .await
      .map_err(storage)?
      .into_iter()
      .map(|w| w.id)
      .collect();
    let tags = self
      .store
      .get_tags(user_id, existing.iter().copied().collect())
      .await
      .map_err(storage)?;

    let mut seen = HashSet::new();
    let statuses = word_ids
      .into_iter()
      .filter(|id| seen.insert(*id))
      .filter(|id| {
        let found = existing.contains(id);
        if !found {
          tracing::warn!(%user_id, word_id = %id, "mark status requested for unknown word");
        }
        found
      })
      .map(|id| MarkStatus::from_tag(id, tags.iter().find(|t| t.word_id == id)))
      .collect();
    Ok(statuses)
  }

  pub async fn get_user_progress(&self, user_id: Uuid) -> Result<UserProgress> {
    self.require_user(user_id).await?;

    let known_words = self.store.count_known(user_id).await.map_err(storage)?;
    let total_words = self.store.count_words().await.map_err(storage)?;
    let recent_activity = self
      .store
      .count_known_since(user_id, now_millis() - RECENT_ACTIVITY_MS)
      .await
      .map_err(storage)?;

    Ok(UserProgress {
      user_id,
      known_words,
      total_words,
      progress_rate: progress_rate(known_words, total_words),
      recent_activity,
    })
  }

  pub async fn get_known_word_ids(&self, user_id: Uuid) -> Result<KnownWordIds> {
    self.require_user(user_id).await?;
    let (known, total_count) = self.store.known_words(user_id, None).await.map_err(storage)?;
    Ok(KnownWordIds {
      word_ids: known.into_iter().map(|k| k.word_id).collect(),
      total_count,
    })
  }

  pub async fn get_user_word_stats(&self, user_id: Uuid) -> Result<UserWordStats> {
    self.require_user(user_id).await?;

    let (recent_marks, known) = self
      .store
      .known_words(user_id, Some(Pagination::new(1, RECENT_MARKS)))
      .await
      .map_err(storage)?;
    let total = self.store.count_words().await.map_err(storage)?;

    Ok(UserWordStats {
      user_id,
      known_words_count: known,
      total_words_count: total,
      progress_rate: progress_rate(known, total),
      recent_marks,
    })
  }

  /// Tag counts across all users plus the most recent marks.
  pub async fn get_word_tag_stats(&self) -> Result<WordTagStats> {
    self.store.tag_stats(RECENT_MARKS).await.map_err(storage)
  }
}
