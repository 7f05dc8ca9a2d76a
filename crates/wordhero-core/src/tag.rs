//! Word tags: the per-user "known" relation over the shared corpus.
//!
//! A tag row exists at most once per `(word_id, user_id)`. Its `known` column
//! is the whole signal: `None` means "not known", `Some(ms)` means "known since
//! that instant". A row that was never marked and a row that was forgotten
//! are indistinguishable, and both read as "not known".

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::word::Word;

// ─── WordTag ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTag {
  pub id:         Uuid,
  pub word_id:    Uuid,
  pub user_id:    Uuid,
  /// Epoch milliseconds of the latest mark, or `None` when not known.
  pub known:      Option<i64>,
  pub created_at: i64,
  pub updated_at: i64,
}

impl WordTag {
  pub fn is_known(&self) -> bool { self.known.is_some() }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Mark state of one word for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStatus {
  pub word_id:    Uuid,
  pub is_marked:  bool,
  /// 0 or 1: a user holds at most one tag per word.
  pub mark_count: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub marked_at:  Option<i64>,
}

impl MarkStatus {
  pub fn unmarked(word_id: Uuid) -> Self {
    Self { word_id, is_marked: false, mark_count: 0, marked_at: None }
  }

  /// Derive the status from an optional tag row.
  pub fn from_tag(word_id: Uuid, tag: Option<&WordTag>) -> Self {
    match tag.and_then(|t| t.known) {
      Some(at) => Self {
        word_id,
        is_marked: true,
        mark_count: 1,
        marked_at: Some(at),
      },
      None => Self::unmarked(word_id),
    }
  }
}

/// A word annotated with the requesting user's mark state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedWord {
  #[serde(flatten)]
  pub word:       Word,
  pub is_marked:  bool,
  pub mark_count: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub marked_at:  Option<i64>,
}

impl MarkedWord {
  pub fn new(word: Word, status: &MarkStatus) -> Self {
    Self {
      word,
      is_marked: status.is_marked,
      mark_count: status.mark_count,
      marked_at: status.marked_at,
    }
  }
}

/// A known word id together with the instant it was marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownWord {
  pub word_id:  Uuid,
  pub known_at: i64,
}

/// Every known word id of a user, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownWordIds {
  pub word_ids:    Vec<Uuid>,
  pub total_count: u64,
}

/// Outcome of a bulk forget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgetResult {
  /// The ids the caller asked to forget; empty for a forget-all.
  pub word_ids:        Vec<Uuid>,
  /// Rows that were known and are no longer.
  pub forgotten_count: u64,
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Percentage of `total` covered by `known`; 0 for an empty corpus.
pub fn progress_rate(known: u64, total: u64) -> f64 {
  if total == 0 {
    return 0.0;
  }
  known as f64 / total as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
  pub user_id:         Uuid,
  pub known_words:     u64,
  pub total_words:     u64,
  pub progress_rate:   f64,
  pub recent_activity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWordStats {
  pub user_id:           Uuid,
  pub known_words_count: u64,
  pub total_words_count: u64,
  pub progress_rate:     f64,
  /// Most recent marks first.
  pub recent_marks:      Vec<KnownWord>,
}

/// Statistics across every user's tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTagStats {
  pub total_word_tags:  u64,
  /// Tag rows currently marked known.
  pub total_user_marks: u64,
  /// Most recently marked tags, newest first.
  pub top_words:        Vec<WordTag>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn progress_rate_handles_empty_corpus() {
    assert_eq!(progress_rate(0, 0), 0.0);
    assert_eq!(progress_rate(5, 0), 0.0);
    assert_eq!(progress_rate(1, 4), 25.0);
  }

  #[test]
  fn status_from_forgotten_tag_is_unmarked() {
    let word_id = Uuid::new_v4();
    let tag = WordTag {
      id: Uuid::new_v4(),
      word_id,
      user_id: Uuid::new_v4(),
      known: None,
      created_at: 1,
      updated_at: 2,
    };
    assert_eq!(MarkStatus::from_tag(word_id, Some(&tag)), MarkStatus::unmarked(word_id));
    assert_eq!(MarkStatus::from_tag(word_id, None), MarkStatus::unmarked(word_id));

    let known = WordTag { known: Some(42), ..tag };
    let status = MarkStatus::from_tag(word_id, Some(&known));
    assert!(status.is_marked);
    assert_eq!(status.mark_count, 1);
    assert_eq!(status.marked_at, Some(42));
  }
}
