//! Words: the vocabulary entries shared by every user.
//!
//! The corpus is replaced wholesale by an import and otherwise only changes
//! through explicit admin edits. Per-user state never lives on a word; it
//! lives on [`crate::tag::WordTag`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Word ────────────────────────────────────────────────────────────────────

/// An English/Chinese pair plus optional study metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
  pub id:         Uuid,
  pub english:    String,
  pub chinese:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phonetic:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub example:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub definition: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub difficulty: Option<String>,
  /// Epoch milliseconds.
  pub created_at: i64,
  /// Epoch milliseconds.
  pub updated_at: i64,
}

// ─── NewWord ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::WordStore::create_word`] and bulk import.
/// Ids and timestamps are always assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
  pub english:    String,
  pub chinese:    String,
  #[serde(default)]
  pub phonetic:   Option<String>,
  #[serde(default)]
  pub example:    Option<String>,
  #[serde(default)]
  pub definition: Option<String>,
  #[serde(default)]
  pub category:   Option<String>,
  #[serde(default)]
  pub difficulty: Option<String>,
}

impl NewWord {
  /// Convenience constructor with all optional metadata unset.
  pub fn new(english: impl Into<String>, chinese: impl Into<String>) -> Self {
    Self {
      english: english.into(),
      chinese: chinese.into(),
      ..Default::default()
    }
  }

  /// Trim both texts and reject the entry if either is empty.
  pub fn normalized(mut self) -> Result<Self> {
    self.english = self.english.trim().to_owned();
    self.chinese = self.chinese.trim().to_owned();
    if self.english.is_empty() || self.chinese.is_empty() {
      return Err(Error::Validation(
        "english and chinese text must both be non-empty".into(),
      ));
    }
    Ok(self)
  }
}

// ─── WordPatch ───────────────────────────────────────────────────────────────

/// An explicit content update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPatch {
  pub english:    Option<String>,
  pub chinese:    Option<String>,
  pub phonetic:   Option<String>,
  pub example:    Option<String>,
  pub definition: Option<String>,
  pub category:   Option<String>,
  pub difficulty: Option<String>,
}

impl WordPatch {
  /// Reject a patch that would blank out either required text.
  pub fn validate(&self) -> Result<()> {
    let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
    if blank(&self.english) || blank(&self.chinese) {
      return Err(Error::Validation(
        "english and chinese text must both be non-empty".into(),
      ));
    }
    Ok(())
  }

  /// Apply the patch in place. Fails without touching `word` if
  /// [`validate`](Self::validate) fails.
  pub fn apply(self, word: &mut Word) -> Result<()> {
    self.validate()?;
    let english = self.english.map(|s| s.trim().to_owned());
    let chinese = self.chinese.map(|s| s.trim().to_owned());

    if let Some(v) = english {
      word.english = v;
    }
    if let Some(v) = chinese {
      word.chinese = v;
    }
    if self.phonetic.is_some() {
      word.phonetic = self.phonetic;
    }
    if self.example.is_some() {
      word.example = self.example;
    }
    if self.definition.is_some() {
      word.definition = self.definition;
    }
    if self.category.is_some() {
      word.category = self.category;
    }
    if self.difficulty.is_some() {
      word.difficulty = self.difficulty;
    }
    Ok(())
  }
}

// ─── Filters & statistics ────────────────────────────────────────────────────

/// Exact-match filters for [`crate::store::WordStore::filter_words`].
#[derive(Debug, Clone, Default)]
pub struct WordFilter {
  pub category:   Option<String>,
  pub difficulty: Option<String>,
}

/// One bucket of a grouped count, e.g. `{"key": "noun", "count": 42}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
  pub key:   String,
  pub count: u64,
}

/// Corpus-wide statistics. Empty categories/difficulties are not bucketed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
  pub total_words:  u64,
  pub categories:   Vec<CountBucket>,
  pub difficulties: Vec<CountBucket>,
}
