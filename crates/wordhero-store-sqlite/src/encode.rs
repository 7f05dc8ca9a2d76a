//! Encoding and decoding helpers between domain types and the column values
//! stored in SQLite.
//!
//! UUIDs are stored as hyphenated lowercase strings, timestamps as epoch
//! milliseconds, booleans as 0/1 integers and roles as their lowercase name.
//! Rows are first read into `Raw*` structs inside the connection thread and
//! decoded into domain types afterwards.

use wordhero_core::{
  tag::{KnownWord, WordTag},
  user::{Role, User},
  word::Word,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse::<Role>()
    .map_err(|_| Error::Decode(format!("unknown role: {s:?}")))
}

/// Escape `%`, `_` and `\` so user text matches literally in `LIKE .. ESCAPE '\'`.
pub fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Words ───────────────────────────────────────────────────────────────────

pub const WORD_COLUMNS: &str = "id, english, chinese, phonetic, example, \
                                definition, category, difficulty, \
                                created_at, updated_at";

pub struct RawWord {
  pub id:         String,
  pub english:    String,
  pub chinese:    String,
  pub phonetic:   Option<String>,
  pub example:    Option<String>,
  pub definition: Option<String>,
  pub category:   Option<String>,
  pub difficulty: Option<String>,
  pub created_at: i64,
  pub updated_at: i64,
}

impl RawWord {
  /// Read a row selected with [`WORD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      english:    row.get(1)?,
      chinese:    row.get(2)?,
      phonetic:   row.get(3)?,
      example:    row.get(4)?,
      definition: row.get(5)?,
      category:   row.get(6)?,
      difficulty: row.get(7)?,
      created_at: row.get(8)?,
      updated_at: row.get(9)?,
    })
  }

  pub fn into_word(self) -> Result<Word> {
    Ok(Word {
      id:         decode_uuid(&self.id)?,
      english:    self.english,
      chinese:    self.chinese,
      phonetic:   self.phonetic,
      example:    self.example,
      definition: self.definition,
      category:   self.category,
      difficulty: self.difficulty,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

pub fn decode_words(raws: Vec<RawWord>) -> Result<Vec<Word>> {
  raws.into_iter().map(RawWord::into_word).collect()
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, username, email, password_hash, \
                                full_name, avatar_url, bio, role, is_active, \
                                last_login, created_at, updated_at, deleted_at";

pub struct RawUser {
  pub id:            String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub full_name:     Option<String>,
  pub avatar_url:    Option<String>,
  pub bio:           Option<String>,
  pub role:          String,
  pub is_active:     bool,
  pub last_login:    Option<i64>,
  pub created_at:    i64,
  pub updated_at:    i64,
  pub deleted_at:    Option<i64>,
}

impl RawUser {
  /// Read a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      full_name:     row.get(4)?,
      avatar_url:    row.get(5)?,
      bio:           row.get(6)?,
      role:          row.get(7)?,
      is_active:     row.get(8)?,
      last_login:    row.get(9)?,
      created_at:    row.get(10)?,
      updated_at:    row.get(11)?,
      deleted_at:    row.get(12)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.id)?,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      full_name:     self.full_name,
      avatar_url:    self.avatar_url,
      bio:           self.bio,
      role:          decode_role(&self.role)?,
      is_active:     self.is_active,
      last_login:    self.last_login,
      created_at:    self.created_at,
      updated_at:    self.updated_at,
      deleted_at:    self.deleted_at,
    })
  }
}

// ─── Word tags ───────────────────────────────────────────────────────────────

pub const TAG_COLUMNS: &str =
  "id, word_id, user_id, known, created_at, updated_at";

pub struct RawTag {
  pub id:         String,
  pub word_id:    String,
  pub user_id:    String,
  pub known:      Option<i64>,
  pub created_at: i64,
  pub updated_at: i64,
}

impl RawTag {
  /// Read a row selected with [`TAG_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      word_id:    row.get(1)?,
      user_id:    row.get(2)?,
      known:      row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_tag(self) -> Result<WordTag> {
    Ok(WordTag {
      id:         decode_uuid(&self.id)?,
      word_id:    decode_uuid(&self.word_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      known:      self.known,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

pub fn decode_known(word_id: &str, known_at: i64) -> Result<KnownWord> {
  Ok(KnownWord { word_id: decode_uuid(word_id)?, known_at })
}
