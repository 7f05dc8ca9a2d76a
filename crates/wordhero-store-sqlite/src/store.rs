//! [`SqliteStore`]: the SQLite implementation of the Word Hero store traits.

use std::path::Path;

use rusqlite::{types::Value, OptionalExtension as _};
use uuid::Uuid;

use wordhero_core::{
  now_millis,
  page::Pagination,
  store::{UserStore, WordStore, WordTagStore},
  tag::{KnownWord, WordTag, WordTagStats},
  user::{NewUser, Role, User, UserPatch},
  word::{CountBucket, NewWord, Word, WordFilter, WordPatch, WordStats},
};

use crate::{
  encode::{
    decode_known, decode_words, encode_uuid, like_pattern, RawTag, RawUser,
    RawWord, TAG_COLUMNS, USER_COLUMNS, WORD_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Words, users and word tags backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn count(&self, sql: &'static str, params: Vec<Value>) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(sql, rusqlite::params_from_iter(params), |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }

  async fn query_words(
    &self,
    sql: String,
    params: Vec<Value>,
  ) -> Result<Vec<Word>> {
    let raws: Vec<RawWord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawWord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    decode_words(raws)
  }

  async fn get_raw_user(
    &self,
    clause: &'static str,
    param: String,
  ) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {USER_COLUMNS} FROM users WHERE {clause} AND deleted_at IS NULL"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![param], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  /// Run a single-row `UPDATE` against a live user. Returns whether it matched.
  async fn update_user(
    &self,
    sql: &'static str,
    id: Uuid,
    value: Value,
  ) -> Result<bool> {
    let id_str = encode_uuid(id);
    let now = now_millis();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params![id_str, value, now])?)
      })
      .await?;
    Ok(changed > 0)
  }
}

/// Convert a page request into SQL `LIMIT`/`OFFSET` values. `None` means the
/// page cannot contain anything.
fn limit_offset(page: Option<Pagination>) -> Option<(i64, i64)> {
  match page {
    None => Some((-1, 0)),
    Some(p) => p.window().map(|(offset, limit)| {
      (
        i64::try_from(limit).unwrap_or(i64::MAX),
        i64::try_from(offset).unwrap_or(i64::MAX),
      )
    }),
  }
}

/// Encode `ids` as one JSON array parameter, expanded in SQL with
/// `IN (SELECT value FROM json_each(?))`. Keeps long id lists clear of
/// SQLite's bound-parameter limit.
fn id_array(ids: &[Uuid]) -> Result<Value> {
  Ok(Value::Text(serde_json::to_string(ids)?))
}

fn insert_words(
  tx: &rusqlite::Transaction<'_>,
  words: Vec<NewWord>,
  now: i64,
) -> rusqlite::Result<u64> {
  let mut stmt = tx.prepare(
    "INSERT INTO words (
       id, english, chinese, phonetic, example, definition,
       category, difficulty, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
  )?;
  let mut n = 0u64;
  for w in words {
    stmt.execute(rusqlite::params![
      encode_uuid(Uuid::new_v4()),
      w.english,
      w.chinese,
      w.phonetic,
      w.example,
      w.definition,
      w.category,
      w.difficulty,
      now,
    ])?;
    n += 1;
  }
  Ok(n)
}

fn delete_corpus(tx: &rusqlite::Transaction<'_>) -> rusqlite::Result<u64> {
  tx.execute("DELETE FROM word_tags", [])?;
  Ok(tx.execute("DELETE FROM words", [])? as u64)
}

// ─── WordStore impl ──────────────────────────────────────────────────────────

impl WordStore for SqliteStore {
  type Error = Error;

  async fn create_word(&self, input: NewWord) -> Result<Word> {
    let now = now_millis();
    let word = Word {
      id:         Uuid::new_v4(),
      english:    input.english,
      chinese:    input.chinese,
      phonetic:   input.phonetic,
      example:    input.example,
      definition: input.definition,
      category:   input.category,
      difficulty: input.difficulty,
      created_at: now,
      updated_at: now,
    };

    let w = word.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO words (
             id, english, chinese, phonetic, example, definition,
             category, difficulty, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            encode_uuid(w.id),
            w.english,
            w.chinese,
            w.phonetic,
            w.example,
            w.definition,
            w.category,
            w.difficulty,
            w.created_at,
            w.updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(word)
  }

  async fn get_word(&self, id: Uuid) -> Result<Option<Word>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawWord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"),
              rusqlite::params![id_str],
              RawWord::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawWord::into_word).transpose()
  }

  async fn get_words(&self, ids: Vec<Uuid>) -> Result<Vec<Word>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    self
      .query_words(
        format!(
          "SELECT {WORD_COLUMNS} FROM words
           WHERE id IN (SELECT value FROM json_each(?1))"
        ),
        vec![id_array(&ids)?],
      )
      .await
  }

  async fn update_word(&self, id: Uuid, patch: WordPatch) -> Result<Option<Word>> {
    let Some(mut word) = self.get_word(id).await? else {
      return Ok(None);
    };
    patch.apply(&mut word)?;
    word.updated_at = now_millis().max(word.updated_at);

    let w = word.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE words SET
             english = ?2, chinese = ?3, phonetic = ?4, example = ?5,
             definition = ?6, category = ?7, difficulty = ?8, updated_at = ?9
           WHERE id = ?1",
          rusqlite::params![
            encode_uuid(w.id),
            w.english,
            w.chinese,
            w.phonetic,
            w.example,
            w.definition,
            w.category,
            w.difficulty,
            w.updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(word))
  }

  async fn delete_word(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM word_tags WHERE word_id = ?1", rusqlite::params![id_str])?;
        let n = tx.execute("DELETE FROM words WHERE id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok(n)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn list_words(&self, page: Option<Pagination>) -> Result<(Vec<Word>, u64)> {
    let total = self.count_words().await?;
    let Some((limit, offset)) = limit_offset(page) else {
      return Ok((Vec::new(), total));
    };
    let words = self
      .query_words(
        format!("SELECT {WORD_COLUMNS} FROM words ORDER BY rowid LIMIT ?1 OFFSET ?2"),
        vec![limit.into(), offset.into()],
      )
      .await?;
    Ok((words, total))
  }

  async fn all_words(&self) -> Result<Vec<Word>> {
    self
      .query_words(
        format!("SELECT {WORD_COLUMNS} FROM words ORDER BY english ASC"),
        Vec::new(),
      )
      .await
  }

  async fn search_words(&self, text: String) -> Result<Vec<Word>> {
    // SQLite's LOWER() only folds ASCII, so the query is folded the same way.
    let pattern = like_pattern(&text.to_ascii_lowercase());
    self
      .query_words(
        format!(
          "SELECT {WORD_COLUMNS} FROM words
           WHERE LOWER(english) LIKE ?1 ESCAPE '\\'
              OR LOWER(chinese) LIKE ?1 ESCAPE '\\'
           ORDER BY english ASC"
        ),
        vec![pattern.into()],
      )
      .await
  }

  async fn random_words(&self, count: u32) -> Result<Vec<Word>> {
    self
      .query_words(
        format!("SELECT {WORD_COLUMNS} FROM words ORDER BY RANDOM() LIMIT ?1"),
        vec![i64::from(count).into()],
      )
      .await
  }

  async fn filter_words(&self, filter: WordFilter) -> Result<Vec<Word>> {
    let mut conds: Vec<String> = vec![];
    let mut params: Vec<Value> = vec![];
    if let Some(c) = filter.category {
      params.push(c.into());
      conds.push(format!("category = ?{}", params.len()));
    }
    if let Some(d) = filter.difficulty {
      params.push(d.into());
      conds.push(format!("difficulty = ?{}", params.len()));
    }
    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    self
      .query_words(
        format!("SELECT {WORD_COLUMNS} FROM words {where_clause} ORDER BY english ASC"),
        params,
      )
      .await
  }

  async fn count_words(&self) -> Result<u64> {
    self.count("SELECT COUNT(*) FROM words", Vec::new()).await
  }

  async fn bulk_import(&self, words: Vec<NewWord>) -> Result<u64> {
    let now = now_millis();
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = insert_words(&tx, words, now)?;
        tx.commit()?;
        Ok(n)
      })
      .await?;
    tracing::debug!(inserted, "bulk import committed");
    Ok(inserted)
  }

  async fn delete_all_words(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let n = delete_corpus(&tx)?;
        tx.commit()?;
        Ok(n)
      })
      .await?;
    Ok(removed)
  }

  async fn replace_words(&self, words: Vec<NewWord>) -> Result<(u64, u64)> {
    let now = now_millis();
    let (removed, inserted) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = delete_corpus(&tx)?;
        let inserted = insert_words(&tx, words, now)?;
        tx.commit()?;
        Ok((removed, inserted))
      })
      .await?;
    tracing::debug!(removed, inserted, "corpus replaced");
    Ok((removed, inserted))
  }

  async fn word_stats(&self) -> Result<WordStats> {
    let (total, categories, difficulties) = self
      .conn
      .call(|conn| {
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |r| r.get(0))?;
        let buckets = |column: &str| -> rusqlite::Result<Vec<(String, i64)>> {
          let mut stmt = conn.prepare(&format!(
            "SELECT {column}, COUNT(*) FROM words
             WHERE {column} IS NOT NULL AND {column} <> ''
             GROUP BY {column} ORDER BY COUNT(*) DESC, {column} ASC"
          ))?;
          let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        };
        let categories = buckets("category")?;
        let difficulties = buckets("difficulty")?;
        Ok((total, categories, difficulties))
      })
      .await?;

    let to_buckets = |rows: Vec<(String, i64)>| -> Vec<CountBucket> {
      rows
        .into_iter()
        .map(|(key, count)| CountBucket { key, count: count.max(0) as u64 })
        .collect()
    };

    Ok(WordStats {
      total_words:  total.max(0) as u64,
      categories:   to_buckets(categories),
      difficulties: to_buckets(difficulties),
    })
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  fn is_conflict(error: &Error) -> bool { matches!(error, Error::Conflict(_)) }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let now = now_millis();
    let user = User {
      id:            Uuid::new_v4(),
      username:      input.username,
      email:         input.email,
      password_hash: input.password_hash,
      full_name:     input.full_name,
      avatar_url:    None,
      bio:           None,
      role:          input.role,
      is_active:     true,
      last_login:    None,
      created_at:    now,
      updated_at:    now,
      deleted_at:    None,
    };

    let u = user.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             id, username, email, password_hash, full_name,
             role, is_active, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
          rusqlite::params![
            encode_uuid(u.id),
            u.username,
            u.email,
            u.password_hash,
            u.full_name,
            u.role.as_str(),
            u.created_at,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::from_write(e, "user"))?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.get_raw_user("id = ?1", encode_uuid(id)).await
  }

  async fn find_by_login(&self, login: String) -> Result<Option<User>> {
    self
      .get_raw_user("(username = ?1 OR email = ?1)", login)
      .await
  }

  async fn username_exists(&self, username: String) -> Result<bool> {
    let n = self
      .count(
        "SELECT COUNT(*) FROM users WHERE username = ?1 AND deleted_at IS NULL",
        vec![username.into()],
      )
      .await?;
    Ok(n > 0)
  }

  async fn email_exists(&self, email: String) -> Result<bool> {
    let n = self
      .count(
        "SELECT COUNT(*) FROM users WHERE email = ?1 AND deleted_at IS NULL",
        vec![email.into()],
      )
      .await?;
    Ok(n > 0)
  }

  async fn touch_last_login(&self, id: Uuid, at: i64) -> Result<()> {
    self
      .update_user(
        "UPDATE users SET last_login = ?2, updated_at = ?3
         WHERE id = ?1 AND deleted_at IS NULL",
        id,
        at.into(),
      )
      .await?;
    Ok(())
  }

  async fn update_profile(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let now = now_millis();
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "UPDATE users SET
             full_name  = COALESCE(?2, full_name),
             avatar_url = COALESCE(?3, avatar_url),
             bio        = COALESCE(?4, bio),
             updated_at = ?5
           WHERE id = ?1 AND deleted_at IS NULL
           RETURNING {USER_COLUMNS}"
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![id_str, patch.full_name, patch.avatar_url, patch.bio, now],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn update_password(&self, id: Uuid, password_hash: String) -> Result<bool> {
    self
      .update_user(
        "UPDATE users SET password_hash = ?2, updated_at = ?3
         WHERE id = ?1 AND deleted_at IS NULL",
        id,
        password_hash.into(),
      )
      .await
  }

  async fn set_active(&self, id: Uuid, active: bool) -> Result<bool> {
    self
      .update_user(
        "UPDATE users SET is_active = ?2, updated_at = ?3
         WHERE id = ?1 AND deleted_at IS NULL",
        id,
        i64::from(active).into(),
      )
      .await
  }

  async fn set_role(&self, id: Uuid, role: Role) -> Result<bool> {
    self
      .update_user(
        "UPDATE users SET role = ?2, updated_at = ?3
         WHERE id = ?1 AND deleted_at IS NULL",
        id,
        role.as_str().to_owned().into(),
      )
      .await
  }

  async fn soft_delete(&self, id: Uuid) -> Result<bool> {
    self
      .update_user(
        "UPDATE users SET deleted_at = ?2, is_active = 0, updated_at = ?3
         WHERE id = ?1 AND deleted_at IS NULL",
        id,
        now_millis().into(),
      )
      .await
  }

  async fn list_users(&self, page: Option<Pagination>) -> Result<(Vec<User>, u64)> {
    let total = self.count_users().await?;
    let Some((limit, offset)) = limit_offset(page) else {
      return Ok((Vec::new(), total));
    };
    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL
           ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    let users = raws
      .into_iter()
      .map(RawUser::into_user)
      .collect::<Result<_>>()?;
    Ok((users, total))
  }

  async fn count_users(&self) -> Result<u64> {
    self
      .count("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL", Vec::new())
      .await
  }
}

// ─── WordTagStore impl ───────────────────────────────────────────────────────

impl WordTagStore for SqliteStore {
  type Error = Error;

  async fn mark_known(&self, word_id: Uuid, user_id: Uuid, at: i64) -> Result<WordTag> {
    let id_str = encode_uuid(Uuid::new_v4());
    let word_str = encode_uuid(word_id);
    let user_str = encode_uuid(user_id);

    let raw: RawTag = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO word_tags (id, word_id, user_id, known, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4, ?4)
           ON CONFLICT (word_id, user_id) DO UPDATE SET
             known      = MAX(excluded.known, COALESCE(word_tags.known, excluded.known)),
             updated_at = MAX(excluded.updated_at, word_tags.updated_at)
           RETURNING {TAG_COLUMNS}"
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![id_str, word_str, user_str, at],
          RawTag::from_row,
        )?)
      })
      .await?;
    raw.into_tag()
  }

  async fn get_tag(&self, word_id: Uuid, user_id: Uuid) -> Result<Option<WordTag>> {
    let word_str = encode_uuid(word_id);
    let user_str = encode_uuid(user_id);
    let raw: Option<RawTag> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {TAG_COLUMNS} FROM word_tags WHERE word_id = ?1 AND user_id = ?2"
              ),
              rusqlite::params![word_str, user_str],
              RawTag::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawTag::into_tag).transpose()
  }

  async fn get_tags(&self, user_id: Uuid, word_ids: Vec<Uuid>) -> Result<Vec<WordTag>> {
    if word_ids.is_empty() {
      return Ok(Vec::new());
    }
    let params = vec![Value::from(encode_uuid(user_id)), id_array(&word_ids)?];

    let raws: Vec<RawTag> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TAG_COLUMNS} FROM word_tags
           WHERE user_id = ?1 AND word_id IN (SELECT value FROM json_each(?2))"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawTag::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawTag::into_tag).collect()
  }

  async fn unmark(&self, word_id: Uuid, user_id: Uuid) -> Result<bool> {
    let word_str = encode_uuid(word_id);
    let user_str = encode_uuid(user_id);
    let now = now_millis();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE word_tags SET known = NULL, updated_at = ?3
           WHERE word_id = ?1 AND user_id = ?2",
          rusqlite::params![word_str, user_str, now],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn known_words(
    &self,
    user_id: Uuid,
    page: Option<Pagination>,
  ) -> Result<(Vec<KnownWord>, u64)> {
    let total = self.count_known(user_id).await?;
    let Some((limit, offset)) = limit_offset(page) else {
      return Ok((Vec::new(), total));
    };
    let user_str = encode_uuid(user_id);
    let rows: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word_id, known FROM word_tags
           WHERE user_id = ?1 AND known IS NOT NULL
           ORDER BY known DESC, rowid DESC
           LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, limit, offset], |r| {
            Ok((r.get(0)?, r.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    let known = rows
      .iter()
      .map(|(id, at)| decode_known(id, *at))
      .collect::<Result<_>>()?;
    Ok((known, total))
  }

  async fn count_known(&self, user_id: Uuid) -> Result<u64> {
    self
      .count(
        "SELECT COUNT(*) FROM word_tags WHERE user_id = ?1 AND known IS NOT NULL",
        vec![encode_uuid(user_id).into()],
      )
      .await
  }

  async fn count_known_since(&self, user_id: Uuid, since: i64) -> Result<u64> {
    self
      .count(
        "SELECT COUNT(*) FROM word_tags WHERE user_id = ?1 AND known >= ?2",
        vec![encode_uuid(user_id).into(), since.into()],
      )
      .await
  }

  async fn forget_words(&self, user_id: Uuid, word_ids: Vec<Uuid>) -> Result<u64> {
    if word_ids.is_empty() {
      return Ok(0);
    }
    let now = now_millis();
    let user_str = encode_uuid(user_id);
    let ids = id_array(&word_ids)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE word_tags SET known = NULL, updated_at = ?1
           WHERE user_id = ?2 AND known IS NOT NULL
             AND word_id IN (SELECT value FROM json_each(?3))",
          rusqlite::params![now, user_str, ids],
        )?)
      })
      .await?;
    Ok(changed as u64)
  }

  async fn forget_all(&self, user_id: Uuid) -> Result<u64> {
    let user_str = encode_uuid(user_id);
    let now = now_millis();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE word_tags SET known = NULL, updated_at = ?2
           WHERE user_id = ?1 AND known IS NOT NULL",
          rusqlite::params![user_str, now],
        )?)
      })
      .await?;
    Ok(changed as u64)
  }

  async fn tag_stats(&self, recent: u32) -> Result<WordTagStats> {
    let (total, known, raws) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM word_tags", [], |r| r.get(0))?;
        let known: i64 = conn.query_row(
          "SELECT COUNT(*) FROM word_tags WHERE known IS NOT NULL",
          [],
          |r| r.get(0),
        )?;
        let mut stmt = conn.prepare(&format!(
          "SELECT {TAG_COLUMNS} FROM word_tags WHERE known IS NOT NULL
           ORDER BY known DESC, rowid DESC LIMIT ?1"
        ))?;
        let raws = stmt
          .query_map(rusqlite::params![i64::from(recent)], RawTag::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, known, raws))
      })
      .await?;

    Ok(WordTagStats {
      total_word_tags:  total.max(0) as u64,
      total_user_marks: known.max(0) as u64,
      top_words:        raws
        .into_iter()
        .map(RawTag::into_tag)
        .collect::<Result<_>>()?,
    })
  }
}
