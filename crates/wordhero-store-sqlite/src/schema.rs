//! SQL schema for the Word Hero SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS words (
    id          TEXT PRIMARY KEY,
    english     TEXT NOT NULL CHECK (english <> ''),
    chinese     TEXT NOT NULL CHECK (chinese <> ''),
    phonetic    TEXT,
    example     TEXT,
    definition  TEXT,
    category    TEXT,
    difficulty  TEXT,
    created_at  INTEGER NOT NULL,   -- epoch milliseconds
    updated_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    username      TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    full_name     TEXT,
    avatar_url    TEXT,
    bio           TEXT,
    role          TEXT NOT NULL DEFAULT 'user',   -- 'user' | 'admin'
    is_active     INTEGER NOT NULL DEFAULT 1,
    last_login    INTEGER,
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL,
    deleted_at    INTEGER                         -- soft delete marker
);

-- Usernames and emails are unique among live accounts only.
CREATE UNIQUE INDEX IF NOT EXISTS users_username_idx
    ON users(username) WHERE deleted_at IS NULL;
CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx
    ON users(email) WHERE deleted_at IS NULL;

-- known IS NULL means \"not known\"; otherwise the epoch-ms mark time.
CREATE TABLE IF NOT EXISTS word_tags (
    id          TEXT PRIMARY KEY,
    word_id     TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    known       INTEGER,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL,
    UNIQUE (word_id, user_id)
);

CREATE INDEX IF NOT EXISTS word_tags_user_known_idx ON word_tags(user_id, known);
CREATE INDEX IF NOT EXISTS words_english_idx        ON words(english);
CREATE INDEX IF NOT EXISTS words_category_idx       ON words(category);
CREATE INDEX IF NOT EXISTS words_difficulty_idx     ON words(difficulty);

PRAGMA user_version = 1;
";
