//! Runtime wiring for the `wordhero` binary.
//!
//! Loads [`ServerConfig`], opens the SQLite store, bootstraps the default
//! admin account and optionally seeds the vocabulary from a workbook before
//! the HTTP router from [`wordhero_api`] is served.

pub mod error;

pub use error::{Error, Result};

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use wordhero_api::{AppState, Backend, PagingConfig};
use wordhero_core::store::{UserStore, WordStore, WordTagStore};
use wordhero_service::{TokenConfig, VocabularyService, vocabulary::ImportSummary};
use wordhero_store_sqlite::SqliteStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `WORDHERO_*` environment overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_database_path")]
  pub database_path:       PathBuf,
  pub jwt_secret:          String,
  #[serde(default = "default_jwt_expires_in_secs")]
  pub jwt_expires_in_secs: i64,
  #[serde(default = "default_jwt_issuer")]
  pub jwt_issuer:          String,
  #[serde(default = "default_page_size")]
  pub default_page_size:   u32,
  #[serde(default = "default_max_page_size")]
  pub max_page_size:       u32,
  /// Workbook loaded into an empty corpus at startup.
  #[serde(default)]
  pub import_file:         Option<PathBuf>,
  #[serde(default)]
  pub admin_username:      Option<String>,
  #[serde(default)]
  pub admin_email:         Option<String>,
  #[serde(default)]
  pub admin_password:      Option<String>,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }
fn default_database_path() -> PathBuf { PathBuf::from("wordhero.db") }
fn default_jwt_expires_in_secs() -> i64 { 24 * 60 * 60 }
fn default_jwt_issuer() -> String { "word-hero".into() }
fn default_page_size() -> u32 { wordhero_core::page::DEFAULT_PAGE_SIZE }
fn default_max_page_size() -> u32 { 100 }

impl ServerConfig {
  /// Read `path` (optional) layered under the environment.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("WORDHERO")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn token_config(&self) -> TokenConfig {
    TokenConfig {
      secret:          self.jwt_secret.clone(),
      expires_in_secs: self.jwt_expires_in_secs,
      issuer:          self.jwt_issuer.clone(),
    }
  }

  pub fn paging(&self) -> PagingConfig {
    PagingConfig {
      default_page_size: self.default_page_size,
      max_page_size:     self.max_page_size.max(self.default_page_size),
    }
  }

  /// Username, email and password of the bootstrap admin, when all three
  /// are configured.
  pub fn admin_credentials(&self) -> Option<(&str, &str, &str)> {
    Some((
      self.admin_username.as_deref()?,
      self.admin_email.as_deref()?,
      self.admin_password.as_deref()?,
    ))
  }
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// Open (or create) the store named by `config`.
pub async fn open_store(config: &ServerConfig) -> Result<Arc<SqliteStore>> {
  let path = expand_tilde(&config.database_path);
  let store = SqliteStore::open(&path).await?;
  tracing::info!(path = %path.display(), "store opened");
  Ok(Arc::new(store))
}

/// Create the configured admin when no account exists yet, then log the
/// number of accounts.
pub async fn bootstrap_accounts<S: Backend>(
  state: &AppState<S>,
  config: &ServerConfig,
) -> Result<u64> {
  match config.admin_credentials() {
    Some((username, email, password)) => {
      state.auth.ensure_default_admin(username, email, password).await?;
    }
    None => tracing::debug!("no default admin configured"),
  }
  let users = state.users.count_users().await?;
  tracing::info!(users, "user accounts ready");
  Ok(users)
}

/// Import `config.import_file` when the corpus is empty. Returns `None` when
/// nothing was imported.
pub async fn seed_vocabulary<S: Backend>(
  state: &AppState<S>,
  config: &ServerConfig,
) -> Result<Option<ImportSummary>> {
  let Some(path) = config.import_file.clone() else {
    return Ok(None);
  };
  if state.vocabulary.get_word_count().await? > 0 {
    tracing::debug!("corpus already populated; skipping startup import");
    return Ok(None);
  }
  import_workbook(&state.vocabulary, path, false, false).await.map(Some)
}

/// Read a workbook off the async runtime and bulk-load it.
pub async fn import_workbook<S>(
  vocabulary: &VocabularyService<S>,
  path: PathBuf,
  force: bool,
  clean: bool,
) -> Result<ImportSummary>
where
  S: WordStore + UserStore + WordTagStore,
{
  let file_name = path.display().to_string();
  let words = tokio::task::spawn_blocking(move || wordhero_import::read_workbook(&path)).await??;
  let summary = vocabulary.import_words(words, force, clean).await?;
  tracing::info!(
    file = %file_name,
    imported = summary.imported,
    removed = summary.removed,
    skipped = summary.skipped,
    "vocabulary imported"
  );
  Ok(summary)
}

/// The API router with request tracing.
pub fn app<S: Backend>(state: AppState<S>) -> Router {
  wordhero_api::router(state).layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  match (s.strip_prefix("~/"), std::env::var("HOME")) {
    (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};
  use wordhero_service::TokenIssuer;

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  async fn state(config: &ServerConfig) -> AppState<SqliteStore> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let tokens = Arc::new(TokenIssuer::new(&config.token_config()));
    AppState::new(store, tokens, config.paging())
  }

  #[test]
  fn defaults_fill_missing_fields() {
    let cfg = parse(r#"jwt_secret = "s3cret""#);
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.jwt_expires_in_secs, 86_400);
    assert_eq!(cfg.jwt_issuer, "word-hero");
    assert_eq!(cfg.paging(), PagingConfig { default_page_size: 12, max_page_size: 100 });
    assert!(cfg.admin_credentials().is_none());
  }

  #[test]
  fn jwt_secret_is_required() {
    let result = Config::builder()
      .add_source(File::from_str("port = 9000", FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize::<ServerConfig>();
    assert!(result.is_err());
  }

  #[test]
  fn admin_credentials_need_all_three_fields() {
    let partial = parse(
      r#"
        jwt_secret     = "s3cret"
        admin_username = "admin"
        admin_password = "admin123"
      "#,
    );
    assert!(partial.admin_credentials().is_none());

    let full = parse(
      r#"
        jwt_secret     = "s3cret"
        admin_username = "admin"
        admin_email    = "admin@example.com"
        admin_password = "admin123"
      "#,
    );
    assert_eq!(
      full.admin_credentials(),
      Some(("admin", "admin@example.com", "admin123"))
    );
  }

  #[tokio::test]
  async fn bootstrap_creates_the_admin_once() {
    let cfg = parse(
      r#"
        jwt_secret     = "s3cret"
        admin_username = "admin"
        admin_email    = "admin@example.com"
        admin_password = "admin123"
      "#,
    );
    let state = state(&cfg).await;
    assert_eq!(bootstrap_accounts(&state, &cfg).await.unwrap(), 1);
    assert_eq!(bootstrap_accounts(&state, &cfg).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn seeding_without_a_file_is_a_no_op() {
    let cfg = parse(r#"jwt_secret = "s3cret""#);
    let state = state(&cfg).await;
    assert!(seed_vocabulary(&state, &cfg).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn missing_workbook_is_an_import_error() {
    let cfg = parse(
      r#"
        jwt_secret  = "s3cret"
        import_file = "/nonexistent/words.xlsx"
      "#,
    );
    let state = state(&cfg).await;
    let err = seed_vocabulary(&state, &cfg).await.unwrap_err();
    assert!(matches!(err, Error::Import(_)), "{err}");
  }
}
