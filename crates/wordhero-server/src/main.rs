//! `wordhero` server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store and serves the JSON API over HTTP.
//!
//! ```text
//! wordhero serve
//! wordhero import --file words.xlsx [--force] [--clean]
//! wordhero hash-password
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wordhero_api::AppState;
use wordhero_server::{ServerConfig, app, bootstrap_accounts, import_workbook, open_store, seed_vocabulary};
use wordhero_service::{TokenIssuer, VocabularyService, password::hash_password};

#[derive(Parser)]
#[command(author, version, about = "Word Hero vocabulary server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run the HTTP server (the default).
  Serve,

  /// Load a vocabulary workbook into the store.
  Import {
    /// Workbook to read; defaults to `import_file` from the configuration.
    #[arg(short, long)]
    file:  Option<PathBuf>,
    /// Import even when the corpus already has words.
    #[arg(long)]
    force: bool,
    /// Delete every word (and every mark) before importing.
    #[arg(long)]
    clean: bool,
  },

  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command.unwrap_or(Command::Serve) {
    Command::HashPassword => {
      let password = read_password()?;
      let hash = hash_password(&password).context("failed to hash password")?;
      println!("{hash}");
      Ok(())
    }
    Command::Import { file, force, clean } => {
      let config = load_config(&cli.config)?;
      let path = file
        .or_else(|| config.import_file.clone())
        .context("no workbook given: pass --file or set import_file")?;
      let store = open_store(&config).await.context("failed to open store")?;
      let vocabulary = VocabularyService::new(store);
      let summary = import_workbook(&vocabulary, path, force, clean)
        .await
        .context("import failed")?;
      println!(
        "imported {} words ({} removed, {} skipped)",
        summary.imported, summary.removed, summary.skipped
      );
      Ok(())
    }
    Command::Serve => serve(load_config(&cli.config)?).await,
  }
}

fn load_config(path: &std::path::Path) -> anyhow::Result<ServerConfig> {
  ServerConfig::load(path)
    .with_context(|| format!("failed to load configuration from {}", path.display()))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
  let store = open_store(&config).await.context("failed to open store")?;
  let tokens = Arc::new(TokenIssuer::new(&config.token_config()));
  let state = AppState::new(store, tokens, config.paging());

  bootstrap_accounts(&state, &config)
    .await
    .context("failed to bootstrap accounts")?;
  seed_vocabulary(&state, &config)
    .await
    .context("failed to import vocabulary")?;

  let address = config.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(state)).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
