//! chronoguess server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store and either serves the JSON API or loads a seed file:
//!
//! ```text
//! server --config config.toml serve
//! server load-occurrences --file data/occurrences.csv --lang en
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chronoguess_core::occurrence::Language;
use chronoguess_server::{ServerConfig, app, load_occurrences};
use chronoguess_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Chronoguess game server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Load occurrences from a `title,summary,photo_url,year` file.
  LoadOccurrences {
    #[arg(short, long)]
    file: PathBuf,
    /// Language tag for every row. Defaults to `game.default_language`.
    #[arg(short, long)]
    lang: Option<String>,
  },
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

  let server_cfg = ServerConfig::load(&cli.config).with_context(|| {
    format!("failed to load configuration from {:?}", cli.config)
  })?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, &server_cfg).await,
    Command::LoadOccurrences { file, lang } => {
      let language = match lang {
        Some(tag) => Language::parse(&tag)?,
        None => server_cfg.game.default_language,
      };
      let contents = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("failed to read {file:?}"))?;
      let report = load_occurrences(&store, &contents, language)
        .await
        .context("failed to load occurrences")?;
      println!(
        "{} inserted, {} already present, {} duplicates, {} skipped",
        report.inserted, report.existing, report.duplicates, report.skipped
      );
      Ok(())
    }
  }
}

async fn serve(store: SqliteStore, cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = app(Arc::new(store), cfg);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
