//! HTTP server wiring for Chronoguess.
//!
//! Owns the runtime configuration, mounts [`chronoguess_api`] under `/api`
//! and loads seed files into a store. The `server` binary is a thin CLI over
//! this crate.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use chronoguess_api::{ApiState, GameSettings, api_router};
use chronoguess_core::{
  Error as CoreError,
  game::MIN_SAMPLE_SIZE,
  occurrence::Language,
  store::MatchStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CHRONOGUESS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file. A leading `~/` is expanded by the binary.
  pub store_path: PathBuf,
  pub game:       GameSettings,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       8000,
      store_path: "~/.local/share/chronoguess/chronoguess.db".into(),
      game:       GameSettings::default(),
    }
  }
}

impl ServerConfig {
  /// Layer `CHRONOGUESS_*` variables over the optional TOML file at `path`.
  ///
  /// Nested keys use `__`, e.g. `CHRONOGUESS_GAME__SAMPLE_SIZE=10`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let cfg = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CHRONOGUESS")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;
    Self::from_config(cfg)
  }

  /// Deserialise an already layered configuration and check its values.
  pub fn from_config(cfg: config::Config) -> Result<Self, config::ConfigError> {
    let server: Self = cfg.try_deserialize()?;
    if server.game.sample_size < MIN_SAMPLE_SIZE {
      return Err(config::ConfigError::Message(format!(
        "game.sample_size must be at least {MIN_SAMPLE_SIZE}, got {}",
        server.game.sample_size
      )));
    }
    Ok(server)
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application: the API under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: MatchStore + 'static,
{
  let state = ApiState::new(store, config.game.clone());
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Seed loading ────────────────────────────────────────────────────────────

/// Counts from one [`load_occurrences`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
  pub inserted:   usize,
  /// Rows already present in the store.
  pub existing:   usize,
  /// Rows repeated within the file itself.
  pub duplicates: usize,
  pub skipped:    usize,
}

/// Parse seed file `contents` and add every new occurrence to `store`.
///
/// Malformed rows are logged and counted, never fatal. Loading the same file
/// twice inserts nothing the second time.
pub async fn load_occurrences<S>(
  store: &S,
  contents: &str,
  language: Language,
) -> Result<LoadReport, CoreError>
where
  S: MatchStore,
{
  let seed = chronoguess_seed::parse(contents, language);
  for row in &seed.skipped {
    warn!(line = row.line, reason = %row.reason, "skipping seed row");
  }

  let mut report = LoadReport {
    duplicates: seed.duplicates,
    skipped: seed.skipped.len(),
    ..LoadReport::default()
  };

  for row in seed.rows {
    let (_, created) = store
      .add_occurrence_if_absent(row)
      .await
      .map_err(Into::<CoreError>::into)?;
    if created {
      report.inserted += 1;
    } else {
      report.existing += 1;
    }
  }

  info!(
    %language,
    inserted = report.inserted,
    existing = report.existing,
    duplicates = report.duplicates,
    skipped = report.skipped,
    "occurrences loaded"
  );
  Ok(report)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
