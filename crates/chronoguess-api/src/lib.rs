//! JSON REST API for Chronoguess.
//!
//! Exposes an axum [`Router`] backed by any
//! [`chronoguess_core::store::MatchStore`]. Transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", chronoguess_api::api_router(state))
//! ```

pub mod error;
pub mod matches;

use std::sync::{Arc, Mutex};

use axum::{Router, routing::get};
use chronoguess_core::{
  game::DEFAULT_SAMPLE_SIZE,
  occurrence::Language,
  store::MatchStore,
  view::ViewOptions,
};
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

pub use error::ApiError;

// ─── Settings ────────────────────────────────────────────────────────────────

/// Tunables for dealing and presenting matches. The `[game]` table of the
/// server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameSettings {
  pub sample_size:      usize,
  /// Used when `GET /match/` carries no `lang` parameter.
  pub default_language: Language,
  /// Fixed RNG seed. Deals are reproducible when set.
  pub seed:             Option<u64>,
  pub view:             ViewOptions,
}

impl Default for GameSettings {
  fn default() -> Self {
    Self {
      sample_size:      DEFAULT_SAMPLE_SIZE,
      default_language: Language::default(),
      seed:             None,
      view:             ViewOptions::default(),
    }
  }
}

impl GameSettings {
  /// The dealing RNG: seeded from [`Self::seed`] or from OS entropy.
  pub fn rng(&self) -> ChaCha8Rng {
    match self.seed {
      Some(seed) => ChaCha8Rng::seed_from_u64(seed),
      None => ChaCha8Rng::from_entropy(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub settings: Arc<GameSettings>,
  /// Held only for the synchronous draw, never across an await.
  pub rng:      Arc<Mutex<ChaCha8Rng>>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, settings: GameSettings) -> Self {
    let rng = settings.rng();
    Self {
      store,
      settings: Arc::new(settings),
      rng: Arc::new(Mutex::new(rng)),
    }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      settings: Arc::clone(&self.settings),
      rng:      Arc::clone(&self.rng),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: MatchStore + 'static,
{
  Router::new()
    .route("/match/", get(matches::create::<S>))
    .route(
      "/match/{id}/",
      get(matches::get_one::<S>).post(matches::play::<S>),
    )
    .with_state(state)
}
