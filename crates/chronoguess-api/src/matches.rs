//! Handlers for `/match` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/match/` | Deals a new match. Optional `?lang=en\|pt` |
//! | `GET`  | `/match/:id/` | 404 if not found |
//! | `POST` | `/match/:id/` | Body: `{"occurrence_id":1,"position":0}` |

use std::sync::PoisonError;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
};
use bytes::Bytes;
use chronoguess_core::{
  game::Deal,
  occurrence::Language,
  store::MatchStore,
  view::{MatchView, PlayView},
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
  ApiState,
  error::{ApiError, store_error},
};

/// Ids that do not parse as integers cannot name a match.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
  raw.parse().map_err(|_| ApiError::not_found())
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateParams {
  pub lang: Option<String>,
}

/// `GET /match/[?lang=<tag>]`
///
/// A query string that does not decode (a repeated `lang`, bad escapes) is
/// reported like an unknown tag.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<CreateParams>, QueryRejection>,
) -> Result<Json<MatchView>, ApiError>
where
  S: MatchStore,
{
  let Query(params) = params.map_err(|rejection| {
    debug!(%rejection, "undecodable match query");
    ApiError::BadRequest("Invalid language".into())
  })?;
  let language = match params.lang.as_deref() {
    Some(tag) => Language::parse(tag)?,
    None => state.settings.default_language,
  };

  let pool = state
    .store
    .list_occurrences(Some(language))
    .await
    .map_err(store_error)?;

  let deal = {
    let mut rng = state.rng.lock().unwrap_or_else(PoisonError::into_inner);
    Deal::draw(language, pool, state.settings.sample_size, &mut *rng)?
  };

  let created = state.store.create_match(deal).await.map_err(store_error)?;
  info!(
    match_id = created.match_id,
    game_id = created.game_id,
    language = %language,
    "match created"
  );
  Ok(Json(MatchView::new(&created, &state.settings.view)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /match/:id/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<MatchView>, ApiError>
where
  S: MatchStore,
{
  let id = parse_id(&id)?;
  let found = state
    .store
    .get_match(id)
    .await
    .map_err(store_error)?
    .ok_or_else(ApiError::not_found)?;
  Ok(Json(MatchView::new(&found, &state.settings.view)))
}

// ─── Play ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlayBody {
  pub occurrence_id: i64,
  /// Index in the timeline before which the card is inserted.
  pub position:      i64,
}

/// `POST /match/:id/`
///
/// The body is decoded by hand so that any malformed or incomplete payload
/// yields the same `Invalid JSON` error.
pub async fn play<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  body: Bytes,
) -> Result<Json<PlayView>, ApiError>
where
  S: MatchStore,
{
  let body: PlayBody = serde_json::from_slice(&body)
    .map_err(|_| ApiError::BadRequest("Invalid JSON".into()))?;
  let id = parse_id(&id)?;

  let (outcome, played) = state
    .store
    .play(id, body.occurrence_id, body.position)
    .await
    .map_err(store_error)?;

  debug!(
    match_id = id,
    occurrence_id = body.occurrence_id,
    position = body.position,
    ?outcome,
    status = %played.status,
    remaining_life = played.remaining_life,
    "card played"
  );
  Ok(Json(PlayView::new(outcome, &played, &state.settings.view)))
}
