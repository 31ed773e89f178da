//! The `MatchStore` trait.
//!
//! Implemented by storage backends (e.g. `chronoguess-store-sqlite`). The
//! HTTP layer and the seed loader depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  game::{Deal, Game},
  occurrence::{Language, NewOccurrence, Occurrence},
  state::{Match, PlayOutcome},
};

/// Abstraction over a Chronoguess storage backend.
///
/// Backend errors must convert into [`crate::Error`] so outer layers can
/// tell a missing match from a broken database.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Occurrences ───────────────────────────────────────────────────────

  /// Persist a new occurrence unconditionally.
  fn add_occurrence(
    &self,
    input: NewOccurrence,
  ) -> impl Future<Output = Result<Occurrence, Self::Error>> + Send + '_;

  /// Persist an occurrence unless one with identical fields already exists.
  ///
  /// Returns the stored occurrence and whether it was newly created.
  fn add_occurrence_if_absent(
    &self,
    input: NewOccurrence,
  ) -> impl Future<Output = Result<(Occurrence, bool), Self::Error>> + Send + '_;

  /// Retrieve an occurrence by id. Returns `None` if not found.
  fn get_occurrence(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Occurrence>, Self::Error>> + Send + '_;

  /// List occurrences, optionally restricted to one language.
  fn list_occurrences(
    &self,
    language: Option<Language>,
  ) -> impl Future<Output = Result<Vec<Occurrence>, Self::Error>> + Send + '_;

  /// Administrative rewrite of an occurrence's year.
  ///
  /// Fails with a not-found error if the occurrence does not exist.
  fn set_occurrence_year(
    &self,
    id: i64,
    year: i32,
  ) -> impl Future<Output = Result<Occurrence, Self::Error>> + Send + '_;

  // ── Matches ───────────────────────────────────────────────────────────

  /// Persist `deal` as a new game and an opening match referencing it.
  fn create_match(
    &self,
    deal: Deal,
  ) -> impl Future<Output = Result<Match, Self::Error>> + Send + '_;

  /// Retrieve a match by id. Returns `None` if not found.
  fn get_match(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Match>, Self::Error>> + Send + '_;

  /// Retrieve the immutable deal behind a match.
  fn get_game(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Game>, Self::Error>> + Send + '_;

  /// Apply [`Match::play`] to a stored match and persist the result.
  ///
  /// Load, validate, mutate and write happen as one atomic unit: on any
  /// error nothing is written.
  fn play(
    &self,
    match_id: i64,
    occurrence_id: i64,
    position: i64,
  ) -> impl Future<Output = Result<(PlayOutcome, Match), Self::Error>> + Send + '_;
}
