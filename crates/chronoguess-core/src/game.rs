//! Dealing: turning a pool of occurrences into the opening state of a match.
//!
//! A [`Deal`] is the in-memory result of sampling; once persisted it becomes
//! a [`Game`], the immutable record of what was dealt, and the first state of
//! a [`crate::state::Match`].

use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  occurrence::{Language, Occurrence},
};

/// Number of cards dealt per match unless configured otherwise.
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

/// A deal needs at least one card for the hand and one for the timeline.
pub const MIN_SAMPLE_SIZE: usize = 2;

// ─── Deal ────────────────────────────────────────────────────────────────────

/// The cards of a freshly sampled match, before anything is persisted.
#[derive(Debug, Clone)]
pub struct Deal {
  pub language:          Language,
  pub starting_hand:     Occurrence,
  pub starting_timeline: Occurrence,
  /// Remaining cards in draw order.
  pub deck:              Vec<Occurrence>,
}

impl Deal {
  /// Sample `sample_size` cards from `pool` without replacement.
  ///
  /// The first sampled card goes to the hand, the second seeds the timeline
  /// and the rest form the deck in sampled order. Fails with
  /// [`Error::InsufficientData`] rather than dealing a short game.
  pub fn draw<R: Rng + ?Sized>(
    language: Language,
    mut pool: Vec<Occurrence>,
    sample_size: usize,
    rng: &mut R,
  ) -> Result<Self> {
    let required = sample_size.max(MIN_SAMPLE_SIZE);
    let available = pool.len();
    if available < required {
      return Err(Error::InsufficientData { language, available, required });
    }

    let (picked, _) = pool.partial_shuffle(rng, required);
    let mut cards = picked.to_vec().into_iter();

    match (cards.next(), cards.next()) {
      (Some(starting_hand), Some(starting_timeline)) => Ok(Self {
        language,
        starting_hand,
        starting_timeline,
        deck: cards.collect(),
      }),
      _ => Err(Error::InsufficientData { language, available, required }),
    }
  }

  /// Total number of cards in the deal.
  pub fn card_count(&self) -> usize { self.deck.len() + 2 }
}

// ─── Game ────────────────────────────────────────────────────────────────────

/// The persisted, never-mutated record of a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
  pub game_id:           i64,
  pub language:          Language,
  pub starting_hand:     i64,
  pub starting_timeline: i64,
  /// Occurrence ids in draw order.
  pub deck:              Vec<i64>,
  pub created_at:        DateTime<Utc>,
}
