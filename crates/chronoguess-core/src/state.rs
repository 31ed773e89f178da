//! The match state machine.
//!
//! A [`Match`] owns four piles of cards. Cards only ever move
//! `deck → player_hand → timeline | mistakes`, one play at a time, and every
//! play either applies completely or returns an error before touching state.

use std::{collections::VecDeque, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  Error, Result,
  game::Deal,
  occurrence::{Language, Occurrence},
};

/// Lives a player starts with; also the upper bound of `remaining_life`.
pub const STARTING_LIFE: u8 = 3;

// ─── Status and outcome ──────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
  #[default]
  Ongoing,
  Win,
  Lose,
}

impl MatchStatus {
  pub fn is_finished(&self) -> bool { !matches!(self, Self::Ongoing) }

  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownStatus(s.to_owned()))
  }
}

/// Whether a single play landed in the right place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayOutcome {
  Correct,
  Incorrect,
}

// ─── Timeline ────────────────────────────────────────────────────────────────

/// The placed cards, kept sorted ascending by year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
  cards: Vec<Occurrence>,
}

impl Timeline {
  pub fn new(first: Occurrence) -> Self { Self { cards: vec![first] } }

  /// Build a timeline from cards in any order. The sort is stable, so cards
  /// sharing a year keep their relative order.
  pub fn from_cards(mut cards: Vec<Occurrence>) -> Self {
    cards.sort_by_key(|c| c.year);
    Self { cards }
  }

  pub fn len(&self) -> usize { self.cards.len() }

  pub fn is_empty(&self) -> bool { self.cards.is_empty() }

  pub fn cards(&self) -> &[Occurrence] { &self.cards }

  /// Whether a card from `year` may be inserted before index `position`.
  ///
  /// The card must not be earlier than its left neighbour nor later than its
  /// right neighbour. Equal years are accepted on either side.
  pub fn accepts(&self, year: i32, position: usize) -> bool {
    if position > self.cards.len() {
      return false;
    }
    let after_left = position
      .checked_sub(1)
      .map(|i| self.cards[i].year)
      .is_none_or(|left| left <= year);
    let before_right = self
      .cards
      .get(position)
      .is_none_or(|right| year <= right.year);
    after_left && before_right
  }

  fn insert(&mut self, position: usize, card: Occurrence) {
    self.cards.insert(position, card);
  }
}

// ─── Match ───────────────────────────────────────────────────────────────────

/// The mutable state of one player's match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
  pub match_id:       i64,
  pub game_id:        i64,
  pub language:       Language,
  pub timeline:       Timeline,
  pub player_hand:    Vec<Occurrence>,
  /// Cards still to be drawn, head first.
  pub deck:           VecDeque<Occurrence>,
  /// Missed cards in the order they were played.
  pub mistakes:       Vec<Occurrence>,
  pub remaining_life: u8,
  pub status:         MatchStatus,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Match {
  /// The opening state for a freshly dealt game.
  pub fn opening(
    match_id: i64,
    game_id: i64,
    deal: Deal,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      match_id,
      game_id,
      language: deal.language,
      timeline: Timeline::new(deal.starting_timeline),
      player_hand: vec![deal.starting_hand],
      deck: deal.deck.into(),
      mistakes: Vec::new(),
      remaining_life: STARTING_LIFE,
      status: MatchStatus::Ongoing,
      created_at: now,
      updated_at: now,
    }
  }

  /// Every card dealt to this match, wherever it currently sits.
  pub fn card_count(&self) -> usize {
    self.timeline.len()
      + self.player_hand.len()
      + self.deck.len()
      + self.mistakes.len()
  }

  pub fn hand_contains(&self, occurrence_id: i64) -> bool {
    self
      .player_hand
      .iter()
      .any(|c| c.occurrence_id == occurrence_id)
  }

  /// Place the hand card `occurrence_id` before timeline index `position`.
  ///
  /// All preconditions are checked up front; on error the match is left
  /// untouched. On success the card lands on the timeline or in the
  /// mistakes, a new card is drawn if the deck has one, and the status is
  /// updated.
  pub fn play(
    &mut self,
    occurrence_id: i64,
    position: i64,
  ) -> Result<PlayOutcome> {
    if self.status.is_finished() {
      return Err(Error::MatchFinished(self.status));
    }

    let hand_index = self
      .player_hand
      .iter()
      .position(|c| c.occurrence_id == occurrence_id)
      .ok_or(Error::NotInHand(occurrence_id))?;

    let timeline_len = self.timeline.len();
    let slot = usize::try_from(position)
      .ok()
      .filter(|p| *p <= timeline_len)
      .ok_or(Error::InvalidPosition { position, timeline_len })?;

    let card = self.player_hand.remove(hand_index);
    let outcome = if self.timeline.accepts(card.year, slot) {
      self.timeline.insert(slot, card);
      PlayOutcome::Correct
    } else {
      self.remaining_life = self.remaining_life.saturating_sub(1);
      self.mistakes.push(card);
      if self.remaining_life == 0 {
        self.status = MatchStatus::Lose;
      }
      PlayOutcome::Incorrect
    };

    // The draw happens whatever the outcome, including on the losing play.
    if let Some(next) = self.deck.pop_front() {
      self.player_hand.push(next);
    }

    if self.status == MatchStatus::Ongoing
      && self.deck.is_empty()
      && self.player_hand.is_empty()
    {
      self.status = MatchStatus::Win;
    }

    Ok(outcome)
  }
}
