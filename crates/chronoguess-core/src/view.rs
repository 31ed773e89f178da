//! Wire views of matches and occurrences.
//!
//! Views are computed from a [`Match`] after every state change and never
//! stored. Years of cards still in the player's hand are always withheld.

use serde::{Deserialize, Serialize};

use crate::{
  occurrence::Occurrence,
  state::{Match, MatchStatus, PlayOutcome},
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Which optional fields a [`MatchView`] carries.
///
/// The default shape is `mistakes` plus `timeline_size_goal`; the deck count
/// is an alternative to the mistakes list and stays off unless asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
  /// Embed the missed cards, years included.
  pub mistakes:           bool,
  /// Report how many cards are left to draw.
  pub remaining_deck:     bool,
  /// Report the timeline size of a flawless game.
  pub timeline_size_goal: bool,
}

impl Default for ViewOptions {
  fn default() -> Self {
    Self {
      mistakes:           true,
      remaining_deck:     false,
      timeline_size_goal: true,
    }
  }
}

// ─── Occurrence ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceView {
  pub id:        i64,
  pub title:     String,
  pub summary:   String,
  pub photo_url: Option<String>,
  /// `None` while the card is still in the player's hand.
  pub year:      Option<i32>,
}

impl OccurrenceView {
  pub fn revealed(o: &Occurrence) -> Self { Self::build(o, Some(o.year)) }

  pub fn hidden(o: &Occurrence) -> Self { Self::build(o, None) }

  fn build(o: &Occurrence, year: Option<i32>) -> Self {
    Self {
      id: o.occurrence_id,
      title: o.title.clone(),
      summary: o.summary.clone(),
      photo_url: o.photo_url.clone(),
      year,
    }
  }
}

// ─── Match ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
  pub id:                 i64,
  pub player_hand:        Vec<OccurrenceView>,
  pub timeline:           Vec<OccurrenceView>,
  pub remaining_life:     u8,
  pub status:             MatchStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mistakes:           Option<Vec<OccurrenceView>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub remaining_deck:     Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeline_size_goal: Option<usize>,
}

impl MatchView {
  pub fn new(m: &Match, options: &ViewOptions) -> Self {
    Self {
      id:                 m.match_id,
      player_hand:        m
        .player_hand
        .iter()
        .map(OccurrenceView::hidden)
        .collect(),
      timeline:           m
        .timeline
        .cards()
        .iter()
        .map(OccurrenceView::revealed)
        .collect(),
      remaining_life:     m.remaining_life,
      status:             m.status,
      mistakes:           options
        .mistakes
        .then(|| m.mistakes.iter().map(OccurrenceView::revealed).collect()),
      remaining_deck:     options.remaining_deck.then_some(m.deck.len()),
      timeline_size_goal: options.timeline_size_goal.then_some(m.card_count()),
    }
  }
}

/// Response to a play: the outcome plus the match as it stands afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayView {
  pub status:     PlayOutcome,
  #[serde(rename = "match")]
  pub game_match: MatchView,
}

impl PlayView {
  pub fn new(outcome: PlayOutcome, m: &Match, options: &ViewOptions) -> Self {
    Self {
      status:     outcome,
      game_match: MatchView::new(m, options),
    }
  }
}
