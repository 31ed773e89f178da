//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enumerations are stored as
//! their lowercase tags.

use chrono::{DateTime, Utc};
use chronoguess_core::{
  occurrence::{Language, Occurrence},
  state::MatchStatus,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── Language / MatchStatus ──────────────────────────────────────────────────

pub fn encode_language(l: Language) -> String { l.tag().to_owned() }

pub fn decode_language(s: &str) -> Result<Language> {
  Language::parse(s).map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_status(s: MatchStatus) -> String { s.as_ref().to_owned() }

pub fn decode_status(s: &str) -> Result<MatchStatus> {
  MatchStatus::parse(s).map_err(|e| Error::Decode(e.to_string()))
}

// ─── Pile ────────────────────────────────────────────────────────────────────

/// Which of a match's piles a `match_cards` row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pile {
  Hand,
  Timeline,
  Deck,
  Mistakes,
}

impl Pile {
  pub fn as_str(self) -> &'static str {
    match self {
      Pile::Hand => "hand",
      Pile::Timeline => "timeline",
      Pile::Deck => "deck",
      Pile::Mistakes => "mistakes",
    }
  }

  pub fn decode(s: &str) -> Result<Self> {
    match s {
      "hand" => Ok(Pile::Hand),
      "timeline" => Ok(Pile::Timeline),
      "deck" => Ok(Pile::Deck),
      "mistakes" => Ok(Pile::Mistakes),
      other => Err(Error::Decode(format!("unknown pile: {other:?}"))),
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawOccurrence::from_row`], for an `occurrences`
/// table aliased as `o`.
pub const OCCURRENCE_COLUMNS: &str = "o.occurrence_id, o.title, o.summary, \
  o.photo_url, o.year, o.language, o.created_at, o.updated_at";

/// Raw values read directly from an `occurrences` row.
pub struct RawOccurrence {
  pub occurrence_id: i64,
  pub title:         String,
  pub summary:       String,
  pub photo_url:     Option<String>,
  pub year:          i32,
  pub language:      String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawOccurrence {
  /// Read [`OCCURRENCE_COLUMNS`] starting at column `offset`.
  pub fn from_row(
    row: &rusqlite::Row<'_>,
    offset: usize,
  ) -> rusqlite::Result<Self> {
    Ok(Self {
      occurrence_id: row.get(offset)?,
      title:         row.get(offset + 1)?,
      summary:       row.get(offset + 2)?,
      photo_url:     row.get(offset + 3)?,
      year:          row.get(offset + 4)?,
      language:      row.get(offset + 5)?,
      created_at:    row.get(offset + 6)?,
      updated_at:    row.get(offset + 7)?,
    })
  }

  pub fn into_occurrence(self) -> Result<Occurrence> {
    Ok(Occurrence {
      occurrence_id: self.occurrence_id,
      title:         self.title,
      summary:       self.summary,
      photo_url:     self.photo_url,
      year:          self.year,
      language:      decode_language(&self.language)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read from a `matches` row joined with its game.
pub struct RawMatch {
  pub match_id:       i64,
  pub game_id:        i64,
  pub language:       String,
  pub remaining_life: i64,
  pub status:         String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawMatch {
  pub fn remaining_life(&self) -> Result<u8> {
    u8::try_from(self.remaining_life).map_err(|_| {
      Error::Decode(format!(
        "remaining_life out of range: {}",
        self.remaining_life
      ))
    })
  }
}

/// Raw values read from a `games` row.
pub struct RawGame {
  pub game_id:           i64,
  pub language:          String,
  pub starting_hand:     i64,
  pub starting_timeline: i64,
  pub created_at:        String,
}
