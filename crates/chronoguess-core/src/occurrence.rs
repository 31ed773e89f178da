//! Occurrences: the historical facts printed on every card.
//!
//! Occurrences are loaded once from a seed file and only read afterwards.
//! The one exception is an administrative rewrite of `year`, which exists so
//! tests can force a known answer.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

// ─── Language ────────────────────────────────────────────────────────────────

/// The language a card's text is written in. Matches never mix languages.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
  #[default]
  En,
  Pt,
}

impl Language {
  /// Parse a language tag as it appears in query strings and seed commands.
  pub fn parse(tag: &str) -> Result<Self> {
    Self::from_str(tag).map_err(|_| Error::UnknownLanguage(tag.to_owned()))
  }

  pub fn tag(&self) -> &str { self.as_ref() }
}

// ─── Occurrence ──────────────────────────────────────────────────────────────

/// A stored historical fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
  pub occurrence_id: i64,
  pub title:         String,
  pub summary:       String,
  pub photo_url:     Option<String>,
  pub year:          i32,
  pub language:      Language,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

// ─── NewOccurrence ───────────────────────────────────────────────────────────

/// Input to [`crate::store::MatchStore::add_occurrence`]. Ids and timestamps
/// are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewOccurrence {
  pub title:     String,
  pub summary:   String,
  pub photo_url: Option<String>,
  pub year:      i32,
  pub language:  Language,
}

impl NewOccurrence {
  /// Convenience constructor for a card without a photo.
  pub fn new(
    title: impl Into<String>,
    summary: impl Into<String>,
    year: i32,
    language: Language,
  ) -> Self {
    Self {
      title: title.into(),
      summary: summary.into(),
      photo_url: None,
      year,
      language,
    }
  }
}
