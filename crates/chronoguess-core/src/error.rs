//! Error types for `chronoguess-core`.

use thiserror::Error;

use crate::{occurrence::Language, state::MatchStatus};

#[derive(Debug, Error)]
pub enum Error {
  #[error("match not found: {0}")]
  MatchNotFound(i64),

  #[error("occurrence not found: {0}")]
  OccurrenceNotFound(i64),

  #[error("unknown language tag: {0:?}")]
  UnknownLanguage(String),

  #[error("invalid position {position} for a timeline of {timeline_len} cards")]
  InvalidPosition { position: i64, timeline_len: usize },

  #[error("occurrence {0} is not in the player's hand")]
  NotInHand(i64),

  #[error("match is already finished ({0})")]
  MatchFinished(MatchStatus),

  #[error(
    "not enough occurrences for language {language}: {available} available, \
     {required} required"
  )]
  InsufficientData {
    language:  Language,
    available: usize,
    required:  usize,
  },

  #[error("unknown match status: {0:?}")]
  UnknownStatus(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of an [`Error`], used by outer layers to choose a
/// response without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Validation,
  Precondition,
  Unavailable,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::MatchNotFound(_) | Self::OccurrenceNotFound(_) => {
        ErrorKind::NotFound
      }
      Self::UnknownLanguage(_) | Self::InvalidPosition { .. } => {
        ErrorKind::Validation
      }
      Self::NotInHand(_) | Self::MatchFinished(_) => ErrorKind::Precondition,
      Self::InsufficientData { .. } => ErrorKind::Unavailable,
      Self::UnknownStatus(_) | Self::Storage(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
