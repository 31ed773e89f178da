//! Why a seed row was rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
  #[error("expected 4 fields, found {0}")]
  FieldCount(usize),

  #[error("invalid year: {0:?}")]
  InvalidYear(String),

  #[error("unterminated quoted field")]
  UnterminatedQuote,
}
