//! Error type for `chronoguess-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] chronoguess_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A stored value could not be turned back into a domain value.
  #[error("decode error: {0}")]
  Decode(String),
}

impl From<Error> for chronoguess_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => Self::Storage(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
