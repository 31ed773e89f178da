//! Seed-file codec for Chronoguess occurrences.
//!
//! A seed file is comma-delimited text with a header row followed by one
//! occurrence per line:
//!
//! ```text
//! title,summary,photo_url,year
//! Moon landing,"Apollo 11 lands, at last",https://img.example/moon.jpg,1969
//! ```
//!
//! Pure synchronous; persisting the rows is the caller's job.
//!
//! # Quick start
//!
//! ```no_run
//! use chronoguess_core::occurrence::Language;
//! use chronoguess_seed::parse;
//!
//! let seed = parse("title,summary,photo_url,year\nA,B,,1990\n", Language::En);
//! println!("{} rows, {} skipped", seed.rows.len(), seed.skipped.len());
//! ```

pub mod error;
mod parse;

use chronoguess_core::occurrence::{Language, NewOccurrence};
pub use error::RowError;

// ─── Public types ────────────────────────────────────────────────────────────

/// The outcome of parsing a whole seed file.
#[derive(Debug, Default)]
pub struct SeedFile {
  /// Distinct occurrences in file order.
  pub rows:       Vec<NewOccurrence>,
  /// Rows that could not be decoded.
  pub skipped:    Vec<SkippedRow>,
  /// Rows dropped because an identical row appeared earlier in the file.
  pub duplicates: usize,
}

/// A rejected row and its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
  pub line:   usize,
  pub reason: RowError,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a seed file, tagging every occurrence with `language`.
///
/// The first line is a header and is always ignored, as are blank lines.
/// Malformed rows are collected in [`SeedFile::skipped`] instead of
/// aborting the load.
pub fn parse(input: &str, language: Language) -> SeedFile {
  parse::parse_file(input, language)
}
