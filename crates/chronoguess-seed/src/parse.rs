//! Line splitter and row decoder.
//!
//! Pipeline:
//!   raw &str
//!     └─ lines()          → (line number, &str), header dropped
//!          └─ split_fields() → Vec<String>
//!               └─ decode_row() → NewOccurrence

use std::collections::HashSet;

use chronoguess_core::occurrence::{Language, NewOccurrence};

use crate::{SeedFile, SkippedRow, error::RowError};

const FIELD_COUNT: usize = 4;

pub(crate) fn parse_file(input: &str, language: Language) -> SeedFile {
  let mut seed = SeedFile::default();
  let mut seen = HashSet::new();

  for (index, raw) in input.split('\n').enumerate().skip(1) {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.trim().is_empty() {
      continue;
    }

    match split_fields(line).and_then(|f| decode_row(f, language)) {
      Ok(row) => {
        if seen.insert(row.clone()) {
          seed.rows.push(row);
        } else {
          seed.duplicates += 1;
        }
      }
      Err(reason) => seed.skipped.push(SkippedRow { line: index + 1, reason }),
    }
  }

  seed
}

/// Split on `,` while respecting double-quoted fields.
///
/// Inside quotes a doubled `""` stands for one literal quote. Whitespace
/// around each field is trimmed.
fn split_fields(line: &str) -> Result<Vec<String>, RowError> {
  let mut fields = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;
  let mut chars = line.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes => {
        if chars.peek() == Some(&'"') {
          chars.next();
          current.push('"');
        } else {
          in_quotes = false;
        }
      }
      '"' if current.trim().is_empty() => {
        current.clear();
        in_quotes = true;
      }
      ',' if !in_quotes => fields.push(finish(&mut current)),
      _ => current.push(c),
    }
  }

  if in_quotes {
    return Err(RowError::UnterminatedQuote);
  }
  fields.push(finish(&mut current));
  Ok(fields)
}

fn finish(current: &mut String) -> String {
  let field = current.trim().to_owned();
  current.clear();
  field
}

fn decode_row(
  fields: Vec<String>,
  language: Language,
) -> Result<NewOccurrence, RowError> {
  let [title, summary, photo_url, year] =
    match <[String; FIELD_COUNT]>::try_from(fields) {
      Ok(fields) => fields,
      Err(fields) => return Err(RowError::FieldCount(fields.len())),
    };

  let year = year
    .parse::<i32>()
    .map_err(|_| RowError::InvalidYear(year.clone()))?;

  Ok(NewOccurrence {
    title,
    summary,
    photo_url: (!photo_url.is_empty()).then_some(photo_url),
    year,
    language,
  })
}
