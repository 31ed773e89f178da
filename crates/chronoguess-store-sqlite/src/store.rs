//! [`SqliteStore`]: the SQLite implementation of [`MatchStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use chronoguess_core::{
  Error as CoreError,
  game::{Deal, Game},
  occurrence::{Language, NewOccurrence, Occurrence},
  state::{Match, PlayOutcome, Timeline},
  store::MatchStore,
};

use crate::{
  Error, Result,
  encode::{
    OCCURRENCE_COLUMNS, Pile, RawGame, RawMatch, RawOccurrence, decode_dt,
    decode_language, decode_status, encode_dt, encode_language, encode_status,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Chronoguess store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Synchronous helpers ─────────────────────────────────────────────────────
//
// These run on the connection thread, usually inside a transaction. They
// return this crate's `Result` so domain errors can abort a transaction.

fn find_occurrence(
  conn: &rusqlite::Connection,
  id: i64,
) -> Result<Option<Occurrence>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {OCCURRENCE_COLUMNS} FROM occurrences o
         WHERE o.occurrence_id = ?1"
      ),
      rusqlite::params![id],
      |row| RawOccurrence::from_row(row, 0),
    )
    .optional()?;
  raw.map(RawOccurrence::into_occurrence).transpose()
}

fn find_duplicate(
  conn: &rusqlite::Connection,
  input: &NewOccurrence,
) -> Result<Option<Occurrence>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {OCCURRENCE_COLUMNS} FROM occurrences o
         WHERE o.title = ?1 AND o.summary = ?2 AND o.photo_url IS ?3
           AND o.year = ?4 AND o.language = ?5
         LIMIT 1"
      ),
      rusqlite::params![
        input.title,
        input.summary,
        input.photo_url,
        input.year,
        encode_language(input.language),
      ],
      |row| RawOccurrence::from_row(row, 0),
    )
    .optional()?;
  raw.map(RawOccurrence::into_occurrence).transpose()
}

fn insert_occurrence(
  conn: &rusqlite::Connection,
  input: NewOccurrence,
  now: DateTime<Utc>,
) -> Result<Occurrence> {
  conn.execute(
    "INSERT INTO occurrences (
       title, summary, photo_url, year, language, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    rusqlite::params![
      input.title,
      input.summary,
      input.photo_url,
      input.year,
      encode_language(input.language),
      encode_dt(now),
    ],
  )?;

  Ok(Occurrence {
    occurrence_id: conn.last_insert_rowid(),
    title:         input.title,
    summary:       input.summary,
    photo_url:     input.photo_url,
    year:          input.year,
    language:      input.language,
    created_at:    now,
    updated_at:    now,
  })
}

/// Write every pile of `m` into `match_cards`.
fn insert_cards(conn: &rusqlite::Connection, m: &Match) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO match_cards (match_id, occurrence_id, pile, position)
     VALUES (?1, ?2, ?3, ?4)",
  )?;

  let piles: [(Pile, Vec<i64>); 4] = [
    (Pile::Hand, m.player_hand.iter().map(|c| c.occurrence_id).collect()),
    (
      Pile::Timeline,
      m.timeline.cards().iter().map(|c| c.occurrence_id).collect(),
    ),
    (Pile::Deck, m.deck.iter().map(|c| c.occurrence_id).collect()),
    (Pile::Mistakes, m.mistakes.iter().map(|c| c.occurrence_id).collect()),
  ];

  for (pile, ids) in piles {
    for (position, id) in ids.into_iter().enumerate() {
      stmt.execute(rusqlite::params![
        m.match_id,
        id,
        pile.as_str(),
        position as i64,
      ])?;
    }
  }
  Ok(())
}

fn insert_deal(
  conn: &rusqlite::Connection,
  deal: Deal,
  now: DateTime<Utc>,
) -> Result<Match> {
  let now_str = encode_dt(now);

  conn.execute(
    "INSERT INTO games (language, starting_hand, starting_timeline, created_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      encode_language(deal.language),
      deal.starting_hand.occurrence_id,
      deal.starting_timeline.occurrence_id,
      now_str,
    ],
  )?;
  let game_id = conn.last_insert_rowid();

  {
    let mut stmt = conn.prepare(
      "INSERT INTO game_deck (game_id, position, occurrence_id)
       VALUES (?1, ?2, ?3)",
    )?;
    for (position, card) in deal.deck.iter().enumerate() {
      stmt.execute(rusqlite::params![
        game_id,
        position as i64,
        card.occurrence_id,
      ])?;
    }
  }

  let mut m = Match::opening(0, game_id, deal, now);
  conn.execute(
    "INSERT INTO matches (
       game_id, remaining_life, status, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?4)",
    rusqlite::params![
      game_id,
      m.remaining_life,
      encode_status(m.status),
      now_str,
    ],
  )?;
  m.match_id = conn.last_insert_rowid();

  insert_cards(conn, &m)?;
  Ok(m)
}

fn load_match(
  conn: &rusqlite::Connection,
  match_id: i64,
) -> Result<Option<Match>> {
  let raw = conn
    .query_row(
      "SELECT m.match_id, m.game_id, g.language, m.remaining_life, m.status,
              m.created_at, m.updated_at
       FROM matches m
       JOIN games g ON g.game_id = m.game_id
       WHERE m.match_id = ?1",
      rusqlite::params![match_id],
      |row| {
        Ok(RawMatch {
          match_id:       row.get(0)?,
          game_id:        row.get(1)?,
          language:       row.get(2)?,
          remaining_life: row.get(3)?,
          status:         row.get(4)?,
          created_at:     row.get(5)?,
          updated_at:     row.get(6)?,
        })
      },
    )
    .optional()?;

  let Some(raw) = raw else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(&format!(
    "SELECT mc.pile, {OCCURRENCE_COLUMNS}
     FROM match_cards mc
     JOIN occurrences o ON o.occurrence_id = mc.occurrence_id
     WHERE mc.match_id = ?1
     ORDER BY mc.pile, mc.position"
  ))?;
  let rows = stmt
    .query_map(rusqlite::params![match_id], |row| {
      Ok((row.get::<_, String>(0)?, RawOccurrence::from_row(row, 1)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut hand = Vec::new();
  let mut timeline = Vec::new();
  let mut deck = Vec::new();
  let mut mistakes = Vec::new();
  for (pile, raw_card) in rows {
    let card = raw_card.into_occurrence()?;
    match Pile::decode(&pile)? {
      Pile::Hand => hand.push(card),
      Pile::Timeline => timeline.push(card),
      Pile::Deck => deck.push(card),
      Pile::Mistakes => mistakes.push(card),
    }
  }

  Ok(Some(Match {
    match_id:       raw.match_id,
    game_id:        raw.game_id,
    language:       decode_language(&raw.language)?,
    // Years may have been rewritten since the last play; re-sort on load.
    timeline:       Timeline::from_cards(timeline),
    player_hand:    hand,
    deck:           deck.into(),
    mistakes,
    remaining_life: raw.remaining_life()?,
    status:         decode_status(&raw.status)?,
    created_at:     decode_dt(&raw.created_at)?,
    updated_at:     decode_dt(&raw.updated_at)?,
  }))
}

fn save_match(conn: &rusqlite::Connection, m: &Match) -> Result<()> {
  conn.execute(
    "UPDATE matches SET remaining_life = ?2, status = ?3, updated_at = ?4
     WHERE match_id = ?1",
    rusqlite::params![
      m.match_id,
      m.remaining_life,
      encode_status(m.status),
      encode_dt(m.updated_at),
    ],
  )?;
  conn.execute(
    "DELETE FROM match_cards WHERE match_id = ?1",
    rusqlite::params![m.match_id],
  )?;
  insert_cards(conn, m)
}

fn play_in(
  conn: &rusqlite::Connection,
  match_id: i64,
  occurrence_id: i64,
  position: i64,
  now: DateTime<Utc>,
) -> Result<(PlayOutcome, Match)> {
  let mut m =
    load_match(conn, match_id)?.ok_or(CoreError::MatchNotFound(match_id))?;

  // Distinguish an id that exists nowhere from a real card that simply is not
  // in this hand.
  if !m.status.is_finished()
    && !m.hand_contains(occurrence_id)
    && find_occurrence(conn, occurrence_id)?.is_none()
  {
    return Err(CoreError::OccurrenceNotFound(occurrence_id).into());
  }

  let outcome = m.play(occurrence_id, position)?;
  m.updated_at = now;
  save_match(conn, &m)?;
  Ok((outcome, m))
}

fn load_game(
  conn: &rusqlite::Connection,
  game_id: i64,
) -> Result<Option<Game>> {
  let raw = conn
    .query_row(
      "SELECT game_id, language, starting_hand, starting_timeline, created_at
       FROM games WHERE game_id = ?1",
      rusqlite::params![game_id],
      |row| {
        Ok(RawGame {
          game_id:           row.get(0)?,
          language:          row.get(1)?,
          starting_hand:     row.get(2)?,
          starting_timeline: row.get(3)?,
          created_at:        row.get(4)?,
        })
      },
    )
    .optional()?;

  let Some(raw) = raw else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(
    "SELECT occurrence_id FROM game_deck WHERE game_id = ?1 ORDER BY position",
  )?;
  let deck = stmt
    .query_map(rusqlite::params![game_id], |row| row.get::<_, i64>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Some(Game {
    game_id:           raw.game_id,
    language:          decode_language(&raw.language)?,
    starting_hand:     raw.starting_hand,
    starting_timeline: raw.starting_timeline,
    deck,
    created_at:        decode_dt(&raw.created_at)?,
  }))
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  // ── Occurrences ───────────────────────────────────────────────────────────

  async fn add_occurrence(&self, input: NewOccurrence) -> Result<Occurrence> {
    let now = Utc::now();
    self
      .conn
      .call(move |conn| Ok(insert_occurrence(conn, input, now)))
      .await?
  }

  async fn add_occurrence_if_absent(
    &self,
    input: NewOccurrence,
  ) -> Result<(Occurrence, bool)> {
    let now = Utc::now();
    self
      .conn
      .call(move |conn| {
        Ok(match find_duplicate(conn, &input) {
          Ok(Some(existing)) => Ok((existing, false)),
          Ok(None) => insert_occurrence(conn, input, now).map(|o| (o, true)),
          Err(e) => Err(e),
        })
      })
      .await?
  }

  async fn get_occurrence(&self, id: i64) -> Result<Option<Occurrence>> {
    self
      .conn
      .call(move |conn| Ok(find_occurrence(conn, id)))
      .await?
  }

  async fn list_occurrences(
    &self,
    language: Option<Language>,
  ) -> Result<Vec<Occurrence>> {
    let language_str = language.map(encode_language);

    let raws: Vec<RawOccurrence> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {OCCURRENCE_COLUMNS} FROM occurrences o
           WHERE ?1 IS NULL OR o.language = ?1
           ORDER BY o.occurrence_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![language_str], |row| {
            RawOccurrence::from_row(row, 0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOccurrence::into_occurrence).collect()
  }

  async fn set_occurrence_year(
    &self,
    id: i64,
    year: i32,
  ) -> Result<Occurrence> {
    let now_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE occurrences SET year = ?2, updated_at = ?3
           WHERE occurrence_id = ?1",
          rusqlite::params![id, year, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(CoreError::OccurrenceNotFound(id).into());
    }

    self
      .get_occurrence(id)
      .await?
      .ok_or(Error::Core(CoreError::OccurrenceNotFound(id)))
  }

  // ── Matches ───────────────────────────────────────────────────────────────

  async fn create_match(&self, deal: Deal) -> Result<Match> {
    let now = Utc::now();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let created = insert_deal(&tx, deal, now);
        if created.is_ok() {
          tx.commit()?;
        }
        Ok(created)
      })
      .await?
  }

  async fn get_match(&self, id: i64) -> Result<Option<Match>> {
    self.conn.call(move |conn| Ok(load_match(conn, id))).await?
  }

  async fn get_game(&self, id: i64) -> Result<Option<Game>> {
    self.conn.call(move |conn| Ok(load_game(conn, id))).await?
  }

  async fn play(
    &self,
    match_id: i64,
    occurrence_id: i64,
    position: i64,
  ) -> Result<(PlayOutcome, Match)> {
    let now = Utc::now();
    self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock up front, so no other writer can
        // slip in between reading the match and saving it.
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let played = play_in(&tx, match_id, occurrence_id, position, now);
        if played.is_ok() {
          tx.commit()?;
        }
        Ok(played)
      })
      .await?
  }
}
