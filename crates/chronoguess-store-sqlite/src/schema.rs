//! SQL schema for the Chronoguess SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS occurrences (
    occurrence_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    summary       TEXT NOT NULL,
    photo_url     TEXT,
    year          INTEGER NOT NULL,
    language      TEXT NOT NULL,   -- 'en' | 'pt'
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- The deal a match started from. Never updated.
CREATE TABLE IF NOT EXISTS games (
    game_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    language          TEXT NOT NULL,
    starting_hand     INTEGER NOT NULL REFERENCES occurrences(occurrence_id),
    starting_timeline INTEGER NOT NULL REFERENCES occurrences(occurrence_id),
    created_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS game_deck (
    game_id       INTEGER NOT NULL REFERENCES games(game_id),
    position      INTEGER NOT NULL,
    occurrence_id INTEGER NOT NULL REFERENCES occurrences(occurrence_id),
    PRIMARY KEY (game_id, position)
);

CREATE TABLE IF NOT EXISTS matches (
    match_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id        INTEGER NOT NULL REFERENCES games(game_id),
    remaining_life INTEGER NOT NULL DEFAULT 3,
    status         TEXT NOT NULL DEFAULT 'ongoing',   -- 'ongoing' | 'win' | 'lose'
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    CHECK (remaining_life BETWEEN 0 AND 3)
);

-- Current position of every card dealt to a match.
-- A card sits in exactly one pile per match.
CREATE TABLE IF NOT EXISTS match_cards (
    match_id      INTEGER NOT NULL REFERENCES matches(match_id),
    occurrence_id INTEGER NOT NULL REFERENCES occurrences(occurrence_id),
    pile          TEXT NOT NULL,      -- 'hand' | 'timeline' | 'deck' | 'mistakes'
    position      INTEGER NOT NULL,
    PRIMARY KEY (match_id, occurrence_id)
);

CREATE INDEX IF NOT EXISTS occurrences_language_idx ON occurrences(language);
CREATE INDEX IF NOT EXISTS match_cards_match_idx    ON match_cards(match_id);

PRAGMA user_version = 1;
";
