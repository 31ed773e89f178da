//! Integration tests for `SqliteStore` against an in-memory database.

use chronoguess_core::{
  Error as CoreError, ErrorKind,
  game::Deal,
  occurrence::{Language, NewOccurrence, Occurrence},
  state::{MatchStatus, PlayOutcome, STARTING_LIFE},
  store::MatchStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn add(s: &SqliteStore, title: &str, year: i32) -> Occurrence {
  s.add_occurrence(NewOccurrence::new(title, "summary", year, Language::En))
    .await
    .unwrap()
}

/// A deal whose hand card is `hand_year`, timeline card 1900 and whose deck
/// holds one card per entry of `deck_years`.
async fn deal(s: &SqliteStore, hand_year: i32, deck_years: &[i32]) -> Deal {
  let starting_hand = add(s, "hand", hand_year).await;
  let starting_timeline = add(s, "timeline", 1900).await;
  let mut deck = Vec::new();
  for (i, year) in deck_years.iter().enumerate() {
    deck.push(add(s, &format!("deck {i}"), *year).await);
  }
  Deal { language: Language::En, starting_hand, starting_timeline, deck }
}

fn core(e: Error) -> CoreError { e.into() }

// ─── Occurrences ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_occurrence() {
  let s = store().await;

  let mut input = NewOccurrence::new(
    "Moon landing",
    "Apollo 11 lands on the Moon",
    1969,
    Language::En,
  );
  input.photo_url = Some("https://img.example/apollo.jpg".into());
  let created = s.add_occurrence(input).await.unwrap();

  let fetched = s
    .get_occurrence(created.occurrence_id)
    .await
    .unwrap()
    .expect("stored occurrence");
  assert_eq!(fetched, created);
  assert_eq!(
    fetched.photo_url.as_deref(),
    Some("https://img.example/apollo.jpg")
  );
}

#[tokio::test]
async fn get_occurrence_missing_returns_none() {
  let s = store().await;
  assert!(s.get_occurrence(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_occurrences_filters_by_language() {
  let s = store().await;
  add(&s, "one", 1).await;
  add(&s, "two", 2).await;
  s.add_occurrence(NewOccurrence::new("três", "resumo", 3, Language::Pt))
    .await
    .unwrap();

  assert_eq!(s.list_occurrences(None).await.unwrap().len(), 3);

  let en = s.list_occurrences(Some(Language::En)).await.unwrap();
  assert_eq!(en.len(), 2);
  assert!(en.iter().all(|o| o.language == Language::En));

  let pt = s.list_occurrences(Some(Language::Pt)).await.unwrap();
  assert_eq!(pt.len(), 1);
  assert_eq!(pt[0].title, "três");
}

#[tokio::test]
async fn add_if_absent_skips_identical_rows() {
  let s = store().await;
  let input = NewOccurrence::new("Fall of Rome", "summary", 476, Language::En);

  let (first, created) =
    s.add_occurrence_if_absent(input.clone()).await.unwrap();
  assert!(created);
  let (second, created) = s.add_occurrence_if_absent(input).await.unwrap();
  assert!(!created);
  assert_eq!(first.occurrence_id, second.occurrence_id);

  // A different year is a different card.
  let (_, created) = s
    .add_occurrence_if_absent(NewOccurrence::new(
      "Fall of Rome",
      "summary",
      477,
      Language::En,
    ))
    .await
    .unwrap();
  assert!(created);
  assert_eq!(s.list_occurrences(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn set_occurrence_year_updates_row() {
  let s = store().await;
  let o = add(&s, "Printing press", 1400).await;

  let updated = s.set_occurrence_year(o.occurrence_id, 1440).await.unwrap();
  assert_eq!(updated.year, 1440);
  assert!(updated.updated_at >= o.updated_at);

  let fetched = s.get_occurrence(o.occurrence_id).await.unwrap().unwrap();
  assert_eq!(fetched.year, 1440);
}

#[tokio::test]
async fn set_occurrence_year_missing_is_not_found() {
  let s = store().await;
  let err = core(s.set_occurrence_year(7, 2000).await.unwrap_err());
  assert!(matches!(err, CoreError::OccurrenceNotFound(7)));
}

// ─── Matches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_match_persists_opening_state() {
  let s = store().await;
  let d = deal(&s, 1950, &[1960, 1970]).await;
  let hand_id = d.starting_hand.occurrence_id;
  let timeline_id = d.starting_timeline.occurrence_id;

  let m = s.create_match(d).await.unwrap();
  assert_eq!(m.remaining_life, STARTING_LIFE);
  assert_eq!(m.status, MatchStatus::Ongoing);

  let fetched = s.get_match(m.match_id).await.unwrap().expect("stored match");
  assert_eq!(fetched, m);
  assert_eq!(fetched.player_hand[0].occurrence_id, hand_id);
  assert_eq!(fetched.timeline.cards()[0].occurrence_id, timeline_id);
  assert_eq!(fetched.deck.len(), 2);
  assert_eq!(fetched.card_count(), 4);
}

#[tokio::test]
async fn get_match_missing_returns_none() {
  let s = store().await;
  assert!(s.get_match(1).await.unwrap().is_none());
}

#[tokio::test]
async fn game_keeps_the_dealt_deck_order() {
  let s = store().await;
  let d = deal(&s, 1950, &[1990, 1960, 1980]).await;
  let deck_ids: Vec<i64> = d.deck.iter().map(|c| c.occurrence_id).collect();
  let hand_id = d.starting_hand.occurrence_id;

  let m = s.create_match(d).await.unwrap();
  let game = s.get_game(m.game_id).await.unwrap().expect("stored game");
  assert_eq!(game.starting_hand, hand_id);
  assert_eq!(game.deck, deck_ids);
  assert_eq!(game.language, Language::En);

  assert!(s.get_game(m.game_id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn correct_play_is_persisted() {
  let s = store().await;
  let d = deal(&s, 1950, &[1960]).await;
  let hand_id = d.starting_hand.occurrence_id;
  let m = s.create_match(d).await.unwrap();

  let (outcome, played) = s.play(m.match_id, hand_id, 1).await.unwrap();
  assert_eq!(outcome, PlayOutcome::Correct);
  assert_eq!(played.timeline.len(), 2);

  let fetched = s.get_match(m.match_id).await.unwrap().unwrap();
  assert_eq!(fetched, played);
  assert_eq!(fetched.remaining_life, STARTING_LIFE);
  assert_eq!(fetched.player_hand.len(), 1);
  assert!(fetched.deck.is_empty());
}

#[tokio::test]
async fn incorrect_play_is_persisted() {
  let s = store().await;
  let d = deal(&s, 1950, &[1960]).await;
  let hand_id = d.starting_hand.occurrence_id;
  let m = s.create_match(d).await.unwrap();

  let (outcome, _) = s.play(m.match_id, hand_id, 0).await.unwrap();
  assert_eq!(outcome, PlayOutcome::Incorrect);

  let fetched = s.get_match(m.match_id).await.unwrap().unwrap();
  assert_eq!(fetched.remaining_life, STARTING_LIFE - 1);
  assert_eq!(fetched.mistakes.len(), 1);
  assert_eq!(fetched.mistakes[0].occurrence_id, hand_id);
  assert_eq!(fetched.timeline.len(), 1);
}

#[tokio::test]
async fn winning_play_is_persisted() {
  let s = store().await;
  let d = deal(&s, 1950, &[]).await;
  let hand_id = d.starting_hand.occurrence_id;
  let m = s.create_match(d).await.unwrap();

  let (_, played) = s.play(m.match_id, hand_id, 1).await.unwrap();
  assert_eq!(played.status, MatchStatus::Win);

  let fetched = s.get_match(m.match_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, MatchStatus::Win);
}

#[tokio::test]
async fn rejected_plays_leave_the_match_untouched() {
  let s = store().await;
  let d = deal(&s, 1950, &[1960]).await;
  let hand_id = d.starting_hand.occurrence_id;
  let deck_id = d.deck[0].occurrence_id;
  let m = s.create_match(d).await.unwrap();

  let err = core(s.play(m.match_id, deck_id, 0).await.unwrap_err());
  assert!(matches!(err, CoreError::NotInHand(id) if id == deck_id));

  let err = core(s.play(m.match_id, hand_id, 2).await.unwrap_err());
  assert!(matches!(err, CoreError::InvalidPosition { position: 2, .. }));

  let err = core(s.play(m.match_id, hand_id, -1).await.unwrap_err());
  assert_eq!(err.kind(), ErrorKind::Validation);

  let fetched = s.get_match(m.match_id).await.unwrap().unwrap();
  assert_eq!(fetched, m);
}

#[tokio::test]
async fn finished_match_rejects_plays() {
  let s = store().await;
  // Every card predates the timeline, so playing after it always misses.
  let d = deal(&s, 1000, &[1001, 1002, 1003]).await;
  let m = s.create_match(d).await.unwrap();

  let mut current = m;
  while !current.status.is_finished() {
    let id = current.player_hand[0].occurrence_id;
    let (outcome, next) = s.play(current.match_id, id, 1).await.unwrap();
    assert_eq!(outcome, PlayOutcome::Incorrect);
    current = next;
  }
  assert_eq!(current.status, MatchStatus::Lose);
  assert_eq!(current.remaining_life, 0);
  assert_eq!(current.card_count(), 5);

  let id = current.player_hand[0].occurrence_id;
  let err = core(s.play(current.match_id, id, 0).await.unwrap_err());
  assert!(matches!(err, CoreError::MatchFinished(MatchStatus::Lose)));

  let fetched = s.get_match(current.match_id).await.unwrap().unwrap();
  assert_eq!(fetched, current);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
  let s = store().await;
  let d = deal(&s, 1950, &[1960]).await;
  let hand_id = d.starting_hand.occurrence_id;
  let m = s.create_match(d).await.unwrap();

  let err = core(s.play(m.match_id + 1, hand_id, 0).await.unwrap_err());
  assert!(matches!(err, CoreError::MatchNotFound(_)));

  let err = core(s.play(m.match_id, 9_999, 0).await.unwrap_err());
  assert!(matches!(err, CoreError::OccurrenceNotFound(9_999)));
}

#[tokio::test]
async fn timeline_is_resorted_after_a_year_change() {
  let s = store().await;
  let d = deal(&s, 1950, &[1960]).await;
  let hand_id = d.starting_hand.occurrence_id;
  let timeline_id = d.starting_timeline.occurrence_id;
  let m = s.create_match(d).await.unwrap();
  s.play(m.match_id, hand_id, 1).await.unwrap();

  // Move the first timeline card after the second.
  s.set_occurrence_year(timeline_id, 2000).await.unwrap();

  let fetched = s.get_match(m.match_id).await.unwrap().unwrap();
  let order: Vec<i64> = fetched
    .timeline
    .cards()
    .iter()
    .map(|c| c.occurrence_id)
    .collect();
  assert_eq!(order, vec![hand_id, timeline_id]);
}
