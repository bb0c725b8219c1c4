//! Integration tests for `SqliteStore` against an in-memory database.

use glossary_core::{
  store::{TermQuery, TermStore},
  term::{NewTerm, TermPatch},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn api() -> NewTerm {
  NewTerm::new("API", "Application Programming Interface")
}

fn is_not_found(err: &Error, wanted: i64) -> bool {
  matches!(err, Error::Core(glossary_core::Error::TermNotFound(id)) if *id == wanted)
}

fn is_duplicate(err: &Error, wanted: &str) -> bool {
  matches!(err, Error::Core(glossary_core::Error::DuplicateTerm(t)) if t == wanted)
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_term() {
  let s = store().await;

  let created = s.create_term(api()).await.unwrap();
  assert_eq!(created.id, 1);
  assert_eq!(created.term, "API");
  assert_eq!(created.definition, "Application Programming Interface");
  assert_eq!(created.source, None);
  assert!(created.updated_at.is_none());

  let fetched = s.get_term(created.id).await.unwrap();
  assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn create_keeps_source() {
  let s = store().await;
  let created = s
    .create_term(NewTerm::new("TCP", "Transmission Control Protocol").with_source("RFC 793"))
    .await
    .unwrap();

  let fetched = s.get_term(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.source.as_deref(), Some("RFC 793"));
}

#[tokio::test]
async fn get_term_missing_returns_none() {
  let s = store().await;
  assert!(s.get_term(42).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_create_conflicts_and_inserts_nothing() {
  let s = store().await;
  s.create_term(api()).await.unwrap();

  let err = s
    .create_term(NewTerm::new("API", "something else"))
    .await
    .unwrap_err();
  assert!(is_duplicate(&err, "API"), "unexpected error: {err}");

  let all = s.list_terms(&TermQuery::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].definition, "Application Programming Interface");
}

#[tokio::test]
async fn uniqueness_is_case_sensitive() {
  let s = store().await;
  s.create_term(api()).await.unwrap();
  let lower = s.create_term(NewTerm::new("api", "lowercase spelling")).await;
  assert!(lower.is_ok());
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
  let s = store().await;
  let first = s.create_term(api()).await.unwrap();
  s.delete_term(first.id).await.unwrap();

  let second = s.create_term(api()).await.unwrap();
  assert!(second.id > first.id);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_applies_only_present_fields() {
  let s = store().await;
  let created = s.create_term(api()).await.unwrap();

  let updated = s
    .update_term(created.id, TermPatch {
      source: Some(Some("RFC".into())),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.source.as_deref(), Some("RFC"));
  assert_eq!(updated.term, created.term);
  assert_eq!(updated.definition, created.definition);
  assert_eq!(updated.created_at, created.created_at);
  let updated_at = updated.updated_at.expect("updated_at set");
  assert!(created.created_at <= updated_at);

  let fetched = s.get_term(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn empty_update_still_stamps_updated_at() {
  let s = store().await;
  let created = s.create_term(api()).await.unwrap();

  let updated = s
    .update_term(created.id, TermPatch::default())
    .await
    .unwrap();

  assert!(updated.updated_at.is_some());
  assert_eq!(updated.term, created.term);
  assert_eq!(updated.definition, created.definition);
  assert_eq!(updated.source, created.source);
}

#[tokio::test]
async fn update_can_clear_source() {
  let s = store().await;
  let created = s
    .create_term(api().with_source("Wikipedia"))
    .await
    .unwrap();

  let updated = s
    .update_term(created.id, TermPatch { source: Some(None), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(updated.source, None);
}

#[tokio::test]
async fn update_missing_term_is_not_found() {
  let s = store().await;
  let err = s
    .update_term(9, TermPatch { term: Some("ghost".into()), ..Default::default() })
    .await
    .unwrap_err();
  assert!(is_not_found(&err, 9), "unexpected error: {err}");
  assert!(s.list_terms(&TermQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_renaming_onto_existing_term_conflicts() {
  let s = store().await;
  s.create_term(api()).await.unwrap();
  let rest = s
    .create_term(NewTerm::new("REST", "Representational State Transfer"))
    .await
    .unwrap();

  let err = s
    .update_term(rest.id, TermPatch { term: Some("API".into()), ..Default::default() })
    .await
    .unwrap_err();
  assert!(is_duplicate(&err, "API"), "unexpected error: {err}");

  let unchanged = s.get_term(rest.id).await.unwrap().unwrap();
  assert_eq!(unchanged, rest);
}

#[tokio::test]
async fn update_keeping_own_term_is_allowed() {
  let s = store().await;
  let created = s.create_term(api()).await.unwrap();
  let updated = s
    .update_term(created.id, TermPatch { term: Some("API".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(updated.term, "API");
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_term_everywhere() {
  let s = store().await;
  let keep = s.create_term(api()).await.unwrap();
  let gone = s
    .create_term(NewTerm::new("Network", "Interconnected nodes"))
    .await
    .unwrap();

  s.delete_term(gone.id).await.unwrap();

  assert!(s.get_term(gone.id).await.unwrap().is_none());
  let ids: Vec<_> = s
    .list_terms(&TermQuery::default())
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.id)
    .collect();
  assert_eq!(ids, vec![keep.id]);
}

#[tokio::test]
async fn delete_missing_term_is_not_found() {
  let s = store().await;
  s.create_term(api()).await.unwrap();

  let err = s.delete_term(100).await.unwrap_err();
  assert!(is_not_found(&err, 100), "unexpected error: {err}");
  assert_eq!(s.list_terms(&TermQuery::default()).await.unwrap().len(), 1);
}

// ─── List / search ───────────────────────────────────────────────────────────

async fn seeded() -> SqliteStore {
  let s = store().await;
  for (term, definition) in [
    ("Network", "Interconnected nodes"),
    ("API", "Application Programming Interface"),
    ("Subnet", "A logical subdivision of an IP network"),
    ("Ethernet", "A family of wired networking technologies"),
    ("Cache", "Fast storage of recently used data"),
  ] {
    s.create_term(NewTerm::new(term, definition)).await.unwrap();
  }
  s
}

#[tokio::test]
async fn list_returns_terms_in_id_order() {
  let s = seeded().await;
  let all = s.list_terms(&TermQuery::default()).await.unwrap();
  let names: Vec<_> = all.iter().map(|t| t.term.as_str()).collect();
  assert_eq!(names, ["Network", "API", "Subnet", "Ethernet", "Cache"]);
}

#[tokio::test]
async fn list_honours_skip_and_limit() {
  let s = seeded().await;
  let page = s
    .list_terms(&TermQuery { skip: 1, limit: 2, search: None })
    .await
    .unwrap();
  let names: Vec<_> = page.iter().map(|t| t.term.as_str()).collect();
  assert_eq!(names, ["API", "Subnet"]);

  let past_end = s
    .list_terms(&TermQuery { skip: 10, limit: 2, search: None })
    .await
    .unwrap();
  assert!(past_end.is_empty());

  let none = s
    .list_terms(&TermQuery { skip: 0, limit: 0, search: None })
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
  let s = seeded().await;
  let hits = s
    .list_terms(&TermQuery { search: Some("net".into()), ..Default::default() })
    .await
    .unwrap();
  let names: Vec<_> = hits.iter().map(|t| t.term.as_str()).collect();
  assert_eq!(names, ["Network", "Subnet", "Ethernet"]);
}

#[tokio::test]
async fn search_matches_only_the_term_field() {
  let s = seeded().await;
  // "storage" only appears in a definition.
  let hits = s
    .list_terms(&TermQuery { search: Some("storage".into()), ..Default::default() })
    .await
    .unwrap();
  assert!(hits.is_empty());
}

#[tokio::test]
async fn search_combines_with_skip_and_limit() {
  let s = seeded().await;
  let hits = s
    .list_terms(&TermQuery { skip: 1, limit: 1, search: Some("NET".into()) })
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].term, "Subnet");
}

#[tokio::test]
async fn empty_search_filters_nothing() {
  let s = seeded().await;
  let hits = s
    .list_terms(&TermQuery { search: Some(String::new()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(hits.len(), 5);
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
  let s = store().await;
  s.create_term(NewTerm::new("Глоссарий", "Словарь терминов")).await.unwrap();
  s.create_term(NewTerm::new("Термин", "Слово или словосочетание")).await.unwrap();

  let hits = s
    .list_terms(&TermQuery { search: Some("глосс".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].term, "Глоссарий");
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  s.create_term(NewTerm::new("100% uptime", "Never down")).await.unwrap();
  s.create_term(NewTerm::new("snake_case", "words_joined_by_underscores")).await.unwrap();
  s.create_term(NewTerm::new("Latency", "Delay")).await.unwrap();

  let percent = s
    .list_terms(&TermQuery { search: Some("%".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(percent.len(), 1);
  assert_eq!(percent[0].term, "100% uptime");

  let underscore = s
    .list_terms(&TermQuery { search: Some("_".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(underscore.len(), 1);
  assert_eq!(underscore[0].term, "snake_case");
}

// ─── Misc ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_succeeds_on_open_store() {
  let s = store().await;
  s.ping().await.unwrap();
}

#[tokio::test]
async fn reopening_file_store_keeps_terms() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("glossary.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create_term(api()).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let fetched = s.get_term(id).await.unwrap().unwrap();
  assert_eq!(fetched.term, "API");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn racing_creates_on_two_connections_conflict_cleanly() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("glossary.db");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  for round in 0..50 {
    let name = format!("term-{round}");
    let (left, right) = tokio::join!(
      a.create_term(NewTerm::new(name.clone(), "left")),
      b.create_term(NewTerm::new(name.clone(), "right")),
    );

    let (winner, loser) = match (left, right) {
      (Ok(t), Err(e)) | (Err(e), Ok(t)) => (t, e),
      (l, r) => panic!("round {round}: expected one winner, got {l:?} / {r:?}"),
    };
    assert_eq!(winner.term, name);
    assert!(is_duplicate(&loser, &name), "round {round}: unexpected error: {loser}");
  }

  assert_eq!(a.list_terms(&TermQuery::default()).await.unwrap().len(), 50);
}

#[tokio::test]
async fn default_query_returns_at_most_one_hundred_terms() {
  let s = store().await;
  for n in 0..105 {
    s.create_term(NewTerm::new(format!("term-{n:03}"), "filler")).await.unwrap();
  }

  let page = s.list_terms(&TermQuery::default()).await.unwrap();
  assert_eq!(page.len(), 100);
  assert_eq!(page.first().unwrap().term, "term-000");
  assert_eq!(page.last().unwrap().term, "term-099");
}
