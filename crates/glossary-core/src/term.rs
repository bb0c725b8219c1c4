//! Term — the single entity of the glossary.
//!
//! A term is a word or phrase, its definition, and an optional citation.
//! Terms are mutable: partial updates are expressed as a [`TermPatch`] and
//! merged field by field with [`Term::apply`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Term ────────────────────────────────────────────────────────────────────

/// A glossary entry as persisted by a [`TermStore`](crate::store::TermStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
  /// Store-assigned identifier; never reused after deletion.
  pub id:         i64,
  /// Unique across the store (case-sensitive).
  pub term:       String,
  pub definition: String,
  /// Where the definition was taken from, if anywhere.
  pub source:     Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
  /// `None` until the first update.
  pub updated_at: Option<DateTime<Utc>>,
}

impl Term {
  /// Merge `patch` into `self`. Only fields present in the patch change.
  ///
  /// Timestamps are left alone; stamping `updated_at` is the store's job.
  pub fn apply(&mut self, patch: TermPatch) {
    if let Some(term) = patch.term {
      self.term = term;
    }
    if let Some(definition) = patch.definition {
      self.definition = definition;
    }
    if let Some(source) = patch.source {
      self.source = source;
    }
  }
}

// ─── NewTerm ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::TermStore::create_term`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTerm {
  pub term:       String,
  pub definition: String,
  #[serde(default)]
  pub source:     Option<String>,
}

impl NewTerm {
  /// Convenience constructor with no source.
  pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
    Self { term: term.into(), definition: definition.into(), source: None }
  }

  pub fn with_source(mut self, source: impl Into<String>) -> Self {
    self.source = Some(source.into());
    self
  }
}

// ─── TermPatch ───────────────────────────────────────────────────────────────

/// A partial update. `None` means "leave as is".
///
/// `source` is doubly optional: `Some(None)` clears the citation, while
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermPatch {
  pub term:       Option<String>,
  pub definition: Option<String>,
  pub source:     Option<Option<String>>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn sample() -> Term {
    Term {
      id:         7,
      term:       "API".into(),
      definition: "Application Programming Interface".into(),
      source:     Some("RFC".into()),
      created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
      updated_at: None,
    }
  }

  #[test]
  fn empty_patch_changes_nothing() {
    let mut term = sample();
    term.apply(TermPatch::default());
    assert_eq!(term, sample());
  }

  #[test]
  fn patch_replaces_only_present_fields() {
    let mut term = sample();
    term.apply(TermPatch {
      definition: Some("A contract between programs".into()),
      ..Default::default()
    });

    assert_eq!(term.term, "API");
    assert_eq!(term.definition, "A contract between programs");
    assert_eq!(term.source.as_deref(), Some("RFC"));
  }

  #[test]
  fn explicit_null_source_clears_it() {
    let mut term = sample();
    term.apply(TermPatch { source: Some(None), ..Default::default() });
    assert_eq!(term.source, None);
  }

  #[test]
  fn apply_leaves_timestamps_alone() {
    let mut term = sample();
    term.apply(TermPatch { term: Some("REST API".into()), ..Default::default() });
    assert_eq!(term.id, 7);
    assert_eq!(term.created_at, sample().created_at);
    assert_eq!(term.updated_at, None);
  }

  #[test]
  fn term_serialises_null_updated_at() {
    let json = serde_json::to_value(sample()).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["term"], "API");
    assert!(json["updated_at"].is_null());
    assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
  }

  #[test]
  fn new_term_source_defaults_to_none() {
    let parsed: NewTerm =
      serde_json::from_str(r#"{"term":"TCP","definition":"Transmission Control Protocol"}"#)
        .unwrap();
    assert_eq!(parsed, NewTerm::new("TCP", "Transmission Control Protocol"));
  }
}
