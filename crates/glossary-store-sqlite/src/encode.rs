//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use glossary_core::term::Term;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Column list matching [`RawTerm::from_row`].
pub const TERM_COLUMNS: &str =
  "id, term, definition, source, created_at, updated_at";

/// A `terms` row exactly as SQLite hands it back.
pub struct RawTerm {
  pub id:         i64,
  pub term:       String,
  pub definition: String,
  pub source:     Option<String>,
  pub created_at: String,
  pub updated_at: Option<String>,
}

impl RawTerm {
  /// Read a row selected with [`TERM_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      term:       row.get(1)?,
      definition: row.get(2)?,
      source:     row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_term(self) -> Result<Term> {
    Ok(Term {
      id:         self.id,
      term:       self.term,
      definition: self.definition,
      source:     self.source,
      created_at: decode_dt(&self.created_at)?,
      updated_at: self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
