//! [`SqliteStore`] — the SQLite implementation of [`TermStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior, functions::FunctionFlags};

use glossary_core::{
  store::{TermQuery, TermStore},
  term::{NewTerm, Term, TermPatch},
};

use crate::{
  Error, Result,
  encode::{RawTerm, TERM_COLUMNS, encode_dt},
  schema::SCHEMA,
};

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A glossary store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    tracing::debug!(path = %path.as_ref().display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
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
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // SQLite's own lower() and LIKE only fold ASCII.
        conn.create_scalar_function(
          "fold_case",
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|t| t.to_lowercase()))
          },
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema ready");
    Ok(())
  }
}

/// Map a failed write, turning a UNIQUE violation on `term` into a
/// duplicate-term error.
///
/// Write transactions are IMMEDIATE, so a writer on another connection to the
/// same file blocks (up to [`BUSY_TIMEOUT`]) until the first one commits and
/// then sees its row in the existence check. This only fires if a row slips
/// past that check anyway.
fn write_error(err: tokio_rusqlite::Error, term: Option<&str>) -> Error {
  let unique_violation = matches!(
    &err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _))
      if failure.code == rusqlite::ErrorCode::ConstraintViolation
  );
  match term {
    Some(term) if unique_violation => {
      glossary_core::Error::DuplicateTerm(term.to_owned()).into()
    }
    _ => Error::Database(err),
  }
}

// ─── TermStore impl ──────────────────────────────────────────────────────────

impl TermStore for SqliteStore {
  type Error = Error;

  async fn list_terms(&self, query: &TermQuery) -> Result<Vec<Term>> {
    let search = query.search_text().map(str::to_owned);
    let limit  = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let skip   = i64::try_from(query.skip).unwrap_or(i64::MAX);

    let raws: Vec<RawTerm> = self
      .conn
      .call(move |conn| {
        // instr() rather than LIKE so `%` and `_` in the search text match
        // themselves.
        let mut stmt = conn.prepare(&format!(
          "SELECT {TERM_COLUMNS} FROM terms
           WHERE ?1 IS NULL OR instr(fold_case(term), fold_case(?1)) > 0
           ORDER BY id
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![search, limit, skip], RawTerm::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTerm::into_term).collect()
  }

  async fn get_term(&self, id: i64) -> Result<Option<Term>> {
    let raw: Option<RawTerm> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {TERM_COLUMNS} FROM terms WHERE id = ?1"),
              rusqlite::params![id],
              RawTerm::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTerm::into_term).transpose()
  }

  async fn create_term(&self, input: NewTerm) -> Result<Term> {
    let NewTerm { term, definition, source } = input;
    let wanted     = term.clone();
    let created_at = encode_dt(Utc::now());

    let raw: Option<RawTerm> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let taken = tx
          .query_row(
            "SELECT 1 FROM terms WHERE term = ?1",
            rusqlite::params![term],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        let raw = tx.query_row(
          &format!(
            "INSERT INTO terms (term, definition, source, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {TERM_COLUMNS}"
          ),
          rusqlite::params![term, definition, source, created_at],
          RawTerm::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await
      .map_err(|e| write_error(e, Some(&wanted)))?;

    match raw {
      Some(raw) => raw.into_term(),
      None => Err(glossary_core::Error::DuplicateTerm(wanted).into()),
    }
  }

  async fn update_term(&self, id: i64, patch: TermPatch) -> Result<Term> {
    let now    = Utc::now();
    let wanted = patch.term.clone();

    let outcome = self
      .conn
      .call(move |conn| -> tokio_rusqlite::Result<Result<Term>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
          .query_row(
            &format!("SELECT {TERM_COLUMNS} FROM terms WHERE id = ?1"),
            rusqlite::params![id],
            RawTerm::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(Err(glossary_core::Error::TermNotFound(id).into()));
        };
        let mut term = match raw.into_term() {
          Ok(term) => term,
          Err(e) => return Ok(Err(e)),
        };

        term.apply(patch);

        let taken = tx
          .query_row(
            "SELECT 1 FROM terms WHERE term = ?1 AND id != ?2",
            rusqlite::params![term.term, id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(Err(glossary_core::Error::DuplicateTerm(term.term).into()));
        }

        // Never let a backwards clock step put `updated_at` before creation.
        let updated_at = now.max(term.created_at);
        term.updated_at = Some(updated_at);

        tx.execute(
          "UPDATE terms
           SET term = ?1, definition = ?2, source = ?3, updated_at = ?4
           WHERE id = ?5",
          rusqlite::params![
            term.term,
            term.definition,
            term.source,
            encode_dt(updated_at),
            id,
          ],
        )?;
        tx.commit()?;
        Ok(Ok(term))
      })
      .await
      .map_err(|e| write_error(e, wanted.as_deref()))?;

    outcome
  }

  async fn delete_term(&self, id: i64) -> Result<()> {
    let removed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM terms WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if removed == 0 {
      return Err(glossary_core::Error::TermNotFound(id).into());
    }
    Ok(())
  }

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
