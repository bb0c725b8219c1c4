//! The `TermStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `glossary-store-sqlite`). Higher layers (`glossary-api`,
//! `glossary-server`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::term::{NewTerm, Term, TermPatch};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Default page size for [`TermStore::list_terms`].
pub const DEFAULT_LIMIT: u64 = 100;

/// Parameters for [`TermStore::list_terms`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQuery {
  /// Number of matching terms to skip.
  pub skip:   u64,
  /// Maximum number of terms to return.
  pub limit:  u64,
  /// Case-insensitive substring filter on the `term` field. An empty string
  /// filters nothing.
  pub search: Option<String>,
}

impl Default for TermQuery {
  fn default() -> Self { Self { skip: 0, limit: DEFAULT_LIMIT, search: None } }
}

impl TermQuery {
  /// The search text, if it would actually filter anything.
  pub fn search_text(&self) -> Option<&str> {
    self.search.as_deref().filter(|s| !s.is_empty())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a glossary store backend.
///
/// Each method is a single unit of work: implementations must either apply
/// it completely or not at all.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TermStore: Send + Sync {
  /// Backend error. Converting it into [`crate::Error`] lets callers tell
  /// missing terms and duplicates apart from storage failures.
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Terms matching `query`, in ascending `id` order.
  fn list_terms<'a>(
    &'a self,
    query: &'a TermQuery,
  ) -> impl Future<Output = Result<Vec<Term>, Self::Error>> + Send + 'a;

  /// Retrieve a term by id. Returns `None` if not found.
  fn get_term(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Term>, Self::Error>> + Send + '_;

  /// Persist a new term and return it with its generated fields.
  ///
  /// Fails with [`crate::Error::DuplicateTerm`] if a term with the exact
  /// same `term` text already exists.
  fn create_term(
    &self,
    input: NewTerm,
  ) -> impl Future<Output = Result<Term, Self::Error>> + Send + '_;

  /// Merge `patch` into the term with `id` and stamp `updated_at`, even when
  /// the patch is empty.
  ///
  /// Fails with [`crate::Error::TermNotFound`] if `id` does not exist, and
  /// with [`crate::Error::DuplicateTerm`] if the patch renames the term to
  /// text owned by another term.
  fn update_term(
    &self,
    id: i64,
    patch: TermPatch,
  ) -> impl Future<Output = Result<Term, Self::Error>> + Send + '_;

  /// Permanently remove a term. Fails with [`crate::Error::TermNotFound`]
  /// if `id` does not exist.
  fn delete_term(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Cheap round trip to the backend, used for health checks.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
