//! JSON REST API for the glossary.
//!
//! Exposes an axum [`Router`] backed by any [`glossary_core::store::TermStore`].
//! Transport concerns (listening, tracing layers) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(glossary_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod terms;

use std::sync::Arc;

use axum::{Router, routing::get};
use glossary_core::store::TermStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The collection is served with and without a trailing slash. The returned
/// `Router<()>` can be merged into any parent router regardless of its own
/// state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TermStore + 'static,
{
  Router::new()
    .route("/terms", get(terms::list::<S>).post(terms::create::<S>))
    .route("/terms/", get(terms::list::<S>).post(terms::create::<S>))
    .route(
      "/terms/{id}",
      get(terms::get_one::<S>)
        .put(terms::update::<S>)
        .delete(terms::delete::<S>),
    )
    .with_state(store)
}
