//! Handlers for `/terms` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/terms/` | Optional `?skip`, `?limit`, `?search` |
//! | `POST`   | `/terms/` | Body: `{"term", "definition", "source"?}`; returns 201 |
//! | `GET`    | `/terms/:id` | 404 if not found |
//! | `PUT`    | `/terms/:id` | Partial body; absent fields are left alone |
//! | `DELETE` | `/terms/:id` | Returns a confirmation message |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use glossary_core::{
  store::{DEFAULT_LIMIT, TermQuery, TermStore},
  term::{NewTerm, Term, TermPatch},
};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::error::{ApiError, store_error};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:   u64,
  #[serde(default = "default_limit")]
  pub limit:  u64,
  pub search: Option<String>,
}

fn default_limit() -> u64 { DEFAULT_LIMIT }

impl From<ListParams> for TermQuery {
  fn from(p: ListParams) -> Self {
    TermQuery { skip: p.skip, limit: p.limit, search: p.search }
  }
}

/// `GET /terms/[?skip=<n>][&limit=<n>][&search=<text>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Term>>, ApiError>
where
  S: TermStore,
{
  let Query(params) = params?;
  let query = TermQuery::from(params);
  let terms = store.list_terms(&query).await.map_err(store_error)?;
  Ok(Json(terms))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /terms/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Term>, ApiError>
where
  S: TermStore,
{
  let Path(id) = id?;
  let term = store
    .get_term(id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("term {id} not found")))?;
  Ok(Json(term))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /terms/` — returns 201 + the stored [`Term`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewTerm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TermStore,
{
  let Json(body) = body?;
  let term = store.create_term(body).await.map_err(store_error)?;
  tracing::info!(id = term.id, term = %term.term, "term created");
  Ok((StatusCode::CREATED, Json(term)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /terms/:id`.
///
/// Each field distinguishes "absent" (`None`) from "explicitly null"
/// (`Some(None)`).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  #[serde(default, deserialize_with = "present")]
  pub term:       Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub definition: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub source:     Option<Option<String>>,
}

/// Only called for keys that appear in the body, so wrapping in `Some`
/// marks the field as present even when its value is `null`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

impl TryFrom<UpdateBody> for TermPatch {
  type Error = ApiError;

  fn try_from(b: UpdateBody) -> Result<Self, Self::Error> {
    fn required(
      field: &str,
      value: Option<Option<String>>,
    ) -> Result<Option<String>, ApiError> {
      match value {
        Some(None) => Err(ApiError::Validation(format!("{field} must not be null"))),
        Some(Some(v)) => Ok(Some(v)),
        None => Ok(None),
      }
    }

    Ok(TermPatch {
      term:       required("term", b.term)?,
      definition: required("definition", b.definition)?,
      source:     b.source,
    })
  }
}

/// `PUT /terms/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Term>, ApiError>
where
  S: TermStore,
{
  let Path(id) = id?;
  let Json(body) = body?;
  let patch = TermPatch::try_from(body)?;
  let term = store.update_term(id, patch).await.map_err(store_error)?;
  tracing::info!(id, "term updated");
  Ok(Json(term))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /terms/:id` — body: `{"message": "term deleted"}`.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: TermStore,
{
  let Path(id) = id?;
  store.delete_term(id).await.map_err(store_error)?;
  tracing::info!(id, "term deleted");
  Ok(Json(json!({ "message": "term deleted" })))
}
