//! HTTP service wiring for the glossary.
//!
//! Combines the `/terms` API from [`glossary_api`] with the service-level
//! routes (`/` and `/api/health`), request tracing, and the configuration
//! the binary reads at startup.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, extract::State, routing::get};
use glossary_api::{ApiError, error::store_error};
use glossary_core::store::TermStore;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Environment variables with this prefix override file settings,
/// e.g. `GLOSSARY_PORT=9000`.
pub const ENV_PREFIX: &str = "GLOSSARY";

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path`, and `GLOSSARY_*`
  /// environment variables, in increasing priority.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?
      .set_default("store_path", "glossary.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand `~` or a leading `~/` to the user's home directory. `~user` forms
/// are left alone.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  let rest = if s == "~" { Some("") } else { s.strip_prefix("~/") };
  if let Some(rest) = rest
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router around `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: TermStore + 'static,
{
  Router::new()
    .route("/", get(service_info))
    .route("/api/health", get(health::<S>))
    .with_state(store.clone())
    .merge(glossary_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Service routes ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
  pub name:        &'static str,
  pub description: &'static str,
  pub version:     &'static str,
}

/// `GET /`
async fn service_info() -> Json<ServiceInfo> {
  Json(ServiceInfo {
    name:        "Glossary of terms",
    description: "API for managing a glossary of terms",
    version:     env!("CARGO_PKG_VERSION"),
  })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status:  &'static str,
  pub message: &'static str,
}

/// `GET /api/health` — healthy only if the store answers.
async fn health<S>(State(store): State<Arc<S>>) -> Result<Json<HealthResponse>, ApiError>
where
  S: TermStore,
{
  store.ping().await.map_err(store_error)?;
  Ok(Json(HealthResponse { status: "healthy", message: "API is working normally" }))
}
