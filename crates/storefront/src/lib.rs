//! Homestyle storefront API.
//!
//! The router, handlers and storage backends live in this library so the
//! binary, the CLI and the integration tests all build the same app.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{MemoryStore, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;
use crate::db::MemStorage;
use crate::state::AppState;

/// Build the full application router.
///
/// Layers, outermost first: Sentry, tracing, request ID, sessions. When the
/// config names a static directory, unmatched paths are served from it.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let static_dir = state.config().static_dir.clone();
    let rate_limit_auth = state.config().auth_rate_limit;

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes(rate_limit_auth));

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// A self-contained app over the sample catalog and in-process sessions.
#[must_use]
pub fn memory_app(config: StorefrontConfig) -> Router {
    let session_layer = middleware::create_session_layer(MemoryStore::default(), &config);
    let storage = Arc::new(MemStorage::with_sample_data());
    app(AppState::new(config, storage), session_layer)
}

/// Liveness health check endpoint. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.storage().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
