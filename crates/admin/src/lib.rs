//! Shopdesk Admin library.
//!
//! This crate provides the admin panel as a library, allowing it to be
//! tested and reused. The panel is a server-rendered CRUD frontend over
//! the Shopdesk REST backend: users, items, and orders, plus order
//! composition with a computed total.
//!
//! The panel holds no data of its own. Everything it shows is fetched from
//! the backend on each request; the only local state is the operator's
//! session (order draft and flash messages).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod resource;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use middleware::{SESSION_SWEEP_PERIOD, SweepingMemoryStore, create_session_layer};
use state::AppState;

/// Directory static assets are served from, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Build the admin application: routes, static files, sessions, and
/// request tracing.
///
/// Sentry layers are added by the binary so tests run without them. Must be
/// called inside a Tokio runtime: the session sweep is spawned here.
pub fn app(state: AppState) -> Router {
    let sessions = SweepingMemoryStore::default();
    // Detached; the sweep lives as long as the runtime
    drop(sessions.spawn_sweeper(SESSION_SWEEP_PERIOD));
    let session_layer = create_session_layer(sessions, state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
