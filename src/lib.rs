//! # barber-desk
//!
//! Administrative backend for a small barbershop: appointment agenda,
//! month calendar, barber roster, broadcast notices, dashboard and
//! reports, over REST and a WebSocket agenda session.
//!
//! Records live in PostgreSQL. When the database is unreachable (or not
//! configured at all) every read and write is served by a built-in
//! in-memory dataset instead, and each response says so.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── Agenda sessions (ws/)
//!     │
//!     ├── AgendaController, dashboard, reports (service/)
//!     ├── Calendar grid, today schedule, records (domain/)
//!     │
//!     ├── RecordStore (store/)
//!     │     ├── PostgresBackend
//!     │     └── MemoryBackend (fallback dataset)
//!     │
//!     └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
pub mod ws;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the full application: REST routes, the agenda WebSocket, and
/// the HTTP middleware stack.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws/agenda", get(ws::handler::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
