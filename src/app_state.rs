//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{Clock, SystemClock};
use crate::store::RecordStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Record store with fallback routing.
    pub store: Arc<RecordStore>,
    /// Source of "today" for schedules, dashboards and reports.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State over `store` using the system clock.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// State over `store` with an injected clock.
    #[must_use]
    pub fn with_clock(store: RecordStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(store),
            clock,
        }
    }
}
