//! REST endpoint handlers organized by resource.

pub mod appointment;
pub mod barber;
pub mod calendar;
pub mod insight;
pub mod notice;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(appointment::routes())
        .merge(calendar::routes())
        .merge(barber::routes())
        .merge(notice::routes())
        .merge(insight::routes())
}
