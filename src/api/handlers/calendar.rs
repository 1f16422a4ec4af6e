//! Calendar views: the month grid and today's schedule.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Datelike;

use crate::api::dto::{BarberQuery, CalendarQuery, CalendarResponse, TodayScheduleResponse};
use crate::app_state::AppState;
use crate::domain::{GridOptions, YearMonth, build_month_grid, derive_today_schedule};
use crate::error::{ApiError, ErrorResponse};
use crate::service::fetch_entries;

/// `GET /calendar`: Month grid for one barber or all.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] for a month outside 1–12.
#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    tag = "Calendar",
    summary = "Month grid",
    description = "Lays out the month as weekday-aligned cells. Each day lists its appointments with non-completed first, then by start time. The desktop layout pads the first row with blank cells; the mobile layout lists days only.",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Month grid", body = serde_json::Value),
        (status = 400, description = "Invalid month", body = ErrorResponse),
    )
)]
pub async fn month_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let today = state.clock.today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let month = YearMonth::new(year, month)
        .ok_or_else(|| ApiError::InvalidRequest(format!("invalid month: {year}-{month}")))?;

    let barber = query.barber.clone().unwrap_or_default();
    let options = GridOptions {
        layout: query.layout.unwrap_or_default(),
        week_start: query.week_start.unwrap_or_default(),
    };
    let entries = fetch_entries(&state.store, &barber).await?;

    Ok(Json(CalendarResponse {
        month,
        barber,
        layout: options.layout,
        grid: build_month_grid(month, &entries.value, options),
        source: entries.source,
    }))
}

/// `GET /schedule/today`: Today's appointments by start time.
///
/// # Errors
///
/// Returns [`ApiError::Unavailable`] if no data source can answer.
#[utoipa::path(
    get,
    path = "/api/v1/schedule/today",
    tag = "Calendar",
    summary = "Today's schedule",
    params(BarberQuery),
    responses(
        (status = 200, description = "Today's appointments", body = serde_json::Value),
        (status = 503, description = "No data source available", body = ErrorResponse),
    )
)]
pub async fn today_schedule(
    State(state): State<AppState>,
    Query(query): Query<BarberQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let barber = query.filter();
    let entries = fetch_entries(&state.store, &barber).await?;
    let date = state.clock.today();
    Ok(Json(TodayScheduleResponse {
        date,
        barber,
        appointments: derive_today_schedule(&entries.value, date),
        source: entries.source,
    }))
}

/// Calendar routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(month_calendar))
        .route("/schedule/today", get(today_schedule))
}
