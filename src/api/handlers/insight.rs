//! Read-only summaries: dashboard metrics and period reports.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{DataResponse, ReportQuery};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};
use crate::service::{dashboard, reports};

/// `GET /dashboard`: Today, this week and this month at a glance.
///
/// # Errors
///
/// Returns [`ApiError::Unavailable`] if no data source can answer.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Insights",
    summary = "Dashboard metrics",
    description = "Appointments today and this week (Monday to Sunday), completed revenue and distinct clients this month, the next five upcoming appointments, and each barber's progress today.",
    responses(
        (status = 200, description = "Dashboard metrics", body = serde_json::Value),
        (status = 503, description = "No data source available", body = ErrorResponse),
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let metrics = dashboard::load(&state.store, state.clock.as_ref()).await?;
    Ok(Json(DataResponse::from(metrics)))
}

/// `GET /reports`: Bookings, revenue, status mix and busy hours.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] for an unknown period.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "Insights",
    summary = "Period report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Report", body = serde_json::Value),
        (status = 400, description = "Unknown period", body = ErrorResponse),
    )
)]
pub async fn report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.period().map_err(ApiError::InvalidRequest)?;
    let barber = query.barber.clone().unwrap_or_default();
    let report = reports::load(&state.store, state.clock.as_ref(), period, &barber).await?;
    Ok(Json(DataResponse::from(report)))
}

/// Insight routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/reports", get(report))
}
