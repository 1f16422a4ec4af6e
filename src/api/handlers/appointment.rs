//! Appointment handlers: list, get, create, update, patch, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{BarberQuery, DataResponse, DeletedResponse};
use crate::app_state::AppState;
use crate::domain::{Appointment, AppointmentForm, AppointmentId, AppointmentPatch, BarberFilter};
use crate::error::{ApiError, ErrorResponse};

/// `GET /appointments`: List appointments, optionally for one barber.
///
/// # Errors
///
/// Returns [`ApiError::Unavailable`] if no data source can answer.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    tag = "Appointments",
    summary = "List appointments",
    description = "Returns appointments ordered by date then start time. `barber` scopes the list to one barber; absent or `all` merges every barber.",
    params(BarberQuery),
    responses(
        (status = 200, description = "Appointment list", body = serde_json::Value),
        (status = 503, description = "No data source available", body = ErrorResponse),
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<BarberQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let listed = state.store.list_appointments(&query.filter()).await?;
    Ok(Json(DataResponse::from(listed)))
}

/// `GET /appointments/{id}`: Get one appointment.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Get appointment",
    params(
        ("id" = i64, Path, description = "Appointment id"),
    ),
    responses(
        (status = 200, description = "Appointment", body = serde_json::Value),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let id = AppointmentId::new(id);
    let listed = state.store.list_appointments(&BarberFilter::All).await?;
    let found = listed.map(|all| all.into_iter().find(|a| a.id == id));
    match found.value {
        Some(appointment) => Ok(Json(DataResponse {
            data: appointment,
            source: found.source,
        })),
        None => Err(ApiError::not_found("appointment", id)),
    }
}

/// `POST /appointments`: Book an appointment.
///
/// The barber comes from the form, or from `?barber=` when the caller's
/// view is scoped to one barber.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for an incomplete or malformed form,
/// before anything is written.
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "Appointments",
    summary = "Create appointment",
    description = "Validates the booking form and stores the appointment. Client name, date, start and end time are required, and a barber must be chosen unless `barber` scopes the request.",
    params(BarberQuery),
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Appointment created", body = serde_json::Value),
        (status = 400, description = "Form incomplete or malformed", body = ErrorResponse),
        (status = 422, description = "Rejected by the data source", body = ErrorResponse),
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Query(query): Query<BarberQuery>,
    Json(form): Json<AppointmentForm>,
) -> Result<impl IntoResponse, ApiError> {
    let new = form.validate_new(&query.filter())?;
    let created = state.store.create_appointment(&new).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::from(created))))
}

/// `PUT /appointments/{id}`: Edit an appointment from the full form.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a bad form or
/// [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Update appointment",
    params(
        ("id" = i64, Path, description = "Appointment id"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Appointment updated", body = serde_json::Value),
        (status = 400, description = "Form incomplete or malformed", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<AppointmentForm>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = form.validate_edit()?;
    apply_patch(&state, AppointmentId::new(id), &patch).await
}

/// `PATCH /appointments/{id}`: Change some fields, typically the status.
///
/// `"status": null` clears the status; omitting it leaves it alone.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] for an empty patch,
/// [`ApiError::Validation`] if the merged slot ends before it starts, or
/// [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    patch,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Patch appointment",
    params(
        ("id" = i64, Path, description = "Appointment id"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Appointment updated", body = serde_json::Value),
        (status = 400, description = "Empty patch or end before start", body = ErrorResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
    )
)]
pub async fn patch_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<impl IntoResponse, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::InvalidRequest("patch changes nothing".to_string()));
    }
    apply_patch(&state, AppointmentId::new(id), &patch).await
}

async fn apply_patch(
    state: &AppState,
    id: AppointmentId,
    patch: &AppointmentPatch,
) -> Result<Json<DataResponse<Appointment>>, ApiError> {
    if patch.touches_slot() {
        let current = state
            .store
            .get_appointment(id)
            .await?
            .value
            .ok_or_else(|| ApiError::not_found("appointment", id))?;
        patch.check_against(&current)?;
    }
    let updated = state.store.update_appointment(id, patch).await?;
    match updated.value {
        Some(appointment) => {
            tracing::info!(
                %id,
                barber = %appointment.barber_id,
                source = ?updated.source,
                "appointment updated"
            );
            Ok(Json(DataResponse {
                data: appointment,
                source: updated.source,
            }))
        }
        None => Err(ApiError::not_found("appointment", id)),
    }
}

/// `DELETE /appointments/{id}`: Remove an appointment.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    tag = "Appointments",
    summary = "Delete appointment",
    params(
        ("id" = i64, Path, description = "Appointment id"),
    ),
    responses(
        (status = 200, description = "Appointment deleted", body = DeletedResponse),
        (status = 404, description = "Appointment not found", body = ErrorResponse),
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let id = AppointmentId::new(id);
    let deleted = state.store.delete_appointment(id).await?;
    if !deleted.value {
        return Err(ApiError::not_found("appointment", id));
    }
    tracing::info!(%id, source = ?deleted.source, "appointment deleted");
    Ok(Json(DeletedResponse {
        id: id.to_string(),
        deleted: true,
        source: deleted.source,
    }))
}

/// Appointment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .patch(patch_appointment)
                .delete(delete_appointment),
        )
}
