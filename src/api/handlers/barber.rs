//! Barber roster handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{DataResponse, DeletedResponse};
use crate::app_state::AppState;
use crate::domain::{Barber, BarberId, BarberPatch};
use crate::error::{ApiError, ErrorResponse};

/// `GET /barbers`: The roster, by name.
///
/// # Errors
///
/// Returns [`ApiError::Unavailable`] if no data source can answer.
#[utoipa::path(
    get,
    path = "/api/v1/barbers",
    tag = "Barbers",
    summary = "List barbers",
    responses(
        (status = 200, description = "Barber roster", body = serde_json::Value),
    )
)]
pub async fn list_barbers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::from(state.store.list_barbers().await?)))
}

/// `GET /barbers/{id}`: One barber.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/barbers/{id}",
    tag = "Barbers",
    summary = "Get barber",
    params(
        ("id" = String, Path, description = "Barber slug"),
    ),
    responses(
        (status = 200, description = "Barber", body = serde_json::Value),
        (status = 404, description = "Barber not found", body = ErrorResponse),
    )
)]
pub async fn get_barber(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = BarberId::new(&id);
    let found = state.store.get_barber(&id).await?;
    found
        .value
        .map(|barber| {
            Json(DataResponse {
                data: barber,
                source: found.source,
            })
        })
        .ok_or_else(|| ApiError::not_found("barber", &id))
}

/// `POST /barbers`: Add a barber.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] for a blank id or name and
/// [`ApiError::Rejected`] for a duplicate id.
#[utoipa::path(
    post,
    path = "/api/v1/barbers",
    tag = "Barbers",
    summary = "Create barber",
    description = "Adds a barber. The id is a slug (e.g. `renne`) and must be unique. Commission is clamped to 0–100.",
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "Barber created", body = serde_json::Value),
        (status = 400, description = "Missing id or name", body = ErrorResponse),
        (status = 422, description = "Duplicate id", body = ErrorResponse),
    )
)]
pub async fn create_barber(
    State(state): State<AppState>,
    Json(mut barber): Json<Barber>,
) -> Result<impl IntoResponse, ApiError> {
    barber.id = BarberId::new(barber.id.as_str());
    barber.name = barber.name.trim().to_string();
    if barber.id.is_empty() {
        return Err(ApiError::InvalidRequest("barber id is required".to_string()));
    }
    if barber.name.is_empty() {
        return Err(ApiError::InvalidRequest("barber name is required".to_string()));
    }
    barber.commission_percent = barber.commission_percent.min(100);

    let created = state.store.create_barber(&barber).await?;
    tracing::info!(id = %created.value.id, source = ?created.source, "barber created");
    Ok((StatusCode::CREATED, Json(DataResponse::from(created))))
}

/// `PUT /barbers/{id}`: Update profile fields.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    put,
    path = "/api/v1/barbers/{id}",
    tag = "Barbers",
    summary = "Update barber",
    params(
        ("id" = String, Path, description = "Barber slug"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Barber updated", body = serde_json::Value),
        (status = 404, description = "Barber not found", body = ErrorResponse),
    )
)]
pub async fn update_barber(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BarberPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let id = BarberId::new(&id);
    let updated = state.store.update_barber(&id, &patch).await?;
    let Some(barber) = updated.value else {
        return Err(ApiError::not_found("barber", &id));
    };
    tracing::info!(%id, source = ?updated.source, "barber updated");
    Ok(Json(DataResponse {
        data: barber,
        source: updated.source,
    }))
}

/// `POST /barbers/{id}/toggle-status`: Flip active/inactive.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/barbers/{id}/toggle-status",
    tag = "Barbers",
    summary = "Toggle barber status",
    params(
        ("id" = String, Path, description = "Barber slug"),
    ),
    responses(
        (status = 200, description = "Barber with the new status", body = serde_json::Value),
        (status = 404, description = "Barber not found", body = ErrorResponse),
    )
)]
pub async fn toggle_barber_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = BarberId::new(&id);
    let toggled = state.store.toggle_barber_status(&id).await?;
    let Some(barber) = toggled.value else {
        return Err(ApiError::not_found("barber", &id));
    };
    tracing::info!(%id, status = barber.status.as_str(), "barber status toggled");
    Ok(Json(DataResponse {
        data: barber,
        source: toggled.source,
    }))
}

/// `DELETE /barbers/{id}`: Remove a barber. Their appointments remain.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/barbers/{id}",
    tag = "Barbers",
    summary = "Delete barber",
    params(
        ("id" = String, Path, description = "Barber slug"),
    ),
    responses(
        (status = 200, description = "Barber deleted", body = DeletedResponse),
        (status = 404, description = "Barber not found", body = ErrorResponse),
    )
)]
pub async fn delete_barber(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = BarberId::new(&id);
    let deleted = state.store.delete_barber(&id).await?;
    if !deleted.value {
        return Err(ApiError::not_found("barber", &id));
    }
    tracing::info!(%id, source = ?deleted.source, "barber deleted");
    Ok(Json(DeletedResponse {
        id: id.to_string(),
        deleted: true,
        source: deleted.source,
    }))
}

/// Barber routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/barbers", get(list_barbers).post(create_barber))
        .route(
            "/barbers/{id}",
            get(get_barber).put(update_barber).delete(delete_barber),
        )
        .route("/barbers/{id}/toggle-status", post(toggle_barber_status))
}
