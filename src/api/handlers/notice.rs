//! Notice broadcast handlers: current notice, history, publish, restore,
//! clear, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{DataResponse, DeletedResponse, PublishNoticeRequest};
use crate::app_state::AppState;
use crate::domain::{NewNotice, Notice, NoticeId};
use crate::error::{ApiError, ErrorResponse};
use crate::store::Sourced;

/// `GET /notices`: Every notice, newest first.
///
/// # Errors
///
/// Returns [`ApiError::Unavailable`] if no data source can answer.
#[utoipa::path(
    get,
    path = "/api/v1/notices",
    tag = "Notices",
    summary = "Notice history",
    responses(
        (status = 200, description = "Notices, newest first", body = serde_json::Value),
    )
)]
pub async fn list_notices(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::from(state.store.list_notices().await?)))
}

/// `GET /notices/active`: The notice currently broadcast, or `null`.
///
/// # Errors
///
/// Returns [`ApiError::Unavailable`] if no data source can answer.
#[utoipa::path(
    get,
    path = "/api/v1/notices/active",
    tag = "Notices",
    summary = "Active notice",
    responses(
        (status = 200, description = "Active notice; `data` is null when none", body = serde_json::Value),
    )
)]
pub async fn active_notice(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(DataResponse::from(state.store.active_notice().await?)))
}

/// `POST /notices`: Publish a notice, archiving the current one.
///
/// # Errors
///
/// Returns [`ApiError::NoticeDraft`] for a blank message.
#[utoipa::path(
    post,
    path = "/api/v1/notices",
    tag = "Notices",
    summary = "Publish notice",
    request_body = PublishNoticeRequest,
    responses(
        (status = 201, description = "Notice published", body = serde_json::Value),
        (status = 400, description = "Blank message", body = ErrorResponse),
    )
)]
pub async fn publish_notice(
    State(state): State<AppState>,
    Json(req): Json<PublishNoticeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = NewNotice::try_from(&req)?;
    let published = state.store.publish_notice(&draft).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::from(published))))
}

fn found(
    id: NoticeId,
    result: Sourced<Option<Notice>>,
) -> Result<Json<DataResponse<Notice>>, ApiError> {
    match result.value {
        Some(notice) => Ok(Json(DataResponse {
            data: notice,
            source: result.source,
        })),
        None => Err(ApiError::not_found("notice", id)),
    }
}

/// `POST /notices/{id}/activate`: Restore a notice from history.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/notices/{id}/activate",
    tag = "Notices",
    summary = "Restore notice",
    description = "Makes the notice the active one again. The notice active until now is archived.",
    params(
        ("id" = i64, Path, description = "Notice id"),
    ),
    responses(
        (status = 200, description = "Notice active", body = serde_json::Value),
        (status = 404, description = "Notice not found", body = ErrorResponse),
    )
)]
pub async fn activate_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let id = NoticeId::new(id);
    found(id, state.store.activate_notice(id).await?)
}

/// `POST /notices/{id}/deactivate`: Clear a notice from broadcast.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/notices/{id}/deactivate",
    tag = "Notices",
    summary = "Clear notice",
    params(
        ("id" = i64, Path, description = "Notice id"),
    ),
    responses(
        (status = 200, description = "Notice archived", body = serde_json::Value),
        (status = 404, description = "Notice not found", body = ErrorResponse),
    )
)]
pub async fn deactivate_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let id = NoticeId::new(id);
    let result = state.store.deactivate_notice(id).await?;
    tracing::info!(%id, "notice deactivated");
    found(id, result)
}

/// `DELETE /notices/{id}`: Delete an archived notice.
///
/// # Errors
///
/// Returns [`ApiError::ActiveNotice`] if the notice is still broadcast,
/// [`ApiError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/notices/{id}",
    tag = "Notices",
    summary = "Delete notice",
    params(
        ("id" = i64, Path, description = "Notice id"),
    ),
    responses(
        (status = 200, description = "Notice deleted", body = DeletedResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse),
        (status = 409, description = "Notice is active", body = ErrorResponse),
    )
)]
pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let id = NoticeId::new(id);
    let deleted = state.store.delete_notice(id).await?;
    if !deleted.value {
        return Err(ApiError::not_found("notice", id));
    }
    tracing::info!(%id, "notice deleted");
    Ok(Json(DeletedResponse {
        id: id.to_string(),
        deleted: true,
        source: deleted.source,
    }))
}

/// Notice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notices", get(list_notices).post(publish_notice))
        .route("/notices/active", get(active_notice))
        .route("/notices/{id}", delete(delete_notice))
        .route("/notices/{id}/activate", post(activate_notice))
        .route("/notices/{id}/deactivate", post(deactivate_notice))
}
