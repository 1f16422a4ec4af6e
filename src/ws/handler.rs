//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::service::AgendaController;

/// `GET /ws/agenda`: Upgrade to an agenda session.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let controller = AgendaController::new(Arc::clone(&state.store), Arc::clone(&state.clock));
    let session = uuid::Uuid::new_v4();
    ws.on_upgrade(move |socket| run_connection(socket, controller, session))
}
