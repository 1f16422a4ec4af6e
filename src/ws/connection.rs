//! Agenda session loop.
//!
//! Each connection owns one [`AgendaController`]: its filter, month and
//! layout are private to that client. Commands are handled one at a time
//! and every reply carries the resulting view.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use super::messages::{AgendaCommand, AgendaReply, WsMessage, WsMessageType};
use crate::service::{AgendaController, Confirmation, Notification};

/// Runs the read/write loop for a single agenda session.
pub async fn run_connection(socket: WebSocket, controller: AgendaController, session: Uuid) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let initial = controller.reload().await;
    tracing::debug!(%session, status = ?initial.status, "agenda session opened");

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = handle_text_message(&controller, &text).await;
                if reply.msg_type == WsMessageType::Error {
                    tracing::debug!(%session, payload = %reply.payload, "agenda command failed");
                }
                let Ok(json) = serde_json::to_string(&reply) else {
                    tracing::error!(%session, "failed to serialize agenda reply");
                    continue;
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    tracing::debug!(%session, "agenda session closed");
}

/// Parses one client message and runs it against the session.
pub async fn handle_text_message(controller: &AgendaController, text: &str) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command");
    }
    let command = match serde_json::from_value::<AgendaCommand>(msg.payload) {
        Ok(command) => command,
        Err(err) => return WsMessage::error(msg.id, 404, format!("unknown command: {err}")),
    };

    let notification = execute(controller, command).await;
    let reply = AgendaReply {
        notification,
        view: controller.snapshot().await,
    };
    match serde_json::to_value(&reply) {
        Ok(payload) => WsMessage::reply(msg.id, WsMessageType::Response, payload),
        Err(err) => WsMessage::error(msg.id, 500, format!("serialization failed: {err}")),
    }
}

async fn execute(controller: &AgendaController, command: AgendaCommand) -> Option<Notification> {
    match command {
        AgendaCommand::Reload => controller.reload().await.notification,
        AgendaCommand::SetBarberFilter { barber } => {
            controller.set_barber_filter(barber).await.notification
        }
        AgendaCommand::ChangeMonth { delta } => controller.change_month(delta).await.notification,
        AgendaCommand::SetLayout { layout } => {
            controller.set_layout(layout).await;
            None
        }
        AgendaCommand::CreateAppointment { form } => {
            Some(controller.create_appointment(&form).await)
        }
        AgendaCommand::UpdateAppointment {
            id,
            barber_id,
            form,
        } => Some(controller.update_appointment(id, &barber_id, &form).await),
        AgendaCommand::PatchAppointment {
            id,
            barber_id,
            patch,
        } => Some(controller.patch_appointment(id, &barber_id, &patch).await),
        AgendaCommand::DeleteAppointment {
            id,
            barber_id,
            confirmed,
        } => Some(
            controller
                .delete_appointment(id, &barber_id, Confirmation::from(confirmed))
                .await,
        ),
        AgendaCommand::GetView => None,
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::service::FixedClock;
    use crate::store::RecordStore;

    fn controller() -> AgendaController {
        let Some(today) = NaiveDate::from_ymd_opt(2025, 6, 26) else {
            panic!("bad date");
        };
        AgendaController::new(Arc::new(RecordStore::demo()), Arc::new(FixedClock::on(today)))
    }

    fn command(payload: serde_json::Value) -> String {
        serde_json::json!({
            "id": "req-1",
            "type": "command",
            "timestamp": "2025-06-26T09:00:00Z",
            "payload": payload,
        })
        .to_string()
    }

    #[tokio::test]
    async fn reload_replies_with_view_and_offline_warning() {
        let controller = controller();
        let reload = command(serde_json::json!({"command": "reload"}));
        let reply = handle_text_message(&controller, &reload).await;
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.id, "req-1");
        assert_eq!(reply.payload["notification"]["level"], "warning");
        assert_eq!(reply.payload["view"]["appointments"].as_array().map(Vec::len), Some(7));
        assert_eq!(reply.payload["view"]["source"], "fallback");
    }

    #[tokio::test]
    async fn filter_then_view() {
        let controller = controller();
        let _ = handle_text_message(
            &controller,
            &command(serde_json::json!({"command": "set_barber_filter", "barber": "lele"})),
        )
        .await;
        let get_view = command(serde_json::json!({"command": "get_view"}));
        let reply = handle_text_message(&controller, &get_view).await;
        assert_eq!(reply.payload["view"]["filter"], "lele");
        assert_eq!(reply.payload["view"]["appointments"].as_array().map(Vec::len), Some(3));
        assert!(reply.payload["notification"].is_null());
    }

    #[tokio::test]
    async fn invalid_form_is_reported_as_notification() {
        let controller = controller();
        let reply = handle_text_message(
            &controller,
            &command(serde_json::json!({
                "command": "create_appointment",
                "form": {"barber_id": "renne", "client_name": "Ana"}
            })),
        )
        .await;
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.payload["notification"]["level"], "error");
    }

    #[tokio::test]
    async fn unconfirmed_delete_keeps_the_appointment() {
        let controller = controller();
        let _ = controller.reload().await;
        let delete = command(serde_json::json!({
            "command": "delete_appointment",
            "id": 1,
            "barber_id": "renne",
        }));
        let reply = handle_text_message(&controller, &delete).await;
        assert_eq!(reply.payload["notification"]["level"], "info");
        assert_eq!(reply.payload["view"]["appointments"].as_array().map(Vec::len), Some(7));
    }

    #[tokio::test]
    async fn malformed_and_unknown_messages_get_errors() {
        let controller = controller();
        let garbage = handle_text_message(&controller, "not json").await;
        assert_eq!(garbage.msg_type, WsMessageType::Error);
        assert_eq!(garbage.payload["code"], 400);

        let subscribe = command(serde_json::json!({"command": "subscribe"}));
        let unknown = handle_text_message(&controller, &subscribe).await;
        assert_eq!(unknown.msg_type, WsMessageType::Error);
        assert_eq!(unknown.payload["code"], 404);
        assert_eq!(unknown.id, "req-1");
    }
}
