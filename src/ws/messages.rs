//! WebSocket message types: envelope, commands, and replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AppointmentForm, AppointmentId, AppointmentPatch, BarberFilter, BarberId, GridLayout,
};
use crate::service::{AgendaView, Notification};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests, echoed on the reply.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// A server message stamped now.
    #[must_use]
    pub fn reply(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// An error reply with a numeric code.
    #[must_use]
    pub fn error(id: String, code: u16, message: impl Into<String>) -> Self {
        Self::reply(
            id,
            WsMessageType::Error,
            serde_json::json!({
                "code": code,
                "message": message.into(),
            }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client reply to a command.
    Response,
    /// Server → Client error.
    Error,
}

/// Commands a client can send to its agenda session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgendaCommand {
    /// Reload the appointment set for the current filter.
    Reload,
    /// Scope the view to one barber, or `"all"`.
    SetBarberFilter {
        /// Barber id or `"all"`.
        barber: BarberFilter,
    },
    /// Move the viewed month.
    ChangeMonth {
        /// Months to move; negative goes back.
        delta: i32,
    },
    /// Switch grid layout.
    SetLayout {
        /// `desktop` or `mobile`.
        layout: GridLayout,
    },
    /// Book an appointment from the form.
    CreateAppointment {
        /// The booking form.
        form: AppointmentForm,
    },
    /// Edit an appointment from the full form.
    UpdateAppointment {
        /// Appointment id.
        id: AppointmentId,
        /// Owning barber.
        barber_id: BarberId,
        /// The edit form.
        form: AppointmentForm,
    },
    /// Change some fields, typically the status.
    PatchAppointment {
        /// Appointment id.
        id: AppointmentId,
        /// Owning barber.
        barber_id: BarberId,
        /// Fields to change.
        patch: AppointmentPatch,
    },
    /// Delete an appointment; nothing happens unless `confirmed`.
    DeleteAppointment {
        /// Appointment id.
        id: AppointmentId,
        /// Owning barber.
        barber_id: BarberId,
        /// The user confirmed the deletion.
        #[serde(default)]
        confirmed: bool,
    },
    /// Return the current view without touching the store.
    GetView,
}

/// Payload of every [`WsMessageType::Response`].
#[derive(Debug, Clone, Serialize)]
pub struct AgendaReply {
    /// Message for the user, if the command produced one.
    pub notification: Option<Notification>,
    /// The view after the command.
    pub view: AgendaView,
}
