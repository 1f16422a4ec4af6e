//! End-to-end agenda session tests over a real WebSocket.

#![allow(clippy::panic, clippy::indexing_slicing)]

mod common;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

type Socket = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn open() -> Socket {
    let addr = common::spawn_server().await;
    let Ok((socket, _)) = connect_async(format!("ws://{addr}/ws/agenda")).await else {
        panic!("ws connect failed");
    };
    socket
}

async fn send(socket: &mut Socket, id: &str, payload: Value) -> Value {
    let envelope = json!({
        "id": id,
        "type": "command",
        "timestamp": "2025-06-26T09:00:00Z",
        "payload": payload,
    });
    if socket.send(Message::text(envelope.to_string())).await.is_err() {
        panic!("ws send failed");
    }
    loop {
        let Some(Ok(msg)) = socket.next().await else {
            panic!("ws closed before reply");
        };
        if let Ok(text) = msg.to_text()
            && !text.is_empty()
        {
            let Ok(reply) = serde_json::from_str::<Value>(text) else {
                panic!("reply is not json");
            };
            return reply;
        }
    }
}

#[tokio::test]
async fn session_books_and_completes_an_appointment() {
    let mut socket = open().await;

    let view = send(&mut socket, "1", json!({"command": "get_view"})).await;
    assert_eq!(view["type"], "response");
    assert_eq!(view["id"], "1");
    assert_eq!(view["payload"]["view"]["appointments"].as_array().map(Vec::len), Some(7));

    let filter = json!({"command": "set_barber_filter", "barber": "renne"});
    let filtered = send(&mut socket, "2", filter).await;
    assert_eq!(filtered["payload"]["view"]["filter"], "renne");
    assert_eq!(filtered["payload"]["view"]["appointments"].as_array().map(Vec::len), Some(4));

    // The filter supplies the barber.
    let created = send(
        &mut socket,
        "3",
        json!({
            "command": "create_appointment",
            "form": {
                "client_name": "Marcos Dias",
                "date": "2025-06-26",
                "start_time": "17:00",
                "end_time": "17:30",
                "service": "Corte",
                "price": 35,
            }
        }),
    )
    .await;
    assert_ne!(created["payload"]["notification"]["level"], "error");
    let today = created["payload"]["view"]["today_schedule"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(today.last().map(|a| a["client_name"].clone()), Some(json!("Marcos Dias")));

    let completed = send(
        &mut socket,
        "4",
        json!({
            "command": "patch_appointment",
            "id": 8,
            "barber_id": "renne",
            "patch": {"status": "completed"},
        }),
    )
    .await;
    assert_ne!(completed["payload"]["notification"]["level"], "error");

    let deleted = send(
        &mut socket,
        "5",
        json!({"command": "delete_appointment", "id": 8, "barber_id": "renne", "confirmed": true}),
    )
    .await;
    assert_eq!(deleted["payload"]["view"]["appointments"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn month_and_layout_changes() {
    let mut socket = open().await;

    let next = send(&mut socket, "1", json!({"command": "change_month", "delta": 1})).await;
    assert_eq!(next["payload"]["view"]["month"]["month"], 7);

    let mobile = send(&mut socket, "2", json!({"command": "set_layout", "layout": "mobile"})).await;
    assert_eq!(mobile["payload"]["view"]["grid"]["layout"], "mobile");
    assert_eq!(mobile["payload"]["view"]["grid"]["cells"][0]["kind"], "day");
}

#[tokio::test]
async fn unknown_command_gets_an_error_envelope() {
    let mut socket = open().await;
    let reply = send(&mut socket, "x", json!({"command": "subscribe"})).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["id"], "x");
    assert_eq!(reply["payload"]["code"], 404);
}
