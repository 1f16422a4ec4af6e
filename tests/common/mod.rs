//! Test server bootstrap shared by the end-to-end suites.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use barber_desk::app_state::AppState;
use barber_desk::service::FixedClock;
use barber_desk::store::RecordStore;
use chrono::NaiveDate;

/// A server on an ephemeral port over the demo dataset, with the clock
/// stopped on 2025-06-26.
pub async fn spawn_server() -> SocketAddr {
    let Some(today) = NaiveDate::from_ymd_opt(2025, 6, 26) else {
        panic!("bad date");
    };
    let state = AppState::with_clock(RecordStore::demo(), Arc::new(FixedClock::on(today)));
    let app = barber_desk::build_app(state, Duration::from_secs(5));

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
