//! WebSocket layer: agenda sessions.
//!
//! The endpoint at `/ws/agenda` gives each client its own agenda view.
//! The client sends commands; the server answers each one with the
//! resulting notification and view. Nothing is pushed unprompted.

pub mod connection;
pub mod handler;
pub mod messages;
