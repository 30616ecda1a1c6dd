//! WebSocket transport for the relay endpoints.
//!
//! Provides:
//! - Axum upgrade handlers for `/ws/ai_server` and `/ws/front`
//! - Socket glue translating WebSocket traffic into relay events

pub mod websocket;

pub use websocket::{ConnectParams, WsState, create_relay_router};
