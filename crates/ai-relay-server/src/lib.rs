//! HTTP surface and entry point for the relay service.
//!
//! Composes three surfaces behind one router:
//! - Greeting endpoints (`GET /`, `GET /hello/{name}`)
//! - A relational insert endpoint (`POST /insert`)
//! - The WebSocket relay (`/ws/ai_server`, `/ws/front`)

pub mod app;
pub mod routes;
pub mod storage;

pub use app::{AppState, build_app};
