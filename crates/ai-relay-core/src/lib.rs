//! Core connection registry and message relay.
//!
//! This crate provides the fundamental building blocks:
//! - `ConnectionRegistry` - Role-partitioned map of live peer channels
//! - `ForwardingPolicy` - Per-role routing table for fan-out
//! - `Relay` + `run_session` - Per-connection receive loop and lifecycle
//! - `RecvEvent` - Tagged result of a transport receive

pub mod policy;
pub mod registry;
pub mod relay;
pub mod role;

pub use policy::ForwardingPolicy;
pub use registry::{ClientId, ConnectionId, ConnectionRegistry, PeerGone, PeerHandle};
pub use relay::{Relay, RecvEvent, run_session};
pub use role::Role;
