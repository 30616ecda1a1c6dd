//! Relay service and per-connection receive loop.

use futures::{Stream, StreamExt};

use crate::policy::ForwardingPolicy;
use crate::registry::{ClientId, ConnectionRegistry, PeerHandle};
use crate::role::Role;

/// One received transport event, as seen by the relay loop.
///
/// The transport maps its own close/error signals into this tagged form
/// so the loop never unwinds through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecvEvent {
    /// A text frame arrived.
    Frame(String),
    /// The peer closed the connection cleanly.
    Disconnected,
    /// The transport failed while receiving.
    Error(String),
}

/// Relay service: the connection registry plus the forwarding policy.
///
/// Built once at process start and shared (via `Arc`) with every
/// connection handler.
#[derive(Debug, Default)]
pub struct Relay {
    registry: ConnectionRegistry,
    policy: ForwardingPolicy,
}

impl Relay {
    /// Create a relay with the given forwarding policy.
    #[must_use]
    pub fn new(policy: ForwardingPolicy) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            policy,
        }
    }

    /// The shared connection registry.
    #[must_use]
    pub const fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Fan one frame from `(sender_role, sender_id)` out to every peer in
    /// the partition the policy routes it to.
    ///
    /// Returns how many peers the frame was queued for. A peer whose
    /// channel has closed is skipped; it does not abort delivery to the
    /// rest and does not fail the sender's loop.
    pub async fn dispatch(&self, sender_role: Role, sender_id: &str, data: &str) -> usize {
        let Some(target) = self.policy.target(sender_role) else {
            tracing::info!(role = %sender_role, id = sender_id, data = %data, "frame received, no forwarding route");
            return 0;
        };

        let peers = self.registry.snapshot(target).await;
        let payload = relay_payload(sender_role, sender_id, data);

        let mut delivered = 0;
        for (peer_id, handle) in &peers {
            if handle.send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::warn!(target_role = %target, peer = %peer_id, "peer channel closed, skipping");
            }
        }
        tracing::debug!(
            role = %sender_role,
            id = sender_id,
            target_role = %target,
            delivered,
            "frame relayed"
        );
        delivered
    }
}

/// Wire format for a relayed frame.
fn relay_payload(sender_role: Role, sender_id: &str, data: &str) -> String {
    format!(
        "Message from {} ({sender_id}): {data}",
        sender_role.display_name()
    )
}

/// Drive one connection's lifecycle: register, relay, deregister.
///
/// The connection moves through accept (registration), a receive cycle
/// that fans out each `Frame` per the forwarding policy, and a terminal
/// close. Clean disconnects, transport errors, and the event stream
/// simply ending all take the same deregistration path; the loop never
/// escalates past its own connection.
pub async fn run_session<S>(relay: &Relay, role: Role, id: ClientId, handle: PeerHandle, events: S)
where
    S: Stream<Item = RecvEvent> + Send,
{
    let conn_id = handle.conn_id();
    relay.registry().register(role, id.clone(), handle).await;
    tracing::info!(role = %role, id = %id, conn = %conn_id, "peer connected");

    let mut events = std::pin::pin!(events);
    while let Some(event) = events.next().await {
        match event {
            RecvEvent::Frame(data) => {
                relay.dispatch(role, &id, &data).await;
            }
            RecvEvent::Disconnected => {
                tracing::info!(role = %role, id = %id, "peer disconnected");
                break;
            }
            RecvEvent::Error(cause) => {
                tracing::error!(role = %role, id = %id, cause = %cause, "transport error, closing connection");
                break;
            }
        }
    }

    relay.registry().unregister(role, &id, conn_id).await;
}
