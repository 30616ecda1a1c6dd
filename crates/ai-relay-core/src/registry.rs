//! Role-partitioned registry of live connections.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::role::Role;

/// Client-supplied identifier, unique only within a role partition.
pub type ClientId = String;

/// Process-unique identifier for one accepted connection.
///
/// A client id can be reused by a later connection (last register wins),
/// so cleanup paths are scoped to the connection that registered.
pub type ConnectionId = Uuid;

/// Error returned when a peer's outbound channel is closed.
#[derive(Debug, thiserror::Error)]
#[error("peer channel closed")]
pub struct PeerGone;

/// Sending half of a registered peer's outbound channel.
///
/// The registry holds handles, never sockets; the receiving half is
/// drained by the connection's writer task in the transport layer.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    conn_id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

impl PeerHandle {
    /// Wrap an outbound channel, assigning a fresh connection id.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            tx,
        }
    }

    /// Connection id this handle was registered under.
    #[must_use]
    pub const fn conn_id(&self) -> ConnectionId {
        self.conn_id
    }

    /// Queue one text frame for delivery to the peer.
    ///
    /// # Errors
    /// Returns `PeerGone` if the peer's writer task has gone away.
    pub fn send(&self, text: String) -> Result<(), PeerGone> {
        self.tx.send(text).map_err(|_| PeerGone)
    }
}

/// Role-partitioned map of live connections.
///
/// Constructed once at process start and shared by every connection task.
/// Each partition has its own lock; register and unregister take a write
/// lock, snapshots take a read lock and clone the entries out, so fan-out
/// never iterates under a lock held across a send.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    ai_servers: RwLock<HashMap<ClientId, PeerHandle>>,
    fronts: RwLock<HashMap<ClientId, PeerHandle>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn partition(&self, role: Role) -> &RwLock<HashMap<ClientId, PeerHandle>> {
        match role {
            Role::AiServer => &self.ai_servers,
            Role::Front => &self.fronts,
        }
    }

    /// Insert or overwrite the entry for `(role, id)`.
    ///
    /// Duplicate ids are not an error: the previous connection's entry is
    /// replaced and the replacement is logged.
    pub async fn register(&self, role: Role, id: ClientId, handle: PeerHandle) {
        let mut partition = self.partition(role).write().await;
        if let Some(prev) = partition.insert(id.clone(), handle) {
            tracing::warn!(
                role = %role,
                id = %id,
                replaced_conn = %prev.conn_id(),
                "client id re-registered, replacing live connection"
            );
        }
    }

    /// Remove the entry for `(role, id)` if it still belongs to `conn_id`.
    ///
    /// A no-op when the id is absent or has been taken over by a newer
    /// connection, so a stale loop's cleanup cannot evict its replacement.
    pub async fn unregister(&self, role: Role, id: &str, conn_id: ConnectionId) {
        let mut partition = self.partition(role).write().await;
        if partition.get(id).is_some_and(|h| h.conn_id() == conn_id) {
            partition.remove(id);
        }
    }

    /// Point-in-time view of a partition's entries.
    ///
    /// The returned pairs are clones; concurrent register/unregister calls
    /// cannot invalidate iteration over them.
    pub async fn snapshot(&self, role: Role) -> Vec<(ClientId, PeerHandle)> {
        self.partition(role)
            .read()
            .await
            .iter()
            .map(|(id, handle)| (id.clone(), handle.clone()))
            .collect()
    }

    /// Number of live connections in a partition.
    pub async fn peer_count(&self, role: Role) -> usize {
        self.partition(role).read().await.len()
    }
}
