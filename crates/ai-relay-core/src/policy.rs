//! Per-role forwarding policy.

use crate::role::Role;

/// Routing table mapping a sender role to the partition its frames fan
/// out to.
///
/// `None` means frames from that role are received and logged, not
/// forwarded. Changing who talks to whom is a row edit here, not a new
/// branch in the relay loop.
#[derive(Debug, Clone)]
pub struct ForwardingPolicy {
    routes: [(Role, Option<Role>); 2],
}

impl Default for ForwardingPolicy {
    /// AI-server frames fan out to front peers; front frames stay put.
    fn default() -> Self {
        Self {
            routes: [(Role::AiServer, Some(Role::Front)), (Role::Front, None)],
        }
    }
}

impl ForwardingPolicy {
    /// Partition frames from `sender` are forwarded to, if any.
    #[must_use]
    pub fn target(&self, sender: Role) -> Option<Role> {
        self.routes
            .iter()
            .find(|(role, _)| *role == sender)
            .and_then(|(_, target)| *target)
    }

    /// Replace the route for one sender role.
    #[must_use]
    pub fn with_route(mut self, sender: Role, target: Option<Role>) -> Self {
        for route in &mut self.routes {
            if route.0 == sender {
                route.1 = target;
            }
        }
        self
    }
}
