//! Outbound events produced by use cases.
//!
//! A use case never touches a socket: it returns the events to emit together
//! with their targets, and the UI layer resolves targets to live senders.
//! Sends happen after every store lock is released; the snapshots inside the
//! events were taken while the locks were held.

use crate::{domain::ConnectionId, infrastructure::dto::websocket::ServerEvent};

/// Who should receive an outbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Exactly one connection (unicast)
    One(ConnectionId),
    /// A resolved set of connections (room-cast)
    Many(Vec<ConnectionId>),
    /// Every currently connected client (broadcast)
    All,
}

/// An event paired with its delivery target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub target: Target,
    pub event: ServerEvent,
}

impl Outbound {
    /// Unicast to a single connection
    pub fn one(connection_id: ConnectionId, event: ServerEvent) -> Self {
        Self {
            target: Target::One(connection_id),
            event,
        }
    }

    /// Send to a resolved set of connections
    pub fn many(connection_ids: Vec<ConnectionId>, event: ServerEvent) -> Self {
        Self {
            target: Target::Many(connection_ids),
            event,
        }
    }

    /// Broadcast to every connected client
    pub fn all(event: ServerEvent) -> Self {
        Self {
            target: Target::All,
            event,
        }
    }
}
