//! Store traits owned by the domain layer.
//!
//! The coordinator keeps its state in four stores, one per concern. The
//! domain defines the traits; the infrastructure layer provides the
//! implementations, and the use case layer depends only on the traits
//! (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{PrivateMessage, Room, RoomMessage},
    error::{RegistryError, RoomError},
    value_object::{ConnectionId, RoomName, Timestamp, Username},
};

/// Maps a live connection to the username it registered under.
///
/// Usernames are unique across currently connected clients only; a departed
/// name becomes available again.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Bind the username to the connection.
    ///
    /// Re-registering from the same connection re-binds it; the call fails
    /// only when a different live connection already holds the name. The
    /// uniqueness check and the bind are atomic.
    async fn register(
        &self,
        connection_id: ConnectionId,
        username: Username,
    ) -> Result<(), RegistryError>;

    /// Remove and return the username bound to the connection, if any
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Username>;

    /// Username currently bound to the connection
    async fn username_of(&self, connection_id: &ConnectionId) -> Option<Username>;

    /// Connection currently holding the username
    async fn connection_of(&self, username: &Username) -> Option<ConnectionId>;

    /// All registered usernames, in bind order
    async fn all_usernames(&self) -> Vec<Username>;
}

/// Maps a room name to its member list and bounded message history.
///
/// Rooms are created lazily on first join and never deleted; an emptied room
/// keeps its history for later rejoin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// Add the username to the room, creating the room if needed, and append
    /// the synthetic join notice. Returns the post-append history snapshot.
    async fn join(&self, room: &RoomName, username: Username, now: Timestamp) -> Vec<RoomMessage>;

    /// Remove the first matching occurrence of the username and append the
    /// synthetic leave notice. Fails when the room was never created.
    async fn leave(&self, room: &RoomName, username: &Username) -> Result<(), RoomError>;

    /// Remove the first matching occurrence of the username without
    /// appending a notice; used by disconnect cleanup.
    async fn remove_member(&self, room: &RoomName, username: &Username);

    /// Append a message to the room history, evicting the oldest entry at
    /// capacity. Fails when the room was never created.
    async fn post_message(&self, message: RoomMessage) -> Result<(), RoomError>;

    /// Member usernames in join order (empty for an unknown room)
    async fn members_of(&self, room: &RoomName) -> Vec<Username>;

    /// History snapshot oldest first (empty for an unknown room)
    async fn history_of(&self, room: &RoomName) -> Vec<RoomMessage>;

    /// Snapshot of every room ever created
    async fn all_rooms(&self) -> Vec<Room>;
}

/// Maps a connection to the set of rooms it has joined.
///
/// This is the back-reference that drives disconnect cleanup and the
/// "which rooms am I in" queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipIndex: Send + Sync {
    /// Record that the connection joined the room
    async fn record_join(&self, connection_id: ConnectionId, room: RoomName);

    /// Record that the connection left the room
    async fn record_leave(&self, connection_id: &ConnectionId, room: &RoomName);

    /// Whether the connection is currently recorded as joined to the room
    async fn is_member(&self, connection_id: &ConnectionId, room: &RoomName) -> bool;

    /// Rooms the connection has joined, in join order
    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomName>;

    /// Connections currently joined to the room
    async fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId>;

    /// Drop the connection's entry and return the rooms it was joined to
    async fn clear(&self, connection_id: &ConnectionId) -> Vec<RoomName>;
}

/// Maps an unordered user pair to its bounded private-message history.
///
/// Buffers are created on first message and never deleted; messages persist
/// for history queries even when the recipient is offline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectMessageStore: Send + Sync {
    /// Append the message to the pair's buffer, evicting the oldest at capacity
    async fn post(&self, message: PrivateMessage);

    /// History snapshot for the pair, oldest first (empty if none yet)
    async fn history_of(&self, a: &Username, b: &Username) -> Vec<PrivateMessage>;
}
