//! Server state and connection management.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        ConnectionId, DirectMessageStore, IdentityRegistry, MembershipIndex, RoomDirectory,
    },
    infrastructure::repository::{
        InMemoryDirectMessageStore, InMemoryIdentityRegistry, InMemoryMembershipIndex,
        InMemoryRoomDirectory,
    },
};

/// Client connection information
pub struct ClientInfo {
    /// Message sender channel
    pub sender: mpsc::UnboundedSender<String>,
    /// Unix timestamp when connected (in JST, milliseconds)
    pub connected_at: i64,
}

/// Shared application state
pub struct AppState {
    /// Identity Registry（接続とユーザ名の対応）
    pub identity: Arc<dyn IdentityRegistry>,
    /// Room Directory（ルームのメンバーと履歴）
    pub rooms: Arc<dyn RoomDirectory>,
    /// Membership Index（接続から参加中ルームへの逆参照）
    pub membership: Arc<dyn MembershipIndex>,
    /// Direct Message Store（ペアごとの有界履歴）
    pub direct_messages: Arc<dyn DirectMessageStore>,
    /// WebSocket sender channels for delivery
    pub connected_clients: Arc<Mutex<HashMap<ConnectionId, ClientInfo>>>,
}

impl AppState {
    /// Create the state with fresh in-memory stores
    pub fn new() -> Self {
        Self {
            identity: Arc::new(InMemoryIdentityRegistry::new()),
            rooms: Arc::new(InMemoryRoomDirectory::new()),
            membership: Arc::new(InMemoryMembershipIndex::new()),
            direct_messages: Arc::new(InMemoryDirectMessageStore::new()),
            connected_clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
