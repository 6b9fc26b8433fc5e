//! インメモリ Membership Index 実装
//!
//! 接続 ID から参加中ルーム集合への逆参照を保持します。切断時の
//! クリーンアップと「自分がいるルーム」系クエリだけがこの索引を使います。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MembershipIndex, RoomName};

/// インメモリ Membership Index 実装
pub struct InMemoryMembershipIndex {
    joined_rooms: Mutex<HashMap<ConnectionId, Vec<RoomName>>>,
}

impl InMemoryMembershipIndex {
    /// 新しい InMemoryMembershipIndex を作成
    pub fn new() -> Self {
        Self {
            joined_rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMembershipIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipIndex for InMemoryMembershipIndex {
    async fn record_join(&self, connection_id: ConnectionId, room: RoomName) {
        let mut joined_rooms = self.joined_rooms.lock().await;
        let rooms = joined_rooms.entry(connection_id).or_default();
        if !rooms.contains(&room) {
            rooms.push(room);
        }
    }

    async fn record_leave(&self, connection_id: &ConnectionId, room: &RoomName) {
        let mut joined_rooms = self.joined_rooms.lock().await;
        if let Some(rooms) = joined_rooms.get_mut(connection_id) {
            rooms.retain(|r| r != room);
        }
    }

    async fn is_member(&self, connection_id: &ConnectionId, room: &RoomName) -> bool {
        let joined_rooms = self.joined_rooms.lock().await;
        joined_rooms
            .get(connection_id)
            .map(|rooms| rooms.contains(room))
            .unwrap_or(false)
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomName> {
        let joined_rooms = self.joined_rooms.lock().await;
        joined_rooms.get(connection_id).cloned().unwrap_or_default()
    }

    async fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId> {
        let joined_rooms = self.joined_rooms.lock().await;
        joined_rooms
            .iter()
            .filter(|(_, rooms)| rooms.contains(room))
            .map(|(connection_id, _)| connection_id.clone())
            .collect()
    }

    async fn clear(&self, connection_id: &ConnectionId) -> Vec<RoomName> {
        let mut joined_rooms = self.joined_rooms.lock().await;
        joined_rooms.remove(connection_id).unwrap_or_default()
    }
}
