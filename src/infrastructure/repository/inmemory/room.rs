//! インメモリ Room Directory 実装
//!
//! ルーム名をキーとした HashMap をインメモリ DB として使用します。
//! ルームは最初の join で遅延生成され、以後削除されません。空になった
//! ルームも履歴を保持したまま残ります（再参加時に履歴を再利用するため）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Room, RoomDirectory, RoomError, RoomMessage, RoomName, Timestamp, Username,
};

/// インメモリ Room Directory 実装
pub struct InMemoryRoomDirectory {
    rooms: Mutex<HashMap<RoomName, Room>>,
}

impl InMemoryRoomDirectory {
    /// 新しい InMemoryRoomDirectory を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomDirectory for InMemoryRoomDirectory {
    async fn join(&self, room: &RoomName, username: Username, now: Timestamp) -> Vec<RoomMessage> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms
            .entry(room.clone())
            .or_insert_with(|| Room::new(room.clone(), now));
        entry.add_member(username.clone());
        entry.record_message(RoomMessage::system_joined(room.clone(), &username));
        entry.history.to_vec()
    }

    async fn leave(&self, room: &RoomName, username: &Username) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms
            .get_mut(room)
            .ok_or_else(|| RoomError::UnknownRoom(room.as_str().to_string()))?;
        entry.remove_member(username);
        entry.record_message(RoomMessage::system_left(room.clone(), username));
        Ok(())
    }

    async fn remove_member(&self, room: &RoomName, username: &Username) {
        let mut rooms = self.rooms.lock().await;
        if let Some(entry) = rooms.get_mut(room) {
            entry.remove_member(username);
        }
    }

    async fn post_message(&self, message: RoomMessage) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms
            .get_mut(&message.room)
            .ok_or_else(|| RoomError::UnknownRoom(message.room.as_str().to_string()))?;
        entry.record_message(message);
        Ok(())
    }

    async fn members_of(&self, room: &RoomName) -> Vec<Username> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room)
            .map(|entry| entry.members.clone())
            .unwrap_or_default()
    }

    async fn history_of(&self, room: &RoomName) -> Vec<RoomMessage> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room)
            .map(|entry| entry.history.to_vec())
            .unwrap_or_default()
    }

    async fn all_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, HISTORY_CAPACITY, MessageText};

    fn room_name(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn user_message(room: &str, user: &str, text: &str) -> RoomMessage {
        RoomMessage::user(
            room_name(room),
            username(user),
            MessageText::new(text.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_join_creates_room_lazily() {
        // テスト項目: 最初の join でルームが生成され、参加通知が履歴に入る
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();

        // when (操作):
        let history = directory
            .join(&room_name("general"), username("alice"), Timestamp::new(0))
            .await;

        // then (期待する結果):
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].author, Author::System);
        assert_eq!(history[0].text.as_str(), "alice has joined the room.");
        assert_eq!(
            directory.members_of(&room_name("general")).await,
            vec![username("alice")]
        );
    }

    #[tokio::test]
    async fn test_join_returns_existing_history() {
        // テスト項目: 2 人目の join は既存履歴込みのスナップショットを返す
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();
        directory
            .join(&room_name("general"), username("alice"), Timestamp::new(0))
            .await;
        directory
            .post_message(user_message("general", "alice", "hello"))
            .await
            .unwrap();

        // when (操作):
        let history = directory
            .join(&room_name("general"), username("bob"), Timestamp::new(1))
            .await;

        // then (期待する結果): 参加通知 + メッセージ + bob の参加通知
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].text.as_str(), "hello");
        assert_eq!(history[2].text.as_str(), "bob has joined the room.");
        assert_eq!(
            directory.members_of(&room_name("general")).await,
            vec![username("alice"), username("bob")]
        );
    }

    #[tokio::test]
    async fn test_leave_unknown_room_fails() {
        // テスト項目: 生成されていないルームからの退出はエラーになる
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();

        // when (操作):
        let result = directory.leave(&room_name("ghost"), &username("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::UnknownRoom("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_leave_removes_member_and_records_notice() {
        // テスト項目: 退出でメンバーが外れ、退出通知が履歴に入る
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();
        directory
            .join(&room_name("general"), username("alice"), Timestamp::new(0))
            .await;

        // when (操作):
        let result = directory
            .leave(&room_name("general"), &username("alice"))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(directory.members_of(&room_name("general")).await.is_empty());
        let history = directory.history_of(&room_name("general")).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text.as_str(), "alice has left the room.");
    }

    #[tokio::test]
    async fn test_remove_member_records_no_notice() {
        // テスト項目: remove_member は退出通知を残さない（切断時のクリーンアップ用）
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();
        directory
            .join(&room_name("general"), username("alice"), Timestamp::new(0))
            .await;

        // when (操作):
        directory
            .remove_member(&room_name("general"), &username("alice"))
            .await;

        // then (期待する結果): 履歴は参加通知 1 件のまま
        assert!(directory.members_of(&room_name("general")).await.is_empty());
        assert_eq!(directory.history_of(&room_name("general")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_post_message_to_unknown_room_fails() {
        // テスト項目: 生成されていないルームへの投稿はエラーになる
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();

        // when (操作):
        let result = directory
            .post_message(user_message("ghost", "alice", "hello"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::UnknownRoom("ghost".to_string())));
        assert!(directory.history_of(&room_name("ghost")).await.is_empty());
    }

    #[tokio::test]
    async fn test_post_message_evicts_oldest_at_capacity() {
        // テスト項目: 履歴が上限に達すると最古のエントリから追い出される
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();
        directory
            .join(&room_name("general"), username("alice"), Timestamp::new(0))
            .await;

        // when (操作): 参加通知を含め 11 件になるまで投稿する
        for i in 1..=HISTORY_CAPACITY {
            directory
                .post_message(user_message("general", "alice", &format!("message {i}")))
                .await
                .unwrap();
        }

        // then (期待する結果): 参加通知が追い出され、直近 10 件が残る
        let history = directory.history_of(&room_name("general")).await;
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history[0].text.as_str(), "message 1");
        assert_eq!(
            history[HISTORY_CAPACITY - 1].text.as_str(),
            format!("message {HISTORY_CAPACITY}")
        );
    }

    #[tokio::test]
    async fn test_room_persists_after_emptying() {
        // テスト項目: 空になったルームも履歴を保持したまま残る
        // given (前提条件):
        let directory = InMemoryRoomDirectory::new();
        directory
            .join(&room_name("general"), username("alice"), Timestamp::new(0))
            .await;
        directory
            .leave(&room_name("general"), &username("alice"))
            .await
            .unwrap();

        // when (操作):
        let rooms = directory.all_rooms().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert!(rooms[0].members.is_empty());
        assert_eq!(rooms[0].history.len(), 2);
    }
}
