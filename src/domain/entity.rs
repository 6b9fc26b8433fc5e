//! Core domain models for the presence coordinator.

use std::collections::VecDeque;
use std::fmt;

use super::value_object::{MessageText, RoomName, Timestamp, Username};

/// Maximum number of entries retained per history buffer
pub const HISTORY_CAPACITY: usize = 10;

/// Author name attached to synthetic join/leave messages
pub const SYSTEM_AUTHOR: &str = "System";

/// Fixed-capacity FIFO retaining only the most recent entries.
///
/// Appending past capacity evicts the oldest entry; eviction is the normal
/// sliding-window behavior, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryBuffer<T> {
    /// Create an empty buffer with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty buffer with a custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one when the buffer is full
    pub fn push(&mut self, entry: T) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Clone> HistoryBuffer<T> {
    /// Snapshot the entries oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> Default for HistoryBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Author of a room message: a registered user or the coordinator itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    /// Synthetic message narrating a join/leave
    System,
    /// Message written by a user
    User(Username),
}

impl Author {
    /// Get the author name as shown on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Author::System => SYSTEM_AUTHOR,
            Author::User(username) => username.as_str(),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a message posted to a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMessage {
    /// Room the message belongs to
    pub room: RoomName,
    /// Author of the message
    pub author: Author,
    /// Message text
    pub text: MessageText,
}

impl RoomMessage {
    /// Create a message authored by a user
    pub fn user(room: RoomName, author: Username, text: MessageText) -> Self {
        Self {
            room,
            author: Author::User(author),
            text,
        }
    }

    /// Create the synthetic notice appended when a user joins a room
    pub fn system_joined(room: RoomName, user: &Username) -> Self {
        let text = MessageText::new(format!("{user} has joined the room."))
            .expect("system join notice is non-empty and bounded");
        Self {
            room,
            author: Author::System,
            text,
        }
    }

    /// Create the synthetic notice appended when a user leaves a room
    pub fn system_left(room: RoomName, user: &Username) -> Self {
        let text = MessageText::new(format!("{user} has left the room."))
            .expect("system leave notice is non-empty and bounded");
        Self {
            room,
            author: Author::System,
            text,
        }
    }
}

/// Represents a chat room with its member list and bounded message history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Room name (identity)
    pub name: RoomName,
    /// Usernames currently joined, in join order
    pub members: Vec<Username>,
    /// Bounded message history, oldest first
    pub history: HistoryBuffer<RoomMessage>,
    /// Timestamp when the room was lazily created
    pub created_at: Timestamp,
}

impl Room {
    /// Create a new empty room
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self {
            name,
            members: Vec::new(),
            history: HistoryBuffer::new(),
            created_at,
        }
    }

    /// Append a member to the room
    pub fn add_member(&mut self, username: Username) {
        self.members.push(username);
    }

    /// Remove the first matching occurrence of the username, if any
    pub fn remove_member(&mut self, username: &Username) {
        if let Some(position) = self.members.iter().position(|m| m == username) {
            self.members.remove(position);
        }
    }

    /// Record a message in the bounded history
    pub fn record_message(&mut self, message: RoomMessage) {
        self.history.push(message);
    }

    /// Check whether the username is currently a member
    pub fn has_member(&self, username: &Username) -> bool {
        self.members.iter().any(|m| m == username)
    }
}

/// Key addressing the conversation between two users, independent of
/// direction: the key for (A, B) and (B, A) is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectMessageKey(Username, Username);

impl DirectMessageKey {
    /// Build the unordered pair key for two participants
    pub fn new(a: &Username, b: &Username) -> Self {
        if a.as_str() <= b.as_str() {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

/// Represents a private message between two users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateMessage {
    /// Recipient username
    pub to: Username,
    /// Sender username
    pub from: Username,
    /// Message text
    pub text: MessageText,
}

impl PrivateMessage {
    /// Create a new private message
    pub fn new(to: Username, from: Username, text: MessageText) -> Self {
        Self { to, from, text }
    }

    /// The unordered pair key this message is stored under
    pub fn key(&self) -> DirectMessageKey {
        DirectMessageKey::new(&self.from, &self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn room_name(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn text(body: &str) -> MessageText {
        MessageText::new(body.to_string()).unwrap()
    }

    #[test]
    fn test_history_buffer_keeps_insertion_order() {
        // テスト項目: 履歴バッファは挿入順を保持する
        // given (前提条件):
        let mut buffer = HistoryBuffer::new();

        // when (操作):
        buffer.push(1);
        buffer.push(2);
        buffer.push(3);

        // then (期待する結果):
        assert_eq!(buffer.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_history_buffer_evicts_oldest_entry() {
        // テスト項目: 容量を超えると最古のエントリが追い出される
        // given (前提条件):
        let mut buffer = HistoryBuffer::new();
        for i in 1..=HISTORY_CAPACITY {
            buffer.push(i);
        }
        assert_eq!(buffer.len(), HISTORY_CAPACITY);

        // when (操作): 11 件目を追加する
        buffer.push(HISTORY_CAPACITY + 1);

        // then (期待する結果): 1 件目が消え、2〜11 件目が順序どおり残る
        assert_eq!(buffer.len(), HISTORY_CAPACITY);
        let expected: Vec<usize> = (2..=HISTORY_CAPACITY + 1).collect();
        assert_eq!(buffer.to_vec(), expected);
    }

    #[test]
    fn test_room_remove_member_first_occurrence_only() {
        // テスト項目: remove_member は最初に一致したメンバーのみ削除する
        // given (前提条件):
        let mut room = Room::new(room_name("general"), Timestamp::new(0));
        room.add_member(username("alice"));
        room.add_member(username("bob"));
        room.add_member(username("alice"));

        // when (操作):
        room.remove_member(&username("alice"));

        // then (期待する結果):
        assert_eq!(room.members, vec![username("bob"), username("alice")]);
    }

    #[test]
    fn test_room_remove_unknown_member_is_noop() {
        // テスト項目: 存在しないメンバーの削除は何もしない
        // given (前提条件):
        let mut room = Room::new(room_name("general"), Timestamp::new(0));
        room.add_member(username("alice"));

        // when (操作):
        room.remove_member(&username("bob"));

        // then (期待する結果):
        assert_eq!(room.members, vec![username("alice")]);
    }

    #[test]
    fn test_room_record_message_is_bounded() {
        // テスト項目: ルーム履歴は上限を超えるとスライドする
        // given (前提条件):
        let mut room = Room::new(room_name("general"), Timestamp::new(0));
        room.record_message(RoomMessage::system_joined(
            room_name("general"),
            &username("alice"),
        ));

        // when (操作): 上限いっぱいまでユーザメッセージを追加する
        for i in 1..=HISTORY_CAPACITY {
            room.record_message(RoomMessage::user(
                room_name("general"),
                username("alice"),
                text(&format!("message {i}")),
            ));
        }

        // then (期待する結果): 参加通知が追い出され、ユーザメッセージのみ残る
        assert_eq!(room.history.len(), HISTORY_CAPACITY);
        let first = room.history.iter().next().unwrap();
        assert_eq!(first.text.as_str(), "message 1");
        assert_eq!(first.author, Author::User(username("alice")));
    }

    #[test]
    fn test_system_join_notice_text() {
        // テスト項目: 参加通知は System 名義で定型文になる
        // when (操作):
        let notice = RoomMessage::system_joined(room_name("general"), &username("alice"));

        // then (期待する結果):
        assert_eq!(notice.author, Author::System);
        assert_eq!(notice.author.as_str(), "System");
        assert_eq!(notice.text.as_str(), "alice has joined the room.");
    }

    #[test]
    fn test_system_leave_notice_text() {
        // テスト項目: 退出通知は System 名義で定型文になる
        // when (操作):
        let notice = RoomMessage::system_left(room_name("general"), &username("alice"));

        // then (期待する結果):
        assert_eq!(notice.author, Author::System);
        assert_eq!(notice.text.as_str(), "alice has left the room.");
    }

    #[test]
    fn test_direct_message_key_is_symmetric() {
        // テスト項目: (A, B) と (B, A) のキーは同一になる
        // given (前提条件):
        let alice = username("alice");
        let bob = username("bob");

        // when (操作):
        let key_ab = DirectMessageKey::new(&alice, &bob);
        let key_ba = DirectMessageKey::new(&bob, &alice);

        // then (期待する結果):
        assert_eq!(key_ab, key_ba);
    }

    #[test]
    fn test_private_message_key_matches_pair_key() {
        // テスト項目: メッセージのキーは参加者ペアのキーと一致する
        // given (前提条件):
        let message = PrivateMessage::new(username("bob"), username("alice"), text("hi"));

        // then (期待する結果):
        assert_eq!(
            message.key(),
            DirectMessageKey::new(&username("alice"), &username("bob"))
        );
    }
}
