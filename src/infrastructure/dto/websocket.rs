//! WebSocket event DTOs.
//!
//! Every frame on the wire is an envelope `{"event": <name>, "data": <payload>}`.
//! The event names are the wire vocabulary the original clients speak and must
//! be preserved for compatibility; the adjacently tagged enums below are the
//! dispatch table mapping each name to its payload shape.

use serde::{Deserialize, Serialize};

use crate::domain::{PrivateMessage, RoomMessage, Username};

/// A room message as it appears on the wire.
///
/// Synthetic join/leave notices carry `"System"` as the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMessageDto {
    pub room: String,
    pub user: String,
    pub text: String,
}

impl From<&RoomMessage> for RoomMessageDto {
    fn from(message: &RoomMessage) -> Self {
        Self {
            room: message.room.as_str().to_string(),
            user: message.author.as_str().to_string(),
            text: message.text.as_str().to_string(),
        }
    }
}

/// A private message as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessageDto {
    pub to: String,
    pub from: String,
    pub text: String,
}

impl From<&PrivateMessage> for PrivateMessageDto {
    fn from(message: &PrivateMessage) -> Self {
        Self {
            to: message.to.as_str().to_string(),
            from: message.from.as_str().to_string(),
            text: message.text.as_str().to_string(),
        }
    }
}

/// Inbound events a client may send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    RegisterUser(String),
    JoinRoom { room: String, user: String },
    LeaveRoom { room: String, user: String },
    Message { room: String, user: String, text: String },
    PrivateMessage { to: String, from: String, text: String },
    Typing { room: String, user: String },
    PrivateTyping { to: String, from: String },
    GetAvailableUsers,
    GetRoomMessageHistory(String),
    GetPrivateMessageHistory { user: String, to: String },
}

/// Outbound events the coordinator may emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UsernameTaken,
    AvailableUsers(Vec<String>),
    UserJoined { user: String, room: String },
    UserLeft { user: String, room: String },
    MessageHistory(Vec<RoomMessageDto>),
    JoinConfirmation(String),
    Error(String),
    Message(RoomMessageDto),
    PrivateMessage(PrivateMessageDto),
    PrivateMessageHistory(Vec<PrivateMessageDto>),
    Typing { room: String, user: String },
    PrivateTyping(String),
}

impl ServerEvent {
    /// Build an availableUsers event from domain usernames
    pub fn available_users(usernames: &[Username]) -> Self {
        Self::AvailableUsers(usernames.iter().map(|u| u.as_str().to_string()).collect())
    }
}
