//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::RoomMessageDto;

/// Room summary for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub members: Vec<String>,
    pub message_count: usize,
    pub created_at: String, // ISO 8601
}

/// Room detail for the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub members: Vec<String>,
    pub history: Vec<RoomMessageDto>,
    pub created_at: String, // ISO 8601
}
