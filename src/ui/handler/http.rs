//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    common::time::timestamp_to_jst_rfc3339,
    infrastructure::dto::{
        http::{RoomDetailDto, RoomSummaryDto},
        websocket::RoomMessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.rooms.all_rooms().await;

    let mut summaries: Vec<RoomSummaryDto> = rooms
        .iter()
        .map(|room| RoomSummaryDto {
            name: room.name.as_str().to_string(),
            members: room.members.iter().map(|m| m.as_str().to_string()).collect(),
            message_count: room.history.len(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        })
        .collect();

    // Sort by name for consistent ordering
    summaries.sort_by(|a, b| a.name.cmp(&b.name));

    Json(summaries)
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let rooms = state.rooms.all_rooms().await;
    let room = rooms
        .iter()
        .find(|room| room.name.as_str() == room_name)
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(RoomDetailDto {
        name: room.name.as_str().to_string(),
        members: room.members.iter().map(|m| m.as_str().to_string()).collect(),
        history: room.history.iter().map(RoomMessageDto::from).collect(),
        created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
    }))
}
