//! WebSocket connection handlers.
//!
//! Each connection gets an unbounded channel; a recv task parses inbound
//! envelopes and dispatches them to the use case layer, a send task pumps
//! queued outbound events into the socket. When either task ends the
//! disconnect cascade runs and its notices are fanned out to the remaining
//! connections.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    common::time::get_jst_timestamp,
    domain::{ConnectionId, ConnectionIdFactory, MessageText, RoomName, Username, ValueObjectError},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::{AppState, ClientInfo},
    usecase::{
        AvailableUsersUseCase, DisconnectUseCase, FetchHistoryUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, Outbound, RegisterError, RegisterUserUseCase, SendMessageUseCase,
        SendPrivateMessageUseCase, Target, TypingUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let connection_id =
        ConnectionIdFactory::generate().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!("Client connected: {}", connection_id);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this client to receive events
    let (tx, mut rx) = mpsc::unbounded_channel();
    {
        let mut clients = state.connected_clients.lock().await;
        clients.insert(
            connection_id.clone(),
            ClientInfo {
                sender: tx,
                connected_at: get_jst_timestamp(),
            },
        );
    }

    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let outbounds = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => dispatch(&state_clone, &connection_id_clone, event).await,
                        Err(e) => {
                            tracing::warn!(
                                "Failed to parse event from '{}': {}",
                                connection_id_clone,
                                e
                            );
                            vec![Outbound::one(
                                connection_id_clone.clone(),
                                ServerEvent::Error("Malformed event payload.".to_string()),
                            )]
                        }
                    };
                    deliver(&state_clone, outbounds).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to pump queued outbound events into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Drop this connection's sender before fanning out the leave notices
    {
        let mut clients = state.connected_clients.lock().await;
        clients.remove(&connection_id);
    }

    let disconnect_usecase = DisconnectUseCase::new(
        state.identity.clone(),
        state.rooms.clone(),
        state.membership.clone(),
    );
    let outbounds = disconnect_usecase.execute(&connection_id).await;
    deliver(&state, outbounds).await;
    tracing::info!("Client disconnected: {}", connection_id);
}

/// Route one inbound event to its use case and collect the outbound events.
///
/// Malformed payloads are rejected per event with an error unicast; they
/// never affect other connections or the stores.
async fn dispatch(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    event: ClientEvent,
) -> Vec<Outbound> {
    match event {
        ClientEvent::RegisterUser(username) => {
            let username = match Username::try_from(username) {
                Ok(username) => username,
                Err(e) => return reject(connection_id, e),
            };

            let usecase = RegisterUserUseCase::new(state.identity.clone());
            match usecase.execute(connection_id, username).await {
                Ok(outbounds) => outbounds,
                Err(RegisterError::UsernameTaken(name)) => {
                    tracing::warn!(
                        "Username '{}' is already taken. Rejecting registration from '{}'",
                        name,
                        connection_id
                    );
                    vec![Outbound::one(
                        connection_id.clone(),
                        ServerEvent::UsernameTaken,
                    )]
                }
            }
        }

        ClientEvent::JoinRoom { room, user } => {
            let (room, user) = match (RoomName::try_from(room), Username::try_from(user)) {
                (Ok(room), Ok(user)) => (room, user),
                (Err(e), _) | (_, Err(e)) => return reject(connection_id, e),
            };

            let usecase = JoinRoomUseCase::new(state.rooms.clone(), state.membership.clone());
            match usecase.execute(connection_id, room, user).await {
                Ok(outbounds) => outbounds,
                Err(e) => vec![Outbound::one(
                    connection_id.clone(),
                    ServerEvent::Error(e.to_string()),
                )],
            }
        }

        ClientEvent::LeaveRoom { room, user } => {
            let (room, user) = match (RoomName::try_from(room), Username::try_from(user)) {
                (Ok(room), Ok(user)) => (room, user),
                (Err(e), _) | (_, Err(e)) => return reject(connection_id, e),
            };

            let usecase = LeaveRoomUseCase::new(state.rooms.clone(), state.membership.clone());
            match usecase.execute(connection_id, room, user).await {
                Ok(outbounds) => outbounds,
                Err(e) => vec![Outbound::one(
                    connection_id.clone(),
                    ServerEvent::Error(e.to_string()),
                )],
            }
        }

        ClientEvent::Message { room, user, text } => {
            let (room, user, text) = match (
                RoomName::try_from(room),
                Username::try_from(user),
                MessageText::try_from(text),
            ) {
                (Ok(room), Ok(user), Ok(text)) => (room, user, text),
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                    return reject(connection_id, e);
                }
            };

            let usecase = SendMessageUseCase::new(state.rooms.clone(), state.membership.clone());
            usecase.execute(room, user, text).await
        }

        ClientEvent::PrivateMessage { to, from, text } => {
            let (to, from, text) = match (
                Username::try_from(to),
                Username::try_from(from),
                MessageText::try_from(text),
            ) {
                (Ok(to), Ok(from), Ok(text)) => (to, from, text),
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                    return reject(connection_id, e);
                }
            };

            let usecase = SendPrivateMessageUseCase::new(
                state.identity.clone(),
                state.direct_messages.clone(),
            );
            usecase.execute(connection_id, to, from, text).await
        }

        ClientEvent::Typing { room, user } => {
            let (room, user) = match (RoomName::try_from(room), Username::try_from(user)) {
                (Ok(room), Ok(user)) => (room, user),
                (Err(e), _) | (_, Err(e)) => return reject(connection_id, e),
            };

            let usecase = TypingUseCase::new(state.identity.clone(), state.membership.clone());
            usecase.execute_room(connection_id, room, user).await
        }

        ClientEvent::PrivateTyping { to, from } => {
            let (to, from) = match (Username::try_from(to), Username::try_from(from)) {
                (Ok(to), Ok(from)) => (to, from),
                (Err(e), _) | (_, Err(e)) => return reject(connection_id, e),
            };

            let usecase = TypingUseCase::new(state.identity.clone(), state.membership.clone());
            usecase.execute_private(&to, &from).await
        }

        ClientEvent::GetAvailableUsers => {
            let usecase = AvailableUsersUseCase::new(
                state.identity.clone(),
                state.rooms.clone(),
                state.membership.clone(),
            );
            usecase.execute(connection_id).await
        }

        ClientEvent::GetRoomMessageHistory(room) => {
            let room = match RoomName::try_from(room) {
                Ok(room) => room,
                Err(e) => return reject(connection_id, e),
            };

            let usecase =
                FetchHistoryUseCase::new(state.rooms.clone(), state.direct_messages.clone());
            usecase.room_history(connection_id, &room).await
        }

        ClientEvent::GetPrivateMessageHistory { user, to } => {
            let (user, to) = match (Username::try_from(user), Username::try_from(to)) {
                (Ok(user), Ok(to)) => (user, to),
                (Err(e), _) | (_, Err(e)) => return reject(connection_id, e),
            };

            let usecase =
                FetchHistoryUseCase::new(state.rooms.clone(), state.direct_messages.clone());
            usecase.private_history(connection_id, &user, &to).await
        }
    }
}

fn reject(connection_id: &ConnectionId, error: ValueObjectError) -> Vec<Outbound> {
    tracing::warn!("Rejected payload from '{}': {}", connection_id, error);
    vec![Outbound::one(
        connection_id.clone(),
        ServerEvent::Error(format!("Invalid payload: {error}")),
    )]
}

/// Resolve targets to live senders and push the serialized events.
///
/// A target that is no longer connected is silently skipped; a send into a
/// closed channel is logged and dropped (no retries).
async fn deliver(state: &Arc<AppState>, outbounds: Vec<Outbound>) {
    if outbounds.is_empty() {
        return;
    }

    let clients = state.connected_clients.lock().await;
    for outbound in outbounds {
        let payload = match serde_json::to_string(&outbound.event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize outbound event: {}", e);
                continue;
            }
        };

        match outbound.target {
            Target::One(id) => send_to(&clients, &id, &payload),
            Target::Many(ids) => {
                for id in ids {
                    send_to(&clients, &id, &payload);
                }
            }
            Target::All => {
                for (id, client_info) in clients.iter() {
                    if client_info.sender.send(payload.clone()).is_err() {
                        tracing::warn!("Failed to send event to client '{}'", id);
                    }
                }
            }
        }
    }
}

fn send_to(clients: &HashMap<ConnectionId, ClientInfo>, id: &ConnectionId, payload: &str) {
    if let Some(client_info) = clients.get(id)
        && client_info.sender.send(payload.to_string()).is_err()
    {
        tracing::warn!("Failed to send event to client '{}'", id);
    }
}
