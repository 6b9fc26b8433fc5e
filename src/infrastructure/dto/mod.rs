//! Data transfer objects for the HTTP and WebSocket interfaces.

pub mod http;
pub mod websocket;
