//! Real-time presence and room-messaging coordinator.
//!
//! This library tracks which users are online, which rooms they belong to,
//! routes chat and typing events to the right subset of connections, and
//! retains a short bounded history per conversation (room and private pair).

pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run_server;
