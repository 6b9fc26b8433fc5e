//! Domain layer for the presence coordinator.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{
    Author, DirectMessageKey, HISTORY_CAPACITY, HistoryBuffer, PrivateMessage, Room, RoomMessage,
};
pub use error::{RegistryError, RoomError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{DirectMessageStore, IdentityRegistry, MembershipIndex, RoomDirectory};
pub use value_object::{ConnectionId, MessageText, RoomName, Timestamp, Username};
