//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層の Store を操作し、送出すべき
//! Outbound イベントの列を返します（実際の送信は UI 層が行います）。

pub mod available_users;
pub mod disconnect;
pub mod error;
pub mod fetch_history;
pub mod join_room;
pub mod leave_room;
pub mod outbound;
pub mod private_message;
pub mod register_user;
pub mod send_message;
pub mod typing;

pub use available_users::AvailableUsersUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{JoinError, LeaveError, RegisterError};
pub use fetch_history::FetchHistoryUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use outbound::{Outbound, Target};
pub use private_message::SendPrivateMessageUseCase;
pub use register_user::RegisterUserUseCase;
pub use send_message::SendMessageUseCase;
pub use typing::TypingUseCase;
