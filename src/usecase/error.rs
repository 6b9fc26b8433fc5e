//! UseCase 層のエラー定義
//!
//! 人間可読のエラーメッセージはそのままワイヤ上の `error` イベントの
//! 本文として使われます。

use thiserror::Error;

/// ユーザ登録のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// 別の接続が同じユーザ名を保持している
    #[error("Username {0} is already taken.")]
    UsernameTaken(String),
}

/// ルーム参加のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// この接続は既に同じルームに参加している
    #[error("You have already joined the room {0}.")]
    AlreadyJoined(String),
}

/// ルーム退出のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeaveError {
    /// ルームが存在しない（一度も参加されていない）
    #[error("You are not in the room {0}.")]
    NotInRoom(String),
}
