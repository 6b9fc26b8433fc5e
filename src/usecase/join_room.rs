//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルーム参加処理（重複参加チェック、Outbound イベント列の構築）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：同じ接続の重複参加を防ぐ
//! - 参加者への履歴送信と、ルーム内への通知が正しい順序で並ぶことを保証
//! - ルームの遅延生成と Membership Index への記録を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの 2 人目の参加
//! - 異常系：同じ接続による重複参加

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MembershipIndex, RoomDirectory, RoomName, Timestamp, Username},
    infrastructure::dto::websocket::{RoomMessageDto, ServerEvent},
};

use super::{error::JoinError, outbound::Outbound};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Room Directory（ルームのメンバーと履歴）
    rooms: Arc<dyn RoomDirectory>,
    /// Membership Index（接続から参加中ルームへの逆参照）
    membership: Arc<dyn MembershipIndex>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomDirectory>, membership: Arc<dyn MembershipIndex>) -> Self {
        Self { rooms, membership }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Outbound>)` - 参加通知・履歴・メンバー一覧・参加確認の 4 イベント
    /// * `Err(JoinError)` - 既に同じルームに参加している
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: RoomName,
        user: Username,
    ) -> Result<Vec<Outbound>, JoinError> {
        use crate::common::time::get_jst_timestamp;

        // 1. 重複参加チェック
        if self.membership.is_member(connection_id, &room).await {
            return Err(JoinError::AlreadyJoined(room.as_str().to_string()));
        }

        // 2. 索引とディレクトリを更新（ルームは必要なら遅延生成される）
        self.membership
            .record_join(connection_id.clone(), room.clone())
            .await;
        let history = self
            .rooms
            .join(&room, user.clone(), Timestamp::new(get_jst_timestamp()))
            .await;
        let members = self.rooms.members_of(&room).await;
        let targets = self.membership.connections_in(&room).await;

        // 3. 参加通知 → 履歴 → メンバー一覧 → 参加確認 の順で送出する
        Ok(vec![
            Outbound::many(
                targets.clone(),
                ServerEvent::UserJoined {
                    user: user.as_str().to_string(),
                    room: room.as_str().to_string(),
                },
            ),
            Outbound::one(
                connection_id.clone(),
                ServerEvent::MessageHistory(history.iter().map(RoomMessageDto::from).collect()),
            ),
            Outbound::many(targets, ServerEvent::available_users(&members)),
            Outbound::one(
                connection_id.clone(),
                ServerEvent::JoinConfirmation(format!("You have joined the room {room}.")),
            ),
        ])
    }
}
