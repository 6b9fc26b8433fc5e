//! UseCase: ルームメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージ送信処理（履歴への追記と追い出し、ルーム内への配送対象選定）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：メッセージがルーム参加中の接続全員に配られる
//! - 有界履歴への追記が正しく行われることを確認
//! - 存在しないルームへの投稿が静かに無視されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加中ルームへの投稿
//! - エッジケース：一度も生成されていないルームへの投稿（無視）
//! - エッジケース：参加していないルームへの投稿（ルームが存在すれば許容）

use std::sync::Arc;

use crate::{
    domain::{MembershipIndex, MessageText, RoomDirectory, RoomMessage, RoomName, Username},
    infrastructure::dto::websocket::{RoomMessageDto, ServerEvent},
};

use super::outbound::Outbound;

/// ルームメッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Room Directory（ルームのメンバーと履歴）
    rooms: Arc<dyn RoomDirectory>,
    /// Membership Index（配送対象の解決に使用）
    membership: Arc<dyn MembershipIndex>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(rooms: Arc<dyn RoomDirectory>, membership: Arc<dyn MembershipIndex>) -> Self {
        Self { rooms, membership }
    }

    /// メッセージ送信を実行
    ///
    /// 送信者がルームに参加しているかは検査しません（ルームが存在すれば
    /// 投稿は受理されます）。一度も生成されていないルームへの投稿は
    /// 何もせずに終わります。
    pub async fn execute(
        &self,
        room: RoomName,
        user: Username,
        text: MessageText,
    ) -> Vec<Outbound> {
        let message = RoomMessage::user(room.clone(), user, text);
        let dto = RoomMessageDto::from(&message);

        if self.rooms.post_message(message).await.is_err() {
            return Vec::new();
        }

        let targets = self.membership.connections_in(&room).await;
        vec![Outbound::many(targets, ServerEvent::Message(dto))]
    }
}
