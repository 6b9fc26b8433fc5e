//! UseCase: 切断クリーンアップ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 切断時のカスケードクリーンアップ（Identity Registry → Membership
//!   Index → Room Directory）と通知の生成
//!
//! ### なぜこのテストが必要か
//! - 切断したユーザが全ルームのメンバー一覧から外れることを保証
//! - ルームごとの退出通知と、全接続へのユーザ一覧更新が生成されることを確認
//! - 未登録の接続の切断が何も起こさないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ルームに参加中のユーザの切断
//! - エッジケース：登録前の接続の切断（通知なし）

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, IdentityRegistry, MembershipIndex, RoomDirectory},
    infrastructure::dto::websocket::ServerEvent,
};

use super::outbound::Outbound;

/// 切断クリーンアップのユースケース
pub struct DisconnectUseCase {
    /// Identity Registry（ユーザ名の解放）
    identity: Arc<dyn IdentityRegistry>,
    /// Room Directory（各ルームからのメンバー除去）
    rooms: Arc<dyn RoomDirectory>,
    /// Membership Index（参加記録の破棄）
    membership: Arc<dyn MembershipIndex>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(
        identity: Arc<dyn IdentityRegistry>,
        rooms: Arc<dyn RoomDirectory>,
        membership: Arc<dyn MembershipIndex>,
    ) -> Self {
        Self {
            identity,
            rooms,
            membership,
        }
    }

    /// 切断クリーンアップを実行
    ///
    /// 参加していた各ルームからメンバーを外して退出通知とメンバー一覧を
    /// ルーム内へ送り、最後に更新済みユーザ一覧を全接続へ配ります。
    /// 明示的な退出と異なり、履歴への退出 System メッセージは残しません。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<Outbound> {
        let Some(username) = self.identity.unregister(connection_id).await else {
            // 未登録の接続はどの状態にも現れないため、通知は不要
            return Vec::new();
        };

        let joined_rooms = self.membership.clear(connection_id).await;
        let mut outbounds = Vec::new();
        for room in joined_rooms {
            self.rooms.remove_member(&room, &username).await;
            let members = self.rooms.members_of(&room).await;
            let targets = self.membership.connections_in(&room).await;
            outbounds.push(Outbound::many(
                targets.clone(),
                ServerEvent::UserLeft {
                    user: username.as_str().to_string(),
                    room: room.as_str().to_string(),
                },
            ));
            outbounds.push(Outbound::many(targets, ServerEvent::available_users(&members)));
        }

        let remaining = self.identity.all_usernames().await;
        outbounds.push(Outbound::all(ServerEvent::available_users(&remaining)));
        outbounds
    }
}
