//! UseCase: タイピング中通知処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, IdentityRegistry, MembershipIndex, RoomName, Username},
    infrastructure::dto::websocket::ServerEvent,
};

use super::outbound::Outbound;

/// タイピング中通知のユースケース
///
/// 通知は状態を一切変更しません。ルーム向けは送信者以外の参加接続へ、
/// プライベート向けは宛先の接続が解決できた場合のみ届きます。
pub struct TypingUseCase {
    /// Identity Registry（宛先ユーザの接続解決に使用）
    identity: Arc<dyn IdentityRegistry>,
    /// Membership Index（ルーム内の配送対象解決に使用）
    membership: Arc<dyn MembershipIndex>,
}

impl TypingUseCase {
    /// 新しい TypingUseCase を作成
    pub fn new(identity: Arc<dyn IdentityRegistry>, membership: Arc<dyn MembershipIndex>) -> Self {
        Self {
            identity,
            membership,
        }
    }

    /// ルーム内のタイピング中通知を実行（送信者自身は対象外）
    pub async fn execute_room(
        &self,
        connection_id: &ConnectionId,
        room: RoomName,
        user: Username,
    ) -> Vec<Outbound> {
        let targets: Vec<ConnectionId> = self
            .membership
            .connections_in(&room)
            .await
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        vec![Outbound::many(
            targets,
            ServerEvent::Typing {
                room: room.as_str().to_string(),
                user: user.as_str().to_string(),
            },
        )]
    }

    /// プライベートのタイピング中通知を実行
    pub async fn execute_private(&self, to: &Username, from: &Username) -> Vec<Outbound> {
        match self.identity.connection_of(to).await {
            Some(recipient) => vec![Outbound::one(
                recipient,
                ServerEvent::PrivateTyping(from.as_str().to_string()),
            )],
            None => Vec::new(),
        }
    }
}
