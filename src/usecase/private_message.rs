//! UseCase: プライベートメッセージ送信処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, DirectMessageStore, IdentityRegistry, MessageText, PrivateMessage, Username},
    infrastructure::dto::websocket::{PrivateMessageDto, ServerEvent},
};

use super::outbound::Outbound;

/// プライベートメッセージ送信のユースケース
pub struct SendPrivateMessageUseCase {
    /// Identity Registry（宛先ユーザの接続解決に使用）
    identity: Arc<dyn IdentityRegistry>,
    /// Direct Message Store（ペアごとの有界履歴）
    direct_messages: Arc<dyn DirectMessageStore>,
}

impl SendPrivateMessageUseCase {
    /// 新しい SendPrivateMessageUseCase を作成
    pub fn new(
        identity: Arc<dyn IdentityRegistry>,
        direct_messages: Arc<dyn DirectMessageStore>,
    ) -> Self {
        Self {
            identity,
            direct_messages,
        }
    }

    /// プライベートメッセージ送信を実行
    ///
    /// メッセージは宛先がオフラインでも履歴に保存されます。ライブ配送は
    /// 宛先の接続が解決できた場合のみ行われ、送信者には常にエコーが
    /// 返ります。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        to: Username,
        from: Username,
        text: MessageText,
    ) -> Vec<Outbound> {
        let message = PrivateMessage::new(to.clone(), from, text);
        let dto = PrivateMessageDto::from(&message);
        self.direct_messages.post(message).await;

        let mut outbounds = Vec::new();
        if let Some(recipient) = self.identity.connection_of(&to).await {
            outbounds.push(Outbound::one(
                recipient,
                ServerEvent::PrivateMessage(dto.clone()),
            ));
        }
        outbounds.push(Outbound::one(
            connection_id.clone(),
            ServerEvent::PrivateMessage(dto),
        ));
        outbounds
    }
}
