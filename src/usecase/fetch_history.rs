//! UseCase: 履歴照会処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, DirectMessageStore, RoomDirectory, RoomName, Username},
    infrastructure::dto::websocket::{PrivateMessageDto, RoomMessageDto, ServerEvent},
};

use super::outbound::Outbound;

/// 履歴照会のユースケース
///
/// 照会は状態を変更せず、未知のルーム・ペアに対しては空の履歴を返します。
pub struct FetchHistoryUseCase {
    /// Room Directory（ルームごとの有界履歴）
    rooms: Arc<dyn RoomDirectory>,
    /// Direct Message Store（ペアごとの有界履歴）
    direct_messages: Arc<dyn DirectMessageStore>,
}

impl FetchHistoryUseCase {
    /// 新しい FetchHistoryUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomDirectory>,
        direct_messages: Arc<dyn DirectMessageStore>,
    ) -> Self {
        Self {
            rooms,
            direct_messages,
        }
    }

    /// ルーム履歴を照会して呼び出し元へ返す
    pub async fn room_history(
        &self,
        connection_id: &ConnectionId,
        room: &RoomName,
    ) -> Vec<Outbound> {
        let history = self.rooms.history_of(room).await;
        vec![Outbound::one(
            connection_id.clone(),
            ServerEvent::MessageHistory(history.iter().map(RoomMessageDto::from).collect()),
        )]
    }

    /// プライベート履歴を照会して呼び出し元へ返す
    pub async fn private_history(
        &self,
        connection_id: &ConnectionId,
        user: &Username,
        to: &Username,
    ) -> Vec<Outbound> {
        let history = self.direct_messages.history_of(user, to).await;
        vec![Outbound::one(
            connection_id.clone(),
            ServerEvent::PrivateMessageHistory(
                history.iter().map(PrivateMessageDto::from).collect(),
            ),
        )]
    }
}
