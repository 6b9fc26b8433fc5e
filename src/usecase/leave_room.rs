//! UseCase: ルーム退出処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MembershipIndex, RoomDirectory, RoomName, Username},
    infrastructure::dto::websocket::ServerEvent,
};

use super::{error::LeaveError, outbound::Outbound};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Room Directory（ルームのメンバーと履歴）
    rooms: Arc<dyn RoomDirectory>,
    /// Membership Index（接続から参加中ルームへの逆参照）
    membership: Arc<dyn MembershipIndex>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomDirectory>, membership: Arc<dyn MembershipIndex>) -> Self {
        Self { rooms, membership }
    }

    /// ルーム退出を実行
    ///
    /// 退出者自身は通知対象に含まれません（索引から外した後に
    /// 通知対象を解決するため）。
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Outbound>)` - 退出通知と更新済みメンバー一覧
    /// * `Err(LeaveError)` - ルームが存在しない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: RoomName,
        user: Username,
    ) -> Result<Vec<Outbound>, LeaveError> {
        self.rooms
            .leave(&room, &user)
            .await
            .map_err(|_| LeaveError::NotInRoom(room.as_str().to_string()))?;
        self.membership.record_leave(connection_id, &room).await;

        let members = self.rooms.members_of(&room).await;
        let targets = self.membership.connections_in(&room).await;

        Ok(vec![
            Outbound::many(
                targets.clone(),
                ServerEvent::UserLeft {
                    user: user.as_str().to_string(),
                    room: room.as_str().to_string(),
                },
            ),
            Outbound::many(targets, ServerEvent::available_users(&members)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Timestamp,
        infrastructure::repository::{InMemoryMembershipIndex, InMemoryRoomDirectory},
        usecase::outbound::Target,
    };

    fn connection(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    async fn create_joined_usecase() -> (
        LeaveRoomUseCase,
        Arc<InMemoryRoomDirectory>,
        Arc<InMemoryMembershipIndex>,
    ) {
        let rooms = Arc::new(InMemoryRoomDirectory::new());
        let membership = Arc::new(InMemoryMembershipIndex::new());

        // alice と bob が general に参加している
        membership
            .record_join(connection("c1"), room("general"))
            .await;
        rooms
            .join(&room("general"), username("alice"), Timestamp::new(0))
            .await;
        membership
            .record_join(connection("c2"), room("general"))
            .await;
        rooms
            .join(&room("general"), username("bob"), Timestamp::new(0))
            .await;

        (
            LeaveRoomUseCase::new(rooms.clone(), membership.clone()),
            rooms,
            membership,
        )
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_members_only() {
        // テスト項目: 退出通知は残りのメンバーだけに送られる
        // given (前提条件):
        let (usecase, rooms, membership) = create_joined_usecase().await;

        // when (操作): alice が退出する
        let result = usecase
            .execute(&connection("c1"), room("general"), username("alice"))
            .await;

        // then (期待する結果):
        let outbounds = result.unwrap();
        assert_eq!(outbounds.len(), 2);
        assert_eq!(outbounds[0].target, Target::Many(vec![connection("c2")]));
        assert_eq!(
            outbounds[0].event,
            ServerEvent::UserLeft {
                user: "alice".to_string(),
                room: "general".to_string(),
            }
        );
        assert_eq!(
            outbounds[1].event,
            ServerEvent::AvailableUsers(vec!["bob".to_string()])
        );

        // 状態も更新されている
        assert_eq!(
            rooms.members_of(&room("general")).await,
            vec![username("bob")]
        );
        assert!(membership.rooms_of(&connection("c1")).await.is_empty());

        // 退出通知が履歴に残っている
        let history = rooms.history_of(&room("general")).await;
        assert_eq!(
            history.last().unwrap().text.as_str(),
            "alice has left the room."
        );
    }

    #[tokio::test]
    async fn test_leave_unknown_room_fails() {
        // テスト項目: 存在しないルームからの退出はエラーになる
        // given (前提条件):
        let (usecase, _rooms, _membership) = create_joined_usecase().await;

        // when (操作):
        let result = usecase
            .execute(&connection("c1"), room("ghost"), username("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(LeaveError::NotInRoom("ghost".to_string())));
        assert_eq!(
            result.unwrap_err().to_string(),
            "You are not in the room ghost."
        );
    }
}
