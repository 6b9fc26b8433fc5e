//! UseCase: 会話可能ユーザ一覧の構築

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, IdentityRegistry, MembershipIndex, RoomDirectory, Username},
    infrastructure::dto::websocket::ServerEvent,
};

use super::outbound::Outbound;

/// 会話可能ユーザ一覧のユースケース
///
/// 呼び出し元が参加している全ルームのメンバーの和集合から、呼び出し元
/// 自身を除いた一覧を返します。重複は最初の出現のみ残します。
pub struct AvailableUsersUseCase {
    /// Identity Registry（自分自身の除外に使用）
    identity: Arc<dyn IdentityRegistry>,
    /// Room Directory（ルームごとのメンバー一覧）
    rooms: Arc<dyn RoomDirectory>,
    /// Membership Index（参加中ルームの列挙）
    membership: Arc<dyn MembershipIndex>,
}

impl AvailableUsersUseCase {
    /// 新しい AvailableUsersUseCase を作成
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

    /// 一覧を構築して呼び出し元へ返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<Outbound> {
        let joined_rooms = self.membership.rooms_of(connection_id).await;
        let own_username = self.identity.username_of(connection_id).await;

        let mut users: Vec<Username> = Vec::new();
        for room in &joined_rooms {
            for member in self.rooms.members_of(room).await {
                if !users.contains(&member) {
                    users.push(member);
                }
            }
        }
        if let Some(own) = own_username {
            users.retain(|user| user != &own);
        }

        vec![Outbound::one(
            connection_id.clone(),
            ServerEvent::available_users(&users),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomName, Timestamp},
        infrastructure::repository::{
            InMemoryIdentityRegistry, InMemoryMembershipIndex, InMemoryRoomDirectory,
        },
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

    async fn create_usecase() -> AvailableUsersUseCase {
        let identity = Arc::new(InMemoryIdentityRegistry::new());
        let rooms = Arc::new(InMemoryRoomDirectory::new());
        let membership = Arc::new(InMemoryMembershipIndex::new());

        // alice: general / bob: general, random / carol: random
        identity
            .register(connection("c1"), username("alice"))
            .await
            .unwrap();
        identity
            .register(connection("c2"), username("bob"))
            .await
            .unwrap();
        identity
            .register(connection("c3"), username("carol"))
            .await
            .unwrap();

        membership.record_join(connection("c1"), room("general")).await;
        rooms
            .join(&room("general"), username("alice"), Timestamp::new(0))
            .await;
        membership.record_join(connection("c2"), room("general")).await;
        rooms
            .join(&room("general"), username("bob"), Timestamp::new(0))
            .await;
        membership.record_join(connection("c2"), room("random")).await;
        rooms
            .join(&room("random"), username("bob"), Timestamp::new(0))
            .await;
        membership.record_join(connection("c3"), room("random")).await;
        rooms
            .join(&room("random"), username("carol"), Timestamp::new(0))
            .await;

        AvailableUsersUseCase::new(identity, rooms, membership)
    }

    #[tokio::test]
    async fn test_union_across_rooms_excludes_self() {
        // テスト項目: 参加中の全ルームの和集合から自分を除いた一覧が返る
        // given (前提条件):
        let usecase = create_usecase().await;

        // when (操作): bob（general と random に参加）が照会する
        let outbounds = usecase.execute(&connection("c2")).await;

        // then (期待する結果): alice と carol が順序どおり並ぶ
        assert_eq!(outbounds.len(), 1);
        assert_eq!(outbounds[0].target, Target::One(connection("c2")));
        assert_eq!(
            outbounds[0].event,
            ServerEvent::AvailableUsers(vec!["alice".to_string(), "carol".to_string()])
        );
    }

    #[tokio::test]
    async fn test_single_room_member_sees_roommates_only() {
        // テスト項目: 1 ルームのみ参加の場合はそのルームの他メンバーのみ
        // given (前提条件):
        let usecase = create_usecase().await;

        // when (操作): alice が照会する
        let outbounds = usecase.execute(&connection("c1")).await;

        // then (期待する結果):
        assert_eq!(
            outbounds[0].event,
            ServerEvent::AvailableUsers(vec!["bob".to_string()])
        );
    }

    #[tokio::test]
    async fn test_no_rooms_yields_empty_list() {
        // テスト項目: どのルームにも参加していなければ空の一覧が返る
        // given (前提条件):
        let usecase = create_usecase().await;

        // when (操作): どこにも参加していない接続が照会する
        let outbounds = usecase.execute(&connection("c9")).await;

        // then (期待する結果):
        assert_eq!(
            outbounds[0].event,
            ServerEvent::AvailableUsers(Vec::new())
        );
    }
}
