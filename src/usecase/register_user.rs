//! UseCase: ユーザ登録処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, IdentityRegistry, RegistryError, Username},
    infrastructure::dto::websocket::ServerEvent,
};

use super::{error::RegisterError, outbound::Outbound};

/// ユーザ登録のユースケース
pub struct RegisterUserUseCase {
    /// Identity Registry（接続とユーザ名の対応）
    identity: Arc<dyn IdentityRegistry>,
}

impl RegisterUserUseCase {
    /// 新しい RegisterUserUseCase を作成
    pub fn new(identity: Arc<dyn IdentityRegistry>) -> Self {
        Self { identity }
    }

    /// ユーザ登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Outbound>)` - 全接続へ配る更新済みユーザ一覧
    /// * `Err(RegisterError)` - 別の接続がユーザ名を保持している
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        username: Username,
    ) -> Result<Vec<Outbound>, RegisterError> {
        self.identity
            .register(connection_id.clone(), username)
            .await
            .map_err(|error| match error {
                RegistryError::UsernameTaken(name) => RegisterError::UsernameTaken(name),
            })?;

        let usernames = self.identity.all_usernames().await;
        Ok(vec![Outbound::all(ServerEvent::available_users(&usernames))])
    }
}
