//! インメモリ Identity Registry 実装
//!
//! 接続 ID とユーザ名の双方向対応を 1 本の Mutex の下で保持します。
//! 一意性チェックと束縛が同一ロック内で行われるため、同じユーザ名の
//! 同時登録が両方成功することはありません。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, IdentityRegistry, RegistryError, Username};

/// インメモリ Identity Registry 実装
///
/// 束縛順を保持するため Vec を使用します（ユーザ一覧のブロードキャストは
/// 登録順で並びます）。
pub struct InMemoryIdentityRegistry {
    bindings: Mutex<Vec<(ConnectionId, Username)>>,
}

impl InMemoryIdentityRegistry {
    /// 新しい InMemoryIdentityRegistry を作成
    pub fn new() -> Self {
        Self {
            bindings: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryIdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRegistry for InMemoryIdentityRegistry {
    async fn register(
        &self,
        connection_id: ConnectionId,
        username: Username,
    ) -> Result<(), RegistryError> {
        let mut bindings = self.bindings.lock().await;

        let taken_by_other = bindings
            .iter()
            .any(|(id, name)| name == &username && id != &connection_id);
        if taken_by_other {
            return Err(RegistryError::UsernameTaken(username.into_string()));
        }

        match bindings.iter().position(|(id, _)| id == &connection_id) {
            // 再登録は既存の束縛を差し替える（束縛順は維持）
            Some(index) => bindings[index].1 = username,
            None => bindings.push((connection_id, username)),
        }
        Ok(())
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Username> {
        let mut bindings = self.bindings.lock().await;
        let position = bindings.iter().position(|(id, _)| id == connection_id)?;
        Some(bindings.remove(position).1)
    }

    async fn username_of(&self, connection_id: &ConnectionId) -> Option<Username> {
        let bindings = self.bindings.lock().await;
        bindings
            .iter()
            .find(|(id, _)| id == connection_id)
            .map(|(_, name)| name.clone())
    }

    async fn connection_of(&self, username: &Username) -> Option<ConnectionId> {
        let bindings = self.bindings.lock().await;
        bindings
            .iter()
            .find(|(_, name)| name == username)
            .map(|(id, _)| id.clone())
    }

    async fn all_usernames(&self) -> Vec<Username> {
        let bindings = self.bindings.lock().await;
        bindings.iter().map(|(_, name)| name.clone()).collect()
    }
}
