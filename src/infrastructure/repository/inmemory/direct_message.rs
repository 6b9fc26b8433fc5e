//! インメモリ Direct Message Store 実装
//!
//! 順序なしユーザペアをキーとした HashMap に、ペアごとの有界履歴を
//! 保持します。バッファは最初のメッセージで生成され、以後削除されません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DirectMessageKey, DirectMessageStore, HistoryBuffer, PrivateMessage, Username,
};

/// インメモリ Direct Message Store 実装
pub struct InMemoryDirectMessageStore {
    conversations: Mutex<HashMap<DirectMessageKey, HistoryBuffer<PrivateMessage>>>,
}

impl InMemoryDirectMessageStore {
    /// 新しい InMemoryDirectMessageStore を作成
    pub fn new() -> Self {
        Self {
            conversations: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDirectMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectMessageStore for InMemoryDirectMessageStore {
    async fn post(&self, message: PrivateMessage) {
        let mut conversations = self.conversations.lock().await;
        conversations
            .entry(message.key())
            .or_default()
            .push(message);
    }

    async fn history_of(&self, a: &Username, b: &Username) -> Vec<PrivateMessage> {
        let conversations = self.conversations.lock().await;
        conversations
            .get(&DirectMessageKey::new(a, b))
            .map(|buffer| buffer.to_vec())
            .unwrap_or_default()
    }
}
