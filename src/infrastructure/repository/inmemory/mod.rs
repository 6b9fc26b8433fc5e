//! インメモリ Store 実装
//!
//! HashMap / Vec をインメモリ DB として使用します。プロセス終了とともに
//! 全ての状態は失われます（永続化はスコープ外）。

mod direct_message;
mod identity;
mod membership;
mod room;

pub use direct_message::InMemoryDirectMessageStore;
pub use identity::InMemoryIdentityRegistry;
pub use membership::InMemoryMembershipIndex;
pub use room::InMemoryRoomDirectory;
