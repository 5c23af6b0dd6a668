//! UseCase 層
//!
//! フォーム入力・コマンドを REST 呼び出し、ソケット送信、ストア更新に変換します。
//! 各ユースケースは trait（`ChatApi`, `SocketEmitter`, `TokenStore`）にのみ依存します。

mod auth;
mod member;
mod message;
mod room;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    domain::{AuthToken, TokenStore},
    error::ClientError,
    store::ChatStore,
};

pub use auth::AuthUseCase;
pub use member::MemberUseCase;
pub use message::MessageUseCase;
pub use room::RoomUseCase;

/// Store shared between the socket reader and the use cases
pub type SharedStore = Arc<Mutex<ChatStore>>;

/// Stored token, or `NotAuthenticated` when logged out
pub(crate) fn require_token(tokens: &dyn TokenStore) -> Result<AuthToken, ClientError> {
    tokens.load()?.ok_or(ClientError::NotAuthenticated)
}
