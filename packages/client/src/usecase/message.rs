//! UseCase: メッセージ送信
//!
//! 送信したメッセージはその場では表示せず、サーバーから `new-message` として
//! 届いたときにストアへ追加される。

use std::sync::Arc;

use crate::{
    domain::{MessageContent, SocketEmitter},
    error::ClientError,
};

use super::SharedStore;

/// メッセージ送信のユースケース
pub struct MessageUseCase {
    emitter: Arc<dyn SocketEmitter>,
    store: SharedStore,
}

impl MessageUseCase {
    pub fn new(emitter: Arc<dyn SocketEmitter>, store: SharedStore) -> Self {
        Self { emitter, store }
    }

    /// アクティブなルームにメッセージを送信する
    pub async fn send(&self, content: &MessageContent) -> Result<(), ClientError> {
        let room_id = {
            let store = self.store.lock().await;
            store.my_id().ok_or(ClientError::NotAuthenticated)?;
            store
                .active()
                .map(|r| r.id.clone())
                .ok_or(ClientError::NoActiveRoom)?
        };
        self.emitter.send_message(&room_id, content)
    }
}
