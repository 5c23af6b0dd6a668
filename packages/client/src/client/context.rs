//! Wiring of adapters and use cases for one client process.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::{ClientConfig, StorageMode},
    domain::TokenStore,
    infrastructure::{
        api::HttpChatApi,
        socket::ChannelEmitter,
        storage::{FileTokenStore, MemoryTokenStore},
    },
    store::ChatStore,
    usecase::{AuthUseCase, MemberUseCase, MessageUseCase, RoomUseCase, SharedStore},
};

/// Everything the account commands and the chat session need
pub struct ChatContext {
    pub socket_url: String,
    pub store: SharedStore,
    pub emitter: Arc<ChannelEmitter>,
    pub auth: AuthUseCase,
    pub rooms: RoomUseCase,
    pub members: MemberUseCase,
    pub messages: MessageUseCase,
    ephemeral: bool,
}

impl ChatContext {
    pub fn new(config: &ClientConfig) -> Self {
        let api = Arc::new(HttpChatApi::new(config.api_url.clone()));
        let tokens: Arc<dyn TokenStore> = match &config.storage {
            StorageMode::File(path) => Arc::new(FileTokenStore::new(path.clone())),
            StorageMode::Memory => Arc::new(MemoryTokenStore::new()),
        };
        let store: SharedStore = Arc::new(Mutex::new(ChatStore::default()));
        let emitter = Arc::new(ChannelEmitter::new());

        tracing::debug!(
            "Using API {} and socket {} ({:?})",
            config.api_url,
            config.socket_url,
            config.storage
        );

        Self {
            socket_url: config.socket_url.clone(),
            auth: AuthUseCase::new(api.clone(), tokens.clone(), store.clone()),
            rooms: RoomUseCase::new(api, emitter.clone(), tokens, store.clone()),
            members: MemberUseCase::new(emitter.clone(), store.clone()),
            messages: MessageUseCase::new(emitter.clone(), store.clone()),
            store,
            emitter,
            ephemeral: matches!(config.storage, StorageMode::Memory),
        }
    }

    /// The token lives in memory and is gone when the process exits
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }
}
