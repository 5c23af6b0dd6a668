//! UseCase: ルーム管理（一覧取得・入室・作成・名前変更・削除）
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルームを開くとストアのアクティブなルームになり `join-room` が送信される
//! - 異常系：存在しないルーム、管理者でないユーザーによる変更、パスワードの誤り
//! - エッジケース：一覧にない ID を直接指定してルームを開く

use std::sync::Arc;

use crate::{
    domain::{ChatApi, Room, RoomName, SocketEmitter, TokenStore},
    error::ClientError,
};

use super::{SharedStore, require_token};

/// ルーム管理のユースケース
pub struct RoomUseCase {
    api: Arc<dyn ChatApi>,
    emitter: Arc<dyn SocketEmitter>,
    tokens: Arc<dyn TokenStore>,
    store: SharedStore,
}

impl RoomUseCase {
    pub fn new(
        api: Arc<dyn ChatApi>,
        emitter: Arc<dyn SocketEmitter>,
        tokens: Arc<dyn TokenStore>,
        store: SharedStore,
    ) -> Self {
        Self {
            api,
            emitter,
            tokens,
            store,
        }
    }

    /// ルーム一覧を取得してストアを更新する
    pub async fn refresh_rooms(&self) -> Result<Vec<Room>, ClientError> {
        let token = require_token(self.tokens.as_ref())?;
        let rooms = self.api.list_rooms(&token).await?;
        let mut store = self.store.lock().await;
        store.set_rooms(rooms);
        Ok(store.rooms().to_vec())
    }

    /// ルームを開く
    ///
    /// `query` は一覧のルーム ID または名前。一覧にない場合は ID として扱う。
    pub async fn open(&self, query: &str) -> Result<Room, ClientError> {
        let token = require_token(self.tokens.as_ref())?;
        let room_id = {
            let store = self.store.lock().await;
            store
                .find_room(query)
                .map(|r| r.id.clone())
                .unwrap_or_else(|| query.trim().to_string())
        };

        let room = match self.api.get_room(&token, &room_id).await {
            Ok(room) => room,
            Err(ClientError::NotFound(_)) => {
                return Err(ClientError::RoomNotFound(query.to_string()));
            }
            Err(e) => return Err(e),
        };
        self.enter(room).await
    }

    /// ルームを作成して開く
    pub async fn create(&self, name: &RoomName) -> Result<Room, ClientError> {
        let token = require_token(self.tokens.as_ref())?;
        let room = self.api.create_room(&token, name).await?;
        tracing::info!("Room '{}' created ({})", room.name, room.id);
        self.enter(room).await
    }

    async fn enter(&self, room: Room) -> Result<Room, ClientError> {
        self.store.lock().await.open_room(room.clone());
        self.emitter.join_room(&room.id)?;
        tracing::debug!("Joined room {}", room.id);
        Ok(room)
    }

    /// 再接続後にアクティブなルームへ再入室する
    ///
    /// 切断中に届かなかったメッセージを取り込むため、ルームを取得し直してから
    /// `join-room` を送信する。切断中に削除されたルームは閉じる。
    pub async fn rejoin_active(&self) -> Result<Option<Room>, ClientError> {
        let room_id = self.store.lock().await.active().map(|r| r.id.clone());
        let Some(room_id) = room_id else {
            return Ok(None);
        };

        let token = require_token(self.tokens.as_ref())?;
        match self.api.get_room(&token, &room_id).await {
            Ok(room) => {
                tracing::debug!("Rejoining room {}", room_id);
                self.enter(room).await.map(Some)
            }
            Err(ClientError::NotFound(_)) | Err(ClientError::Forbidden(_)) => {
                tracing::info!("Room {} is no longer available", room_id);
                self.store.lock().await.remove_room(&room_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// アクティブなルームの名前を変更する（管理者のみ）
    pub async fn rename(&self, name: &RoomName) -> Result<Room, ClientError> {
        let token = require_token(self.tokens.as_ref())?;
        let room_id = self.admin_room_id().await?;
        let room = self.api.rename_room(&token, &room_id, name).await?;
        self.store.lock().await.upsert_room(room.clone());
        Ok(room)
    }

    /// アクティブなルームを削除する（管理者のみ、パスワード確認あり）
    ///
    /// # Returns
    ///
    /// 削除したルームの名前
    pub async fn delete(&self, password: &str) -> Result<String, ClientError> {
        let token = require_token(self.tokens.as_ref())?;
        let room_id = self.admin_room_id().await?;

        if !self.api.validate_password(&token, password).await? {
            return Err(ClientError::InvalidPassword);
        }
        self.api.delete_room(&token, &room_id).await?;

        let removed = self.store.lock().await.remove_room(&room_id);
        let name = removed.map(|r| r.name).unwrap_or(room_id);
        tracing::info!("Room '{}' deleted", name);
        Ok(name)
    }

    /// アクティブなルームの ID（自分が管理者でない場合はエラー）
    async fn admin_room_id(&self) -> Result<String, ClientError> {
        let store = self.store.lock().await;
        let room = store.active().ok_or(ClientError::NoActiveRoom)?;
        let me = store.my_id().ok_or(ClientError::NotAuthenticated)?;
        if !room.is_admin(me) {
            return Err(ClientError::NotAdmin);
        }
        Ok(room.id.clone())
    }
}
