//! UseCase: メンバー管理（招待・削除・友達追加）
//!
//! 操作はソケットへのイベント送信のみで、結果は `invited-to-room` などの
//! サーバーからのイベントとしてストアに反映される。

use std::sync::Arc;

use crate::{
    domain::{Email, SocketEmitter},
    error::ClientError,
};

use super::SharedStore;

/// メンバー管理のユースケース
pub struct MemberUseCase {
    emitter: Arc<dyn SocketEmitter>,
    store: SharedStore,
}

impl MemberUseCase {
    pub fn new(emitter: Arc<dyn SocketEmitter>, store: SharedStore) -> Self {
        Self { emitter, store }
    }

    /// アクティブなルームにユーザーを招待する
    pub async fn invite(&self, user_id: &str) -> Result<(), ClientError> {
        let room_id = {
            let store = self.store.lock().await;
            store.my_id().ok_or(ClientError::NotAuthenticated)?;
            let room = store.active().ok_or(ClientError::NoActiveRoom)?;
            if room.member(user_id).is_some_and(|m| m.is_active()) {
                return Err(ClientError::Conflict(format!(
                    "{} is already a member of {}",
                    user_id, room.name
                )));
            }
            room.id.clone()
        };
        self.emitter.invite_to_room(&room_id, user_id)
    }

    /// アクティブなルームからメンバーを削除する（管理者のみ、自分自身は不可）
    pub async fn remove(&self, user_id: &str) -> Result<(), ClientError> {
        let room_id = {
            let store = self.store.lock().await;
            let me = store.my_id().ok_or(ClientError::NotAuthenticated)?;
            let room = store.active().ok_or(ClientError::NoActiveRoom)?;
            if !room.is_admin(me) {
                return Err(ClientError::NotAdmin);
            }
            if me == user_id {
                return Err(ClientError::BadRequest(
                    "you cannot remove yourself".to_string(),
                ));
            }
            if !room.member(user_id).is_some_and(|m| m.is_active()) {
                return Err(ClientError::NotFound(format!(
                    "{} is not a member of {}",
                    user_id, room.name
                )));
            }
            room.id.clone()
        };
        self.emitter.remove_from_room(&room_id, user_id)
    }

    /// メールアドレスで友達を追加する
    pub async fn add_friend(&self, email: &Email) -> Result<(), ClientError> {
        {
            let store = self.store.lock().await;
            let me = store.me().ok_or(ClientError::NotAuthenticated)?;
            if me.email.eq_ignore_ascii_case(email.as_str()) {
                return Err(ClientError::BadRequest(
                    "you cannot add yourself as a friend".to_string(),
                ));
            }
        }
        self.emitter.add_friend(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::emitter::MockSocketEmitter, usecase::test_support::*};

    #[tokio::test]
    async fn test_invite_emits_event() {
        // テスト項目: 招待で invite-to-room イベントが送信される
        // given (前提条件):
        let mut emitter = MockSocketEmitter::new();
        emitter
            .expect_invite_to_room()
            .withf(|room_id, user_id| room_id == "r1" && user_id == "u3")
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = MemberUseCase::new(
            Arc::new(emitter),
            store_with_active(Some(general_as_member())),
        );

        // when (操作):
        let result = usecase.invite("u3").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invite_existing_member_is_conflict() {
        // テスト項目: 既にメンバーのユーザーを招待すると Conflict になる
        // given (前提条件):
        let mut emitter = MockSocketEmitter::new();
        emitter.expect_invite_to_room().never();
        let usecase = MemberUseCase::new(
            Arc::new(emitter),
            store_with_active(Some(general_as_member())),
        );

        // when (操作):
        let result = usecase.invite("u2").await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_invite_without_active_room() {
        // テスト項目: ルームを開いていない場合、招待は NoActiveRoom になる
        // given (前提条件):
        let usecase =
            MemberUseCase::new(Arc::new(MockSocketEmitter::new()), store_with_active(None));

        // when (操作):
        let result = usecase.invite("u3").await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::NoActiveRoom)));
    }

    #[tokio::test]
    async fn test_member_actions_after_logout_are_not_authenticated() {
        // テスト項目: ログアウト後の招待・削除・友達追加は NotAuthenticated になる
        // given (前提条件):
        let mut emitter = MockSocketEmitter::new();
        emitter.expect_invite_to_room().never();
        emitter.expect_remove_from_room().never();
        emitter.expect_add_friend().never();
        let usecase = MemberUseCase::new(Arc::new(emitter), logged_out_store());

        // when (操作):
        let invited = usecase.invite("u3").await;
        let removed = usecase.remove("u2").await;
        let befriended = usecase
            .add_friend(&Email::new("bob@example.com").unwrap())
            .await;

        // then (期待する結果):
        assert!(matches!(invited, Err(ClientError::NotAuthenticated)));
        assert!(matches!(removed, Err(ClientError::NotAuthenticated)));
        assert!(matches!(befriended, Err(ClientError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_remove_requires_admin() {
        // テスト項目: 管理者でない場合、メンバーの削除は NotAdmin になる
        // given (前提条件):
        let mut emitter = MockSocketEmitter::new();
        emitter.expect_remove_from_room().never();
        let usecase = MemberUseCase::new(
            Arc::new(emitter),
            store_with_active(Some(general_as_member())),
        );

        // when (操作):
        let result = usecase.remove("u2").await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::NotAdmin)));
    }

    #[tokio::test]
    async fn test_remove_self_is_rejected() {
        // テスト項目: 自分自身は削除できない
        // given (前提条件):
        let usecase = MemberUseCase::new(
            Arc::new(MockSocketEmitter::new()),
            store_with_active(Some(general_as_admin())),
        );

        // when (操作):
        let result = usecase.remove("u1").await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_remove_member_emits_event() {
        // テスト項目: 管理者によるメンバー削除で remove-from-room イベントが送信される
        // given (前提条件):
        let mut emitter = MockSocketEmitter::new();
        emitter
            .expect_remove_from_room()
            .withf(|room_id, user_id| room_id == "r1" && user_id == "u2")
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = MemberUseCase::new(
            Arc::new(emitter),
            store_with_active(Some(general_as_admin())),
        );

        // when (操作):
        let result = usecase.remove("u2").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_remove_non_member() {
        // テスト項目: メンバーでないユーザーの削除は NotFound になる
        // given (前提条件):
        let usecase = MemberUseCase::new(
            Arc::new(MockSocketEmitter::new()),
            store_with_active(Some(general_as_admin())),
        );

        // when (操作):
        let result = usecase.remove("u9").await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_friend_emits_event() {
        // テスト項目: 友達追加で add-friend イベントが送信される
        // given (前提条件):
        let mut emitter = MockSocketEmitter::new();
        emitter
            .expect_add_friend()
            .withf(|email| email.as_str() == "bob@example.com")
            .times(1)
            .returning(|_| Ok(()));
        let usecase = MemberUseCase::new(Arc::new(emitter), store_with_active(None));

        // when (操作):
        let result = usecase
            .add_friend(&Email::new("bob@example.com").unwrap())
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_add_self_as_friend_is_rejected() {
        // テスト項目: 自分自身を友達に追加することはできない
        // given (前提条件):
        let mut emitter = MockSocketEmitter::new();
        emitter.expect_add_friend().never();
        let usecase = MemberUseCase::new(Arc::new(emitter), store_with_active(None));

        // when (操作):
        let result = usecase
            .add_friend(&Email::new("Alice@example.com").unwrap())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::BadRequest(_))));
    }
}
