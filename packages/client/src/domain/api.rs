//! ChatApi trait 定義
//!
//! ユースケース層が必要とする REST バックエンドへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層 (`HttpChatApi`) が提供します（依存性の逆転）。

use async_trait::async_trait;

use crate::error::ClientError;

use super::{DisplayName, Email, LoginForm, Room, RoomName, SignupForm, User};

/// Bearer token issued by `/auth/login` and `/auth/signup`
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Fields of the profile to change; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<DisplayName>,
    pub email: Option<Email>,
}

/// REST backend
///
/// 認証が必要な呼び出しは全て `token` を受け取り、`Authorization: Bearer` ヘッダとして送信する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, form: &LoginForm) -> Result<AuthToken, ClientError>;

    /// `POST /auth/signup`
    async fn signup(&self, form: &SignupForm) -> Result<AuthToken, ClientError>;

    /// `POST /auth/logout`
    async fn logout(&self, token: &AuthToken) -> Result<(), ClientError>;

    /// `POST /auth/validate-password`
    async fn validate_password(
        &self,
        token: &AuthToken,
        password: &str,
    ) -> Result<bool, ClientError>;

    /// `GET /api/users/me`
    async fn get_me(&self, token: &AuthToken) -> Result<User, ClientError>;

    /// `PATCH /api/users/me`
    async fn update_me(
        &self,
        token: &AuthToken,
        update: &ProfileUpdate,
    ) -> Result<User, ClientError>;

    /// `GET /api/rooms`
    async fn list_rooms(&self, token: &AuthToken) -> Result<Vec<Room>, ClientError>;

    /// `POST /api/rooms`
    async fn create_room(&self, token: &AuthToken, name: &RoomName) -> Result<Room, ClientError>;

    /// `GET /api/rooms/:id`
    async fn get_room(&self, token: &AuthToken, room_id: &str) -> Result<Room, ClientError>;

    /// `PATCH /api/rooms/:id`
    async fn rename_room(
        &self,
        token: &AuthToken,
        room_id: &str,
        name: &RoomName,
    ) -> Result<Room, ClientError>;

    /// `DELETE /api/rooms/:id`
    async fn delete_room(&self, token: &AuthToken, room_id: &str) -> Result<(), ClientError>;
}
