//! TokenStore trait 定義
//!
//! ブラウザの local storage に相当する、認証トークンの永続化先の抽象化。

use crate::error::ClientError;

use super::AuthToken;

/// Key the token is persisted under
pub const TOKEN_STORAGE_KEY: &str = "kaiwa.token";

/// Persistent home of the session token
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Stored token, if any
    fn load(&self) -> Result<Option<AuthToken>, ClientError>;

    fn save(&self, token: &AuthToken) -> Result<(), ClientError>;

    /// Remove the stored token; clearing an empty store is not an error
    fn clear(&self) -> Result<(), ClientError>;
}
