//! In-process token storage for tests and ephemeral sessions.

use std::sync::Mutex;

use crate::{
    domain::{AuthToken, TokenStore},
    error::ClientError,
};

/// Token store that forgets everything when the process exits
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<AuthToken>>, ClientError> {
        self.token
            .lock()
            .map_err(|_| ClientError::Storage("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, ClientError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &AuthToken) -> Result<(), ClientError> {
        *self.lock()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.lock()? = None;
        Ok(())
    }
}
