//! UseCase: 認証（ログイン・サインアップ・ログアウト・セッション復元・プロフィール更新）
//!
//! ### どのような状況を想定しているか
//! - 正常系：トークンの保存とプロフィールの取得
//! - 異常系：認証情報の誤り、保存済みトークンの失効 (401)
//! - エッジケース：ログアウト API が失敗してもローカルの状態は必ず消える

use std::sync::Arc;

use crate::{
    domain::{AuthToken, ChatApi, LoginForm, ProfileUpdate, SignupForm, TokenStore, User},
    error::ClientError,
};

use super::{SharedStore, require_token};

/// 認証のユースケース
pub struct AuthUseCase {
    api: Arc<dyn ChatApi>,
    tokens: Arc<dyn TokenStore>,
    store: SharedStore,
}

impl AuthUseCase {
    pub fn new(api: Arc<dyn ChatApi>, tokens: Arc<dyn TokenStore>, store: SharedStore) -> Self {
        Self { api, tokens, store }
    }

    /// ログインしてトークンを保存し、プロフィールを読み込む
    pub async fn login(&self, form: &LoginForm) -> Result<User, ClientError> {
        let token = self.api.login(form).await?;
        tracing::info!("Logged in as {}", form.email.as_str());
        self.start_session(token).await
    }

    /// アカウントを作成してトークンを保存し、プロフィールを読み込む
    pub async fn signup(&self, form: &SignupForm) -> Result<User, ClientError> {
        let token = self.api.signup(form).await?;
        tracing::info!("Signed up as {}", form.email.as_str());
        self.start_session(token).await
    }

    async fn start_session(&self, token: AuthToken) -> Result<User, ClientError> {
        self.tokens.save(&token)?;
        let me = self.api.get_me(&token).await?;
        self.store.lock().await.set_me(me.clone());
        Ok(me)
    }

    /// ログアウト
    ///
    /// サーバーへの通知は失敗しても無視し、トークンとストアは必ず消去する。
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(token) = self.tokens.load()?
            && let Err(e) = self.api.logout(&token).await
        {
            tracing::warn!("Logout request failed, clearing local session anyway: {}", e);
        }
        self.tokens.clear()?;
        self.store.lock().await.reset();
        tracing::info!("Logged out");
        Ok(())
    }

    /// 保存済みトークンからセッションを復元する
    ///
    /// # Returns
    ///
    /// * `Ok(Some(User))` - トークンが有効
    /// * `Ok(None)` - トークンが保存されていない
    /// * `Err(ClientError::Unauthorized)` - トークンが失効していた（保存済みトークンは削除済み）
    pub async fn restore(&self) -> Result<Option<User>, ClientError> {
        let Some(token) = self.tokens.load()? else {
            return Ok(None);
        };
        match self.api.get_me(&token).await {
            Ok(me) => {
                self.store.lock().await.set_me(me.clone());
                Ok(Some(me))
            }
            Err(ClientError::Unauthorized) => {
                tracing::info!("Stored token was rejected, clearing it");
                self.tokens.clear()?;
                Err(ClientError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }

    /// プロフィール（名前・メールアドレス）を更新する
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let token = require_token(self.tokens.as_ref())?;
        let me = self.api.update_me(&token, update).await?;
        self.store.lock().await.set_me(me.clone());
        Ok(me)
    }

    /// 現在のトークン（ソケット接続用）
    pub fn token(&self) -> Result<AuthToken, ClientError> {
        require_token(self.tokens.as_ref())
    }
}
