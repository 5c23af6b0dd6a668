//! `reqwest` を使った ChatApi 実装
//!
//! ## 責務
//!
//! - ベース URL とパスの結合 (ルーム ID などは 1 セグメントとしてエンコード)
//! - Bearer トークンの付与
//! - HTTP ステータスから `ClientError` への変換

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    domain::{AuthToken, ChatApi, LoginForm, ProfileUpdate, Room, RoomName, SignupForm, User},
    error::ClientError,
    infrastructure::dto::http::{
        ErrorResponse, LoginRequest, RoomNameRequest, SignupRequest, TokenResponse,
        UpdateMeRequest, ValidatePasswordRequest, ValidatePasswordResponse,
    },
};

/// REST client for the chat backend
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base_url: String,
}

impl HttpChatApi {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:3000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `segments` against the base URL
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// an id never change the route.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = |reason: String| {
            ClientError::Connection(format!("invalid API URL '{}': {}", self.base_url, reason))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    fn authorized(
        &self,
        method: Method,
        segments: &[&str],
        token: &AuthToken,
    ) -> Result<RequestBuilder, ClientError> {
        Ok(self.request(method, segments)?.bearer_auth(token.as_str()))
    }

    /// Send a request and decode a JSON body from a successful response
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = check_status(builder.send().await?).await?;
        // the request succeeded, so an unreadable body is a contract violation
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Protocol(format!("unexpected response body: {}", e)))
    }

    /// Send a request whose successful response body is ignored
    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        check_status(builder.send().await?).await?;
        Ok(())
    }
}

/// Map a non-success response to the matching `ClientError`
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    tracing::debug!("Request failed with {}: {}", status, message);
    Err(status_to_error(status, message))
}

/// Extract the human-readable message from an error body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ErrorResponse>(body) {
        return error.message;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

fn status_to_error(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        _ => ClientError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn login(&self, form: &LoginForm) -> Result<AuthToken, ClientError> {
        let builder = self
            .request(Method::POST, &["auth", "login"])?
            .json(&LoginRequest::from(form));
        match self.send_json::<TokenResponse>(builder).await {
            Ok(response) => Ok(AuthToken::new(response.token)),
            // 401 at login means wrong credentials, not an expired session
            Err(ClientError::Unauthorized) => Err(ClientError::InvalidCredentials),
            Err(e) => Err(e),
        }
    }

    async fn signup(&self, form: &SignupForm) -> Result<AuthToken, ClientError> {
        let builder = self
            .request(Method::POST, &["auth", "signup"])?
            .json(&SignupRequest::from(form));
        let response: TokenResponse = self.send_json(builder).await?;
        Ok(AuthToken::new(response.token))
    }

    async fn logout(&self, token: &AuthToken) -> Result<(), ClientError> {
        self.send_empty(self.authorized(Method::POST, &["auth", "logout"], token)?)
            .await
    }

    async fn validate_password(
        &self,
        token: &AuthToken,
        password: &str,
    ) -> Result<bool, ClientError> {
        let builder = self
            .authorized(Method::POST, &["auth", "validate-password"], token)?
            .json(&ValidatePasswordRequest { password });
        let response: ValidatePasswordResponse = self.send_json(builder).await?;
        Ok(response.valid)
    }

    async fn get_me(&self, token: &AuthToken) -> Result<User, ClientError> {
        self.send_json(self.authorized(Method::GET, &["api", "users", "me"], token)?)
            .await
    }

    async fn update_me(
        &self,
        token: &AuthToken,
        update: &ProfileUpdate,
    ) -> Result<User, ClientError> {
        let builder = self
            .authorized(Method::PATCH, &["api", "users", "me"], token)?
            .json(&UpdateMeRequest::from(update));
        self.send_json(builder).await
    }

    async fn list_rooms(&self, token: &AuthToken) -> Result<Vec<Room>, ClientError> {
        self.send_json(self.authorized(Method::GET, &["api", "rooms"], token)?)
            .await
    }

    async fn create_room(&self, token: &AuthToken, name: &RoomName) -> Result<Room, ClientError> {
        let builder = self
            .authorized(Method::POST, &["api", "rooms"], token)?
            .json(&RoomNameRequest::from(name));
        self.send_json(builder).await
    }

    async fn get_room(&self, token: &AuthToken, room_id: &str) -> Result<Room, ClientError> {
        self.send_json(self.authorized(Method::GET, &room_segments(room_id)?, token)?)
            .await
    }

    async fn rename_room(
        &self,
        token: &AuthToken,
        room_id: &str,
        name: &RoomName,
    ) -> Result<Room, ClientError> {
        let builder = self
            .authorized(Method::PATCH, &room_segments(room_id)?, token)?
            .json(&RoomNameRequest::from(name));
        self.send_json(builder).await
    }

    async fn delete_room(&self, token: &AuthToken, room_id: &str) -> Result<(), ClientError> {
        self.send_empty(self.authorized(Method::DELETE, &room_segments(room_id)?, token)?)
            .await
    }
}

/// Path of a single room; dot segments would resolve to another route
fn room_segments(room_id: &str) -> Result<[&str; 3], ClientError> {
    if matches!(room_id, "" | "." | "..") {
        return Err(ClientError::RoomNotFound(room_id.to_string()));
    }
    Ok(["api", "rooms", room_id])
}
