//! REST request and response bodies.

use serde::{Deserialize, Serialize};

use crate::domain::{LoginForm, ProfileUpdate, RoomName, SignupForm};

/// `POST /auth/login` request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a LoginForm> for LoginRequest<'a> {
    fn from(form: &'a LoginForm) -> Self {
        Self {
            email: form.email.as_str(),
            password: &form.password,
        }
    }
}

/// `POST /auth/signup` request body
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a SignupForm> for SignupRequest<'a> {
    fn from(form: &'a SignupForm) -> Self {
        Self {
            name: form.name.as_str(),
            email: form.email.as_str(),
            password: form.password.as_str(),
        }
    }
}

/// Response of `/auth/login` and `/auth/signup`
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /auth/validate-password` request body
#[derive(Debug, Serialize)]
pub struct ValidatePasswordRequest<'a> {
    pub password: &'a str,
}

/// `POST /auth/validate-password` response body
#[derive(Debug, Deserialize)]
pub struct ValidatePasswordResponse {
    pub valid: bool,
}

/// `PATCH /api/users/me` request body
#[derive(Debug, Serialize)]
pub struct UpdateMeRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

impl<'a> From<&'a ProfileUpdate> for UpdateMeRequest<'a> {
    fn from(update: &'a ProfileUpdate) -> Self {
        Self {
            name: update.name.as_ref().map(|n| n.as_str()),
            email: update.email.as_ref().map(|e| e.as_str()),
        }
    }
}

/// `POST /api/rooms` and `PATCH /api/rooms/:id` request body
#[derive(Debug, Serialize)]
pub struct RoomNameRequest<'a> {
    pub name: &'a str,
}

impl<'a> From<&'a RoomName> for RoomNameRequest<'a> {
    fn from(name: &'a RoomName) -> Self {
        Self {
            name: name.as_str(),
        }
    }
}

/// Error body returned by the backend on failure
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayName;

    #[test]
    fn test_update_me_request_omits_unchanged_fields() {
        // テスト項目: 変更しない項目はリクエストボディに含まれない
        // given (前提条件):
        let update = ProfileUpdate {
            name: Some(DisplayName::new("alice").unwrap()),
            email: None,
        };

        // when (操作):
        let json = serde_json::to_value(UpdateMeRequest::from(&update)).unwrap();

        // then (期待する結果):
        assert_eq!(json, serde_json::json!({"name": "alice"}));
    }

    #[test]
    fn test_signup_request_from_form() {
        // テスト項目: サインアップフォームからリクエストボディが作られる
        // given (前提条件):
        let form = SignupForm::new("alice", "alice@example.com", "password123", "password123")
            .unwrap();

        // when (操作):
        let json = serde_json::to_value(SignupRequest::from(&form)).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "name": "alice",
                "email": "alice@example.com",
                "password": "password123"
            })
        );
    }
}
