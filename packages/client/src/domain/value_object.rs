//! Validated values behind the authentication, profile and room forms.
//!
//! Every value is constructed through `new`, which either returns the value or
//! the first rule it violates. Once constructed, a value is known to be valid.

use thiserror::Error;

const EMAIL_MAX_LENGTH: usize = 254;
const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_MAX_LENGTH: usize = 128;
const DISPLAY_NAME_MIN_LENGTH: usize = 2;
const DISPLAY_NAME_MAX_LENGTH: usize = 32;
const ROOM_NAME_MAX_LENGTH: usize = 64;
const MESSAGE_MAX_LENGTH: usize = 2000;

/// Form validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} must not contain control characters")]
    ControlCharacter(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("passwords do not match")]
    PasswordMismatch,
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError::Required(field));
    }
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn check_no_control(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacter(field));
    }
    Ok(())
}

/// Email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required("email"));
        }
        if trimmed.chars().count() > EMAIL_MAX_LENGTH {
            return Err(ValidationError::TooLong {
                field: "email",
                max: EMAIL_MAX_LENGTH,
            });
        }
        if !is_plausible_email(trimmed) {
            return Err(ValidationError::InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

/// Password chosen at signup.
///
/// The raw value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Required("password"));
        }
        check_length("password", &value, PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Display name of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        check_length(
            "name",
            trimmed,
            DISPLAY_NAME_MIN_LENGTH,
            DISPLAY_NAME_MAX_LENGTH,
        )?;
        check_no_control("name", trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Name of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        check_length("room name", trimmed, 1, ROOM_NAME_MAX_LENGTH)?;
        check_no_control("room name", trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Content of a chat message.
///
/// Only the length check uses the trimmed text; the original text is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        check_length("message", value.trim(), 1, MESSAGE_MAX_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Login form.
///
/// Password length rules are not re-applied at login; accounts created under
/// older rules must still be able to sign in.
#[derive(Clone)]
pub struct LoginForm {
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl LoginForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = Email::new(email)?;
        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError::Required("password"));
        }
        Ok(Self { email, password })
    }
}

/// Signup form
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: DisplayName,
    pub email: Email,
    pub password: Password,
}

impl SignupForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = DisplayName::new(name)?;
        let email = Email::new(email)?;
        let password = Password::new(password)?;
        let confirmation: String = confirmation.into();
        if password.as_str() != confirmation.as_str() {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(Self {
            name,
            email,
            password,
        })
    }
}
