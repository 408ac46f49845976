use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for account creation.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateAccountRequest {
    /// Unique username (1-32 chars: letters, digits, `_`, `.`, `-`).
    #[serde(alias = "username")]
    #[schema(example = "alice")]
    pub user: String,
    /// Password (1-128 bytes).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, '_', '.' and '-'".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_account_request(payload: &CreateAccountRequest) -> Result<(), AppError> {
    validate_username(payload.user.trim())?;
    if payload.password.is_empty() || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 1-128 bytes".into(),
        ));
    }
    Ok(())
}

/// Request body for login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "user")]
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful account creation response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
}

impl From<crate::entity::account::Model> for AccountResponse {
    fn from(account: crate::entity::account::Model) -> Self {
        Self {
            id: account.id,
            username: account.username,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Session token to send with uploads.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "alice")]
    pub username: String,
    /// When the session stops resolving.
    pub expires_at: DateTime<Utc>,
}
