use axum::{Json, extract::State};
use tracing::instrument;

use crate::account::{LoginOutcome, account_service};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::account::{LoginRequest, LoginResponse, validate_login_request};
use crate::session::session_service;
use crate::state::AppState;

/// Handle login.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in and obtain a session token",
    description = "Verifies the password and issues a session token. Unknown usernames \
        and wrong passwords get the same 401 response.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let account = match account_service(&state.db)
        .verify_login(&payload.username, &payload.password)
        .await?
    {
        LoginOutcome::Ok(account) => account,
        LoginOutcome::NotFound => {
            tracing::debug!("Login for unknown username");
            return Err(AppError::InvalidCredentials);
        }
        LoginOutcome::InvalidCredentials => return Err(AppError::InvalidCredentials),
    };

    let issued = session_service(&state.db, &state.config.auth)
        .issue(&account)
        .await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        username: account.username,
        expires_at: issued.expires_at,
    }))
}
