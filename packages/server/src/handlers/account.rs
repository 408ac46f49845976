use axum::{Json, extract::State};
use tracing::instrument;

use crate::account::{CreateOutcome, account_service};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::account::{
    AccountResponse, CreateAccountRequest, validate_create_account_request,
};
use crate::state::AppState;

/// Handle account creation.
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Accounts",
    operation_id = "createAccount",
    summary = "Create an account",
    description = "Creates an account with an Argon2id password hash. \
        A username that already exists is rejected with 422.",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 422, description = "Username taken (USERNAME_TAKEN)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.user.trim()))]
pub async fn create_account(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    validate_create_account_request(&payload)?;

    match account_service(&state.db)
        .create(&payload.user, &payload.password)
        .await?
    {
        CreateOutcome::Created(account) => Ok(Json(AccountResponse::from(account))),
        CreateOutcome::Conflict => Err(AppError::UsernameTaken),
    }
}
