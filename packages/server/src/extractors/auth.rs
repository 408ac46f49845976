use axum::{
    extract::OptionalFromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;

/// Session token taken from an `Authorization: Bearer <token>` header.
///
/// Use as `Option<BearerToken>`. An absent header, or one carrying another
/// scheme such as `Basic`, yields `None` and leaves the decision to
/// [`select_token`].
pub struct BearerToken(pub String);

impl<S> OptionalFromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(bearer_from_headers(&parts.headers).map(BearerToken))
    }
}

fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// Pick the body token when present, otherwise the bearer header.
pub fn select_token(body_token: &str, bearer: Option<BearerToken>) -> Result<String, AppError> {
    let body_token = body_token.trim();
    if !body_token.is_empty() {
        return Ok(body_token.to_owned());
    }
    bearer.map(|b| b.0).ok_or(AppError::TokenMissing)
}
