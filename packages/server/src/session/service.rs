use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use tracing::debug;

use crate::config::AuthConfig;
use crate::entity::{account, session};
use crate::error::AppError;
use crate::utils::{hash, jwt};

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Maps session tokens to accounts.
///
/// A token resolves only while its signature verifies, its `exp` claim is in
/// the future, and its session row exists and has not expired. Deleting the
/// row revokes the token.
pub struct SessionService<'a, C: ConnectionTrait> {
    conn: &'a C,
    auth: &'a AuthConfig,
}

impl<'a, C: ConnectionTrait> SessionService<'a, C> {
    pub fn new(conn: &'a C, auth: &'a AuthConfig) -> Self {
        Self { conn, auth }
    }

    /// Sign a token for `account` and record its session row.
    pub async fn issue(&self, account: &account::Model) -> Result<IssuedSession, AppError> {
        let ttl = Duration::try_hours(self.auth.session_ttl_hours).ok_or_else(|| {
            AppError::Internal(format!(
                "session_ttl_hours {} is out of range",
                self.auth.session_ttl_hours
            ))
        })?;

        let (token, expires_at) =
            jwt::sign(account.id, &account.username, &self.auth.jwt_secret, ttl)
                .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

        session::ActiveModel {
            token_hash: Set(hash::token_digest(&token)),
            account_id: Set(account.id),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolve a token to its account, or `None` if it does not authorize anything.
    pub async fn resolve(&self, token: &str) -> Result<Option<account::Model>, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let claims = match jwt::verify(token, &self.auth.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return Ok(None);
            }
        };

        let Some(row) = session::Entity::find()
            .filter(session::Column::TokenHash.eq(hash::token_digest(token)))
            .filter(session::Column::ExpiresAt.gt(Utc::now()))
            .one(self.conn)
            .await?
        else {
            debug!(account_id = claims.uid, "No live session for token");
            return Ok(None);
        };

        if row.account_id != claims.uid {
            debug!(account_id = claims.uid, "Session row belongs to another account");
            return Ok(None);
        }

        Ok(account::Entity::find_by_id(row.account_id)
            .one(self.conn)
            .await?)
    }

    /// Delete every session whose expiry has passed. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64, DbErr> {
        let result = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(Utc::now()))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
