use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::{debug, info};

use crate::entity::account;
use crate::error::AppError;
use crate::utils::hash;

/// Result of an account creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(account::Model),
    /// An account with this username already exists.
    Conflict,
}

/// Result of checking a username/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Ok(account::Model),
    InvalidCredentials,
    /// No account with this username.
    NotFound,
}

pub struct AccountService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AccountService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<account::Model>, AppError> {
        Ok(account::Entity::find()
            .filter(account::Column::Username.eq(username))
            .one(self.conn)
            .await?)
    }

    /// Create an account unless the username is taken.
    ///
    /// The lookup only short-circuits the common case; the unique constraint
    /// on `username` decides concurrent sign-ups, and the losing insert is
    /// reported as `Conflict` as well.
    pub async fn create(&self, username: &str, password: &str) -> Result<CreateOutcome, AppError> {
        let username = username.trim();

        if self.find_by_username(username).await?.is_some() {
            return Ok(CreateOutcome::Conflict);
        }

        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hash task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

        self.insert(username, password_hash).await
    }

    /// Insert an account row with an already computed hash.
    ///
    /// A unique violation on `username` is reported as `Conflict`.
    pub async fn insert(
        &self,
        username: &str,
        password_hash: String,
    ) -> Result<CreateOutcome, AppError> {
        let new_account = account::ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match new_account.insert(self.conn).await {
            Ok(created) => {
                info!(account_id = created.id, "Account created");
                Ok(CreateOutcome::Created(created))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!("Account creation race: unique constraint caught on insert");
                Ok(CreateOutcome::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check a password against the stored hash for `username`.
    pub async fn verify_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, AppError> {
        let Some(account) = self.find_by_username(username.trim()).await? else {
            return Ok(LoginOutcome::NotFound);
        };

        let password = password.to_owned();
        let stored = account.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || hash::verify_password(&password, &stored))
                .await
                .map_err(|e| AppError::Internal(format!("Password verify task failed: {e}")))?
                .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;

        Ok(if is_valid {
            LoginOutcome::Ok(account)
        } else {
            LoginOutcome::InvalidCredentials
        })
    }
}
