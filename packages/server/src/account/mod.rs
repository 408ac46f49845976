mod service;

pub use service::{AccountService, CreateOutcome, LoginOutcome};

use sea_orm::DatabaseConnection;

/// Create an AccountService for the given database connection.
pub fn account_service(db: &DatabaseConnection) -> AccountService<'_, DatabaseConnection> {
    AccountService::new(db)
}
