mod service;
mod sweeper;

pub use service::{IssuedSession, SessionService};
pub use sweeper::run_session_sweeper;

use sea_orm::DatabaseConnection;

use crate::config::AuthConfig;

/// Create a SessionService for the given database connection.
pub fn session_service<'a>(
    db: &'a DatabaseConnection,
    auth: &'a AuthConfig,
) -> SessionService<'a, DatabaseConnection> {
    SessionService::new(db, auth)
}
