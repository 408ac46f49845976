use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::config::AuthConfig;

use super::SessionService;

/// Periodically purge expired sessions. Runs until the process exits.
pub async fn run_session_sweeper(db: DatabaseConnection, auth: AuthConfig) {
    let scan_interval = Duration::from_secs(auth.session_sweep_interval_secs.max(1));

    info!(
        interval_secs = scan_interval.as_secs(),
        "Starting expired session sweeper"
    );

    let mut interval = tokio::time::interval(scan_interval);

    loop {
        interval.tick().await;

        match SessionService::new(&db, &auth).purge_expired().await {
            Ok(0) => {}
            Ok(count) => info!(count, "Purged expired sessions"),
            Err(e) => error!(error = %e, "Expired session sweep failed"),
        }
    }
}
