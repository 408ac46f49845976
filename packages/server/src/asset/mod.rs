mod service;

pub use service::{AssetFilter, AssetService, CatalogEntry};

use sea_orm::DatabaseConnection;

use crate::state::AppState;

/// Create an AssetService over the shared connection pool and blob store.
pub fn asset_service(state: &AppState) -> AssetService<'_, DatabaseConnection> {
    AssetService::new(&state.db, &*state.blob_store)
}
