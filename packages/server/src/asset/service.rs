use chrono::Utc;
use common::storage::{BlobStore, StorageKey, StoredBlob};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::entity::{account, asset};
use crate::error::AppError;
use crate::utils::image_type::ImageType;

/// Which catalog rows a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetFilter {
    Tag(String),
    Owner(String),
    TagAndOwner { tag: String, owner: String },
    /// No filter; the configured result cap applies.
    All,
}

impl AssetFilter {
    /// Pick the filter mode from optional query parameters. Blank values count as absent.
    pub fn from_params(tag: Option<&str>, username: Option<&str>) -> Self {
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());
        let owner = username.map(str::trim).filter(|u| !u.is_empty());
        match (tag, owner) {
            (Some(tag), Some(owner)) => Self::TagAndOwner {
                tag: tag.to_owned(),
                owner: owner.to_owned(),
            },
            (Some(tag), None) => Self::Tag(tag.to_owned()),
            (None, Some(owner)) => Self::Owner(owner.to_owned()),
            (None, None) => Self::All,
        }
    }
}

/// A catalog row joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub owner: String,
    pub path: String,
    pub tag: Option<String>,
}

pub struct AssetService<'a, C: ConnectionTrait> {
    conn: &'a C,
    blobs: &'a dyn BlobStore,
}

impl<'a, C: ConnectionTrait> AssetService<'a, C> {
    pub fn new(conn: &'a C, blobs: &'a dyn BlobStore) -> Self {
        Self { conn, blobs }
    }

    /// Store an image for `owner_id` and record it in the catalog.
    ///
    /// The blob is written first and the catalog row second, so a catalog row
    /// never points at a missing blob. If the catalog insert fails the blob is
    /// deleted again before the error is returned.
    pub async fn upload(
        &self,
        owner_id: i32,
        image_type: &ImageType,
        data: &[u8],
        tag: Option<String>,
    ) -> Result<asset::Model, AppError> {
        let key = StorageKey::generate(image_type.extension())?;

        self.blobs.put(&key, data, image_type.essence()).await?;

        let row = asset::ActiveModel {
            id: Set(Uuid::now_v7()),
            path: Set(key.to_string()),
            owner_id: Set(owner_id),
            tag: Set(tag),
            content_type: Set(image_type.essence().to_owned()),
            size: Set(data.len() as i64),
            created_at: Set(Utc::now()),
        };

        match row.insert(self.conn).await {
            Ok(saved) => {
                info!(path = %saved.path, owner_id, size = saved.size, "Image stored");
                Ok(saved)
            }
            Err(e) => {
                warn!(path = %key, error = %e, "Catalog insert failed, removing blob");
                if let Err(cleanup) = self.blobs.delete(&key).await {
                    error!(path = %key, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e.into())
            }
        }
    }

    /// Snapshot query over the catalog.
    ///
    /// `limit` only applies to [`AssetFilter::All`]; filtered queries return
    /// every match. Rows come newest first, which callers must not rely on.
    pub async fn query(
        &self,
        filter: &AssetFilter,
        limit: u64,
    ) -> Result<Vec<CatalogEntry>, AppError> {
        let mut select = asset::Entity::find().find_also_related(account::Entity);

        select = match filter {
            AssetFilter::Tag(tag) => select.filter(asset::Column::Tag.eq(tag.as_str())),
            AssetFilter::Owner(owner) => {
                select.filter(account::Column::Username.eq(owner.as_str()))
            }
            AssetFilter::TagAndOwner { tag, owner } => select
                .filter(asset::Column::Tag.eq(tag.as_str()))
                .filter(account::Column::Username.eq(owner.as_str())),
            AssetFilter::All => select.limit(Some(limit)),
        };

        let rows = select
            .order_by_desc(asset::Column::CreatedAt)
            .order_by_desc(asset::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(image, owner)| {
                owner.map(|owner| CatalogEntry {
                    owner: owner.username,
                    path: image.path,
                    tag: image.tag,
                })
            })
            .collect())
    }

    /// Read an image's bytes and content type from the blob store.
    pub async fn fetch(&self, path: &str) -> Result<StoredBlob, AppError> {
        let key = StorageKey::parse(path)?;
        Ok(self.blobs.get(&key).await?)
    }
}
