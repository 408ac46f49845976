use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted tag.
pub const MAX_TAG_CHARS: usize = 64;

/// Request body for an image upload.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UploadRequest {
    /// Declared MIME type of the image.
    #[serde(rename = "type")]
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Base64-encoded image bytes.
    #[schema(example = "iVBORw0KGgo=")]
    pub content: String,
    /// Session token from login. May instead be sent as
    /// `Authorization: Bearer <token>`.
    #[serde(default)]
    pub token: String,
    /// Optional free-text label.
    #[serde(default)]
    #[schema(example = "vacation")]
    pub tag: Option<String>,
}

/// Trim the tag and drop it when blank.
pub fn normalize_tag(tag: Option<&str>) -> Result<Option<String>, AppError> {
    match tag.map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) if t.chars().count() > MAX_TAG_CHARS => Err(AppError::Validation(format!(
            "Tag must be at most {MAX_TAG_CHARS} characters"
        ))),
        Some(t) => Ok(Some(t.to_owned())),
    }
}

pub fn validate_upload_request(payload: &UploadRequest) -> Result<(), AppError> {
    if payload.content_type.trim().is_empty() {
        return Err(AppError::Validation("Content type must not be empty".into()));
    }
    if payload.content.trim().is_empty() {
        return Err(AppError::Validation("Image content must not be empty".into()));
    }
    Ok(())
}

/// Successful upload response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = "Image Uploaded Successfully!")]
    pub message: String,
    /// Storage key of the new image.
    #[schema(example = "0190c8a2-7b1e-7c3d-9a4f-1e2d3c4b5a69.png")]
    pub path: String,
    #[schema(example = "alice")]
    pub owner: String,
    pub tag: Option<String>,
}

/// Catalog query filters. Both are optional.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageQuery {
    /// Only images with exactly this tag.
    pub tag: Option<String>,
    /// Only images owned by this user.
    pub username: Option<String>,
}

/// One catalog entry in a query response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImageRecord {
    #[schema(example = "0190c8a2-7b1e-7c3d-9a4f-1e2d3c4b5a69.png")]
    pub path: String,
    /// Owner's username.
    #[schema(example = "alice")]
    pub user: String,
    pub tag: Option<String>,
}
