use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::header;
use axum::response::Response;
use tracing::instrument;

use crate::asset::{AssetFilter, asset_service};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{BearerToken, select_token};
use crate::extractors::json::AppJson;
use crate::models::image::{
    ImageQuery, ImageRecord, UploadRequest, UploadResponse, normalize_tag,
    validate_upload_request,
};
use crate::session::session_service;
use crate::state::AppState;
use crate::utils::image_type::ImageType;
use crate::utils::payload::decode_base64_payload;

/// Body limit for image routes: base64 inflates the payload by 4/3, plus
/// headroom for the JSON envelope.
pub fn upload_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(body_limit_bytes(max_blob_size))
}

fn body_limit_bytes(max_blob_size: u64) -> usize {
    let limit = max_blob_size
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(64 * 1024);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[utoipa::path(
    post,
    path = "/images",
    tag = "Images",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Stores a base64-encoded image for the user the session token belongs to. \
        The token is read from the `token` field, or from an `Authorization: Bearer` header \
        when the field is empty.",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, bearer, payload), fields(content_type = %payload.content_type))]
pub async fn upload_image(
    State(state): State<AppState>,
    bearer: Option<BearerToken>,
    AppJson(payload): AppJson<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let token = select_token(&payload.token, bearer)?;

    let owner = session_service(&state.db, &state.config.auth)
        .resolve(&token)
        .await?
        .ok_or(AppError::TokenInvalid)?;

    validate_upload_request(&payload)?;
    let image_type = ImageType::parse(&payload.content_type).map_err(AppError::Validation)?;
    let tag = normalize_tag(payload.tag.as_deref())?;
    let data = decode_base64_payload(&payload.content, state.config.storage.max_blob_size)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let saved = asset_service(&state)
        .upload(owner.id, &image_type, &data, tag)
        .await?;

    Ok(Json(UploadResponse {
        message: "Image Uploaded Successfully!".into(),
        path: saved.path,
        owner: owner.username,
        tag: saved.tag,
    }))
}

#[utoipa::path(
    get,
    path = "/images",
    tag = "Images",
    operation_id = "queryImages",
    summary = "Query the image catalog",
    description = "Filters by `tag`, by `username`, or both (intersection). Without filters \
        returns at most the configured default number of images. Order is unspecified.",
    params(ImageQuery),
    responses(
        (status = 200, description = "Matching images", body = Vec<ImageRecord>),
        (status = 503, description = "Store unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn query_images(
    State(state): State<AppState>,
    Query(params): Query<ImageQuery>,
) -> Result<Json<Vec<ImageRecord>>, AppError> {
    let filter = AssetFilter::from_params(params.tag.as_deref(), params.username.as_deref());

    let entries = asset_service(&state)
        .query(&filter, state.config.catalog.default_limit)
        .await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|e| ImageRecord {
                path: e.path,
                user: e.owner,
                tag: e.tag,
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/images/{path}",
    tag = "Images",
    operation_id = "fetchImage",
    summary = "Download an image",
    description = "Returns the stored bytes with the content type recorded at upload.",
    params(("path" = String, Path, description = "Storage key returned by upload or query")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Malformed key (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No such image (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn fetch_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let blob = asset_service(&state).fetch(&path).await?;

    // Keys are never reused, so the bytes behind one never change.
    Response::builder()
        .header(header::CONTENT_TYPE, blob.content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(blob.data))
        .map_err(|e| AppError::Internal(e.to_string()))
}
