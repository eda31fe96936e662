use axum::{
    body::Body,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use snapfeed_core::{FeedError, ImageUpload, Post};

use crate::{FeedAxumError, FeedState, UploadForm};

pub const LIVENESS: &str = "Snapfeed API running (blob + document store enabled)";
pub const UPLOADED: &str = "Image uploaded & saved";
pub const NO_IMAGE: &str = "No image uploaded";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const FEED_FAILED: &str = "Failed to fetch posts";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub post: Post,
}

pub fn feed_router(state: FeedState) -> Router<()> {
    Router::new()
        .route("/", get(liveness))
        .route("/upload", post(upload))
        .route("/posts", get(list_posts))
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS
}

async fn upload(
    State(state): State<FeedState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadResponse>, FeedAxumError> {
    let form = UploadForm::read(&headers, body, &state.multipart).await?;

    let Some(image) = form.image else {
        return Err(FeedError::bad_request(NO_IMAGE).into());
    };

    let upload = ImageUpload::new(
        image.data,
        image
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        image.filename,
    )
    .with_caption(form.caption);

    let post = state
        .service
        .upload(upload)
        .await
        .map_err(|e| FeedError::normalize(e, UPLOAD_FAILED))?;

    tracing::info!(id = %post.id, "post.created");
    Ok(Json(UploadResponse {
        message: UPLOADED,
        post,
    }))
}

async fn list_posts(State(state): State<FeedState>) -> Result<Json<Vec<Post>>, FeedAxumError> {
    let posts = state
        .service
        .feed()
        .await
        .map_err(|e| FeedError::normalize(e, FEED_FAILED))?;

    tracing::debug!(count = posts.len(), "posts.listed");
    Ok(Json(posts))
}
