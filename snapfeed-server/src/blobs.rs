//! Read route for the in-memory blob store, so signed URLs handed out in
//! development resolve the same way presigned S3 URLs do.

use axum::{
    extract::{Path, Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use snapfeed_axum::FeedAxumError;
use snapfeed_blob::{BlobError, MemoryBlobStore};
use snapfeed_core::FeedError;

#[derive(Debug, Deserialize)]
struct Signature {
    token: Option<String>,
}

pub fn router(store: MemoryBlobStore) -> Router<()> {
    Router::new()
        .route("/blobs/{key}", get(read_blob))
        .with_state(store)
}

async fn read_blob(
    State(store): State<MemoryBlobStore>,
    Path(key): Path<String>,
    Query(signature): Query<Signature>,
) -> Result<Response, FeedAxumError> {
    let token = signature
        .token
        .ok_or_else(|| FeedError::forbidden("Missing signature"))?;

    let blob = store.read_signed(&key, &token).await.map_err(|err| match err {
        BlobError::Denied { reason } => FeedError::forbidden(format!("Access denied: {reason}")),
        BlobError::NotFound { key } => FeedError::not_found(format!("Blob not found: {key}")),
        other => FeedError::general_error("Failed to read blob").with_source(other.into()),
    })?;

    let content_type = blob
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(([(CONTENT_TYPE, content_type)], blob.data).into_response())
}
