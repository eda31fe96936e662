use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::Post;

/// An image received from a client, ready to be published.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Bytes,
    pub content_type: String,
    /// Filename as supplied by the client, unsanitized.
    pub filename: String,
    pub caption: String,
}

impl ImageUpload {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            filename: filename.into(),
            caption: String::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// The two operations a feed exposes to the outside world.
///
/// Transports (HTTP today) call these and render the result;
/// failures are `anyhow::Error`s that may carry a [`crate::FeedError`].
#[async_trait]
pub trait FeedService: Send + Sync {
    /// Store the image, sign a read URL for it and persist a new [`Post`].
    async fn upload(&self, upload: ImageUpload) -> Result<Post>;

    /// Every post, newest first.
    async fn feed(&self) -> Result<Vec<Post>>;
}
