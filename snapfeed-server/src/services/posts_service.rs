use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use snapfeed_blob::{BlobAdapter, BlobError, BlobPut};
use snapfeed_core::{FeedError, FeedService, ImageUpload, Post, PostId};
use snapfeed_docstore::PostStore;

/// Publishes images: blob first, then the post record pointing at it.
pub struct PostsService {
    blobs: BlobAdapter,
    posts: Arc<dyn PostStore>,
}

impl PostsService {
    pub fn new(blobs: BlobAdapter, posts: Arc<dyn PostStore>) -> Self {
        Self { blobs, posts }
    }
}

fn blob_error(err: BlobError) -> anyhow::Error {
    match err {
        BlobError::TooLarge { size, max } => FeedError::payload_too_large(format!(
            "Image is {size} bytes, the limit is {max} bytes"
        ))
        .into_anyhow(),
        other => anyhow::Error::new(other),
    }
}

#[async_trait]
impl FeedService for PostsService {
    async fn upload(&self, upload: ImageUpload) -> Result<Post> {
        let (id, created_at) = PostId::issue();
        let size = upload.size_bytes();

        let put = BlobPut::new(id.as_str())
            .with_content_type(upload.content_type)
            .with_filename(upload.filename);
        let receipt = self.blobs.put(put, upload.data).await.map_err(blob_error)?;
        let signed = self.blobs.sign_read(&receipt).await.map_err(blob_error)?;

        // A failed write here leaves the blob behind; nothing cleans it up.
        let post = Post::new(id, upload.caption, signed.url, receipt.url, created_at);
        let post = self.posts.create(post).await?;

        tracing::info!(id = %post.id, key = %receipt.key, size, "image published");
        Ok(post)
    }

    async fn feed(&self) -> Result<Vec<Post>> {
        let posts = self.posts.find_newest_first().await?;
        tracing::info!(count = posts.len(), "feed read");
        Ok(posts)
    }
}
