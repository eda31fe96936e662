use std::sync::Arc;

use bytes::Bytes;

use crate::{
    BlobConfig, BlobError, BlobKeyStrategy, BlobPut, BlobReceipt, BlobResult, DefaultKeyStrategy,
    SignedUrl, SignedUrlBlobStore,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The blob adapter - this is what the posts service embeds
#[derive(Clone)]
pub struct BlobAdapter {
    store: Arc<dyn SignedUrlBlobStore>,
    keys: Arc<dyn BlobKeyStrategy>,
    config: BlobConfig,
}

impl BlobAdapter {
    /// Create a new blob adapter
    pub fn new<S: SignedUrlBlobStore + 'static>(store: S, config: BlobConfig) -> Self {
        Self {
            store: Arc::new(store),
            keys: Arc::new(DefaultKeyStrategy),
            config,
        }
    }

    /// Create the store's container if needed
    pub async fn ensure_container(&self) -> BlobResult<()> {
        self.store.ensure_container().await?;
        tracing::info!(container = %self.store.container(), "blob container ready");
        Ok(())
    }

    /// Store a blob (single-shot upload)
    pub async fn put(&self, put: BlobPut, data: Bytes) -> BlobResult<BlobReceipt> {
        let size = data.len() as u64;
        if size > self.config.max_blob_bytes {
            return Err(BlobError::TooLarge {
                size,
                max: self.config.max_blob_bytes,
            });
        }

        let key = self.keys.object_key(&put.id, put.filename.as_deref());
        let content_type = put
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let result = self.store.put(&key, &content_type, data).await?;
        tracing::debug!(key = %key, size = result.size_bytes, "blob.put");

        let url = self.store.object_url(&key);
        Ok(BlobReceipt {
            key,
            url,
            size_bytes: result.size_bytes,
            content_type,
        })
    }

    /// Signed read URL for a stored blob, valid for the configured TTL
    pub async fn sign_read(&self, receipt: &BlobReceipt) -> BlobResult<SignedUrl> {
        self.store
            .sign_get(&receipt.key, self.config.signed_url_ttl)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlobStore, MemoryBlobStore};
    use std::time::Duration;

    fn adapter(config: BlobConfig) -> (MemoryBlobStore, BlobAdapter) {
        let store = MemoryBlobStore::new("media", "http://localhost:3000");
        let adapter = BlobAdapter::new(store.clone(), config);
        (store, adapter)
    }

    #[tokio::test]
    async fn put_derives_key_from_id_and_filename() {
        let (store, blobs) = adapter(BlobConfig::default());
        let put = BlobPut::new("id-1")
            .with_content_type("image/png")
            .with_filename("my cat.png");

        let receipt = blobs.put(put, Bytes::from_static(b"png")).await.unwrap();

        assert_eq!(receipt.key, "id-1-my_cat.png");
        assert_eq!(receipt.size_bytes, 3);
        assert_eq!(receipt.url, "http://localhost:3000/blobs/id-1-my_cat.png");
        let stored = store.get(&receipt.key).await.unwrap();
        assert_eq!(stored.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn put_defaults_content_type() {
        let (_store, blobs) = adapter(BlobConfig::default());
        let receipt = blobs
            .put(BlobPut::new("id-2"), Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert_eq!(receipt.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn put_rejects_oversized_blobs() {
        let (store, blobs) = adapter(BlobConfig::default().with_max_blob_bytes(2));
        let err = blobs
            .put(BlobPut::new("id-3").with_filename("big.png"), Bytes::from_static(b"abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, BlobError::TooLarge { size: 3, max: 2 }));
        assert!(store.get("id-3-big.png").await.is_err());
    }

    #[tokio::test]
    async fn sign_read_uses_configured_ttl() {
        let ttl = Duration::from_secs(90);
        let (_store, blobs) = adapter(BlobConfig::default().with_signed_url_ttl(ttl));
        let receipt = blobs
            .put(BlobPut::new("id-4"), Bytes::from_static(b"x"))
            .await
            .unwrap();

        let before = chrono::Utc::now();
        let signed = blobs.sign_read(&receipt).await.unwrap();
        let lifetime = signed.expires_at - before;

        assert!(lifetime <= chrono::Duration::seconds(90));
        assert!(lifetime > chrono::Duration::seconds(85));
    }
}
