use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{BlobError, BlobResult, BlobStore, GetResult, PutResult, SignedUrl, SignedUrlBlobStore};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

#[derive(Debug, Clone)]
struct ReadGrant {
    key: String,
    expires_at: DateTime<Utc>,
}

struct MemoryInner {
    container: String,
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
    grants: RwLock<HashMap<String, ReadGrant>>,
}

/// Process-local blob store.
///
/// Objects live at `<base_url>/blobs/<key>`; that URL alone is refused.
/// [`SignedUrlBlobStore::sign_get`] appends a random `token` that is bound to
/// the key and expires, so a server mounting [`MemoryBlobStore::read_signed`]
/// behind that path behaves like a presigned object store.
#[derive(Clone)]
pub struct MemoryBlobStore {
    inner: Arc<MemoryInner>,
}

impl MemoryBlobStore {
    pub fn new<C: Into<String>, B: Into<String>>(container: C, base_url: B) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                container: container.into(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                objects: RwLock::new(HashMap::new()),
                grants: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Read a blob with a token issued by `sign_get`, checked against now
    pub async fn read_signed(&self, key: &str, token: &str) -> BlobResult<GetResult> {
        self.read_signed_at(key, token, Utc::now()).await
    }

    /// Read a blob with a token issued by `sign_get`, checked against `at`
    pub async fn read_signed_at(&self, key: &str, token: &str, at: DateTime<Utc>) -> BlobResult<GetResult> {
        let grant = self
            .inner
            .grants
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| BlobError::denied("unknown signature"))?;

        if grant.key != key {
            return Err(BlobError::denied("signature does not match blob"));
        }
        if at >= grant.expires_at {
            return Err(BlobError::denied("signature expired"));
        }

        self.get(key).await
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.inner.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn container(&self) -> &str {
        &self.inner.container
    }

    async fn ensure_container(&self) -> BlobResult<()> {
        Ok(())
    }

    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> BlobResult<PutResult> {
        let size_bytes = data.len() as u64;

        self.inner.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(PutResult { size_bytes })
    }

    async fn get(&self, key: &str) -> BlobResult<GetResult> {
        let objects = self.inner.objects.read().await;
        let object = objects.get(key).ok_or_else(|| BlobError::not_found(key))?;

        Ok(GetResult {
            data: object.data.clone(),
            content_type: Some(object.content_type.clone()),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/blobs/{}", self.inner.base_url, key)
    }
}

#[async_trait]
impl SignedUrlBlobStore for MemoryBlobStore {
    async fn sign_get(&self, key: &str, expires_in: Duration) -> BlobResult<SignedUrl> {
        let ttl = chrono::Duration::from_std(expires_in)
            .map_err(|_| BlobError::invalid("signed URL lifetime out of range"))?;
        let now = Utc::now();
        let expires_at = now + ttl;
        let token = Uuid::new_v4().simple().to_string();

        let mut grants = self.inner.grants.write().await;
        grants.retain(|_, grant| grant.expires_at > now);
        grants.insert(
            token.clone(),
            ReadGrant {
                key: key.to_string(),
                expires_at,
            },
        );

        Ok(SignedUrl {
            url: format!("{}?token={}", self.object_url(key), token),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_of(url: &str) -> &str {
        url.split("token=").nth(1).unwrap()
    }

    async fn store_with(key: &str, data: &'static [u8]) -> MemoryBlobStore {
        let store = MemoryBlobStore::new("media", "http://localhost:3000/");
        store.put(key, "image/jpeg", Bytes::from_static(data)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn signed_read_returns_bytes_before_expiry() {
        let store = store_with("k.jpg", b"jpeg").await;
        let signed = store.sign_get("k.jpg", Duration::from_secs(3600)).await.unwrap();

        assert!(signed.url.starts_with("http://localhost:3000/blobs/k.jpg?token="));
        let got = store.read_signed("k.jpg", token_of(&signed.url)).await.unwrap();
        assert_eq!(&got.data[..], b"jpeg");
        assert_eq!(got.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn signed_read_fails_after_expiry() {
        let store = store_with("k.jpg", b"jpeg").await;
        let signed = store.sign_get("k.jpg", Duration::from_secs(3600)).await.unwrap();
        let later = signed.expires_at + chrono::Duration::seconds(1);

        let err = store
            .read_signed_at("k.jpg", token_of(&signed.url), later)
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::Denied { .. }));
    }

    #[tokio::test]
    async fn token_is_bound_to_its_key() {
        let store = store_with("a.jpg", b"a").await;
        store.put("b.jpg", "image/jpeg", Bytes::from_static(b"b")).await.unwrap();
        let signed = store.sign_get("a.jpg", Duration::from_secs(60)).await.unwrap();

        let err = store.read_signed("b.jpg", token_of(&signed.url)).await.unwrap_err();
        assert!(matches!(err, BlobError::Denied { .. }));
    }

    #[tokio::test]
    async fn unknown_token_is_denied() {
        let store = store_with("a.jpg", b"a").await;
        let err = store.read_signed("a.jpg", "nope").await.unwrap_err();
        assert!(matches!(err, BlobError::Denied { .. }));
    }

    #[tokio::test]
    async fn object_url_has_no_credentials() {
        let store = store_with("a.jpg", b"a").await;
        assert_eq!(store.object_url("a.jpg"), "http://localhost:3000/blobs/a.jpg");
        assert_eq!(store.len().await, 1);
    }
}
