use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{BlobResult, SignedUrl};

/// Core blob storage operations - must be implemented by all storage backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Name of the container (bucket) this store writes to
    fn container(&self) -> &str;

    /// Create the container if it does not exist yet
    async fn ensure_container(&self) -> BlobResult<()>;

    /// Store a blob
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> BlobResult<PutResult>;

    /// Read a whole blob back
    async fn get(&self, key: &str) -> BlobResult<GetResult>;

    /// Permanent, unsigned locator of the object. Fetching it requires
    /// store credentials.
    fn object_url(&self, key: &str) -> String;
}

/// Signed URL support
#[async_trait]
pub trait SignedUrlBlobStore: BlobStore {
    /// Generate a read-only URL that stops working after `expires_in`
    async fn sign_get(&self, key: &str, expires_in: Duration) -> BlobResult<SignedUrl>;
}

/// Result of a successful put operation
#[derive(Debug, Clone)]
pub struct PutResult {
    pub size_bytes: u64,
}

/// Result of a get operation
#[derive(Debug, Clone)]
pub struct GetResult {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Strategy for generating blob keys
pub trait BlobKeyStrategy: Send + Sync {
    fn object_key(&self, blob_id: &str, filename: Option<&str>) -> String;
}

/// Default key strategy: `<blob id>-<sanitized filename>`.
///
/// The id is unique per upload, so two files with the same name never share
/// a key.
#[derive(Debug, Clone)]
pub struct DefaultKeyStrategy;

impl BlobKeyStrategy for DefaultKeyStrategy {
    fn object_key(&self, blob_id: &str, filename: Option<&str>) -> String {
        format!("{}-{}", blob_id, sanitize_filename(filename.unwrap_or_default()))
    }
}

/// Keep ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Path components are dropped so a key never nests.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(['.', '_']).is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("cat-01_final.PNG"), "cat-01_final.PNG");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("été.png"), "_t_.png");
    }

    #[test]
    fn sanitize_drops_directories_and_empty_names() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\pic.gif"), "pic.gif");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
    }

    #[test]
    fn default_keys_are_prefixed_by_id() {
        let keys = DefaultKeyStrategy;
        assert_eq!(keys.object_key("abc", Some("a b.png")), "abc-a_b.png");
        assert_eq!(keys.object_key("abc", None), "abc-upload");
        assert_ne!(
            keys.object_key("id-1", Some("same.png")),
            keys.object_key("id-2", Some("same.png"))
        );
    }
}
