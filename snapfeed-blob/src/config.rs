use std::time::Duration;

use snapfeed_core::env_var_or;

/// Configuration for blob operations
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// Container (bucket) that holds every uploaded image
    pub container: String,

    /// Absolute max size allowed for a single blob (safety guard)
    pub max_blob_bytes: u64,

    /// How long a signed read URL stays valid after it is generated
    pub signed_url_ttl: Duration,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            container: "media".to_string(),
            max_blob_bytes: 25 * 1024 * 1024, // 25MB
            signed_url_ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl BlobConfig {
    /// Defaults overridden by `BLOB_CONTAINER_NAME`, `UPLOAD_MAX_FILE_MB`
    /// and `SIGNED_URL_TTL_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            container: env_var_or("BLOB_CONTAINER_NAME", defaults.container),
            max_blob_bytes: env_var_or("UPLOAD_MAX_FILE_MB", 25u64).saturating_mul(1024 * 1024),
            signed_url_ttl: Duration::from_secs(env_var_or(
                "SIGNED_URL_TTL_SECS",
                defaults.signed_url_ttl.as_secs(),
            )),
        }
    }

    /// Set max blob size
    pub fn with_max_blob_bytes(mut self, bytes: u64) -> Self {
        self.max_blob_bytes = bytes;
        self
    }

    /// Set signed URL lifetime
    pub fn with_signed_url_ttl(mut self, ttl: Duration) -> Self {
        self.signed_url_ttl = ttl;
        self
    }
}
