use chrono::{DateTime, Utc};

/// What the caller knows about a blob before it is stored
#[derive(Debug, Clone)]
pub struct BlobPut {
    /// Unique id the key is derived from
    pub id: String,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl BlobPut {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            content_type: None,
            filename: None,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Receipt returned after successfully storing a blob
#[derive(Debug, Clone)]
pub struct BlobReceipt {
    pub key: String,
    /// Permanent, unsigned object URL
    pub url: String,
    pub size_bytes: u64,
    pub content_type: String,
}

/// A read-only URL that stops working at `expires_at`
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}
