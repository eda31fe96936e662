//! # snapfeed-blob: blob storage for snapfeed
//!
//! Stores uploaded images and hands out time-limited, read-only URLs for
//! them. Two stores ship with the crate:
//!
//! - [`S3CompatibleStore`]: any S3-compatible service through `aws-sdk-s3`;
//!   signed URLs are SigV4 presigned GETs built from structured credentials.
//! - [`MemoryBlobStore`]: process-local storage for development and tests;
//!   signed URLs carry a random token bound to the key and an expiry.
//!
//! ## Quick Start
//!
//! ```rust
//! use snapfeed_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let store = MemoryBlobStore::new("media", "http://127.0.0.1:3000");
//! let blobs = BlobAdapter::new(store, BlobConfig::default());
//!
//! let put = BlobPut::new("0190b7c4-post")
//!     .with_content_type("image/png")
//!     .with_filename("cat.png");
//! let receipt = blobs.put(put, bytes::Bytes::from_static(b"\x89PNG")).await?;
//! let signed = blobs.sign_read(&receipt).await?;
//!
//! assert!(signed.url.contains("token="));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   PostsService  │  ← upload flow
//! ├─────────────────┤
//! │   BlobAdapter   │  ← keys, size guard, signing TTL
//! ├─────────────────┤
//! │   BlobStore     │  ← storage primitives
//! └─────────────────┘
//! ```

pub mod adapter;
mod config;
mod error;
mod memory_store;
mod receipt;
mod s3_store;
pub mod store;

pub use adapter::BlobAdapter;
pub use config::BlobConfig;
pub use error::{BlobError, BlobResult};
pub use memory_store::MemoryBlobStore;
pub use receipt::{BlobPut, BlobReceipt, SignedUrl};
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{
    sanitize_filename, BlobKeyStrategy, BlobStore, DefaultKeyStrategy, GetResult, PutResult,
    SignedUrlBlobStore,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobAdapter, BlobConfig, BlobError, BlobPut, BlobReceipt, BlobResult, BlobStore,
        MemoryBlobStore, SignedUrl, SignedUrlBlobStore,
    };
}
