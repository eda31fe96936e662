//! snapfeed-server: the photo feed as a runnable service.
//!
//! [`build`] turns [`Settings`] into a ready [`AxumApp`]: it connects the
//! configured blob and document stores, provisions the blob container, and
//! mounts the feed routes, the client UI and (for the in-memory blob store)
//! the signed blob route.

mod blobs;
mod services;
mod settings;

use std::sync::Arc;

use snapfeed_axum::{axum, AxumApp, FeedState};
use snapfeed_blob::{BlobAdapter, MemoryBlobStore, S3CompatibleStore, S3Config};
use snapfeed_docstore::{MemoryPostStore, MongoConfig, MongoPostStore, PostStore};

pub use services::PostsService;
pub use settings::{BlobBackend, DocBackend, Settings};

/// Store handles shared by every request.
#[derive(Clone)]
pub struct Stores {
    pub blobs: BlobAdapter,
    pub posts: Arc<dyn PostStore>,
    /// Set when blobs live in process; its signed URLs are served by this app
    pub memory_blobs: Option<MemoryBlobStore>,
}

impl Stores {
    /// Connect the backends named in `settings`.
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let (blobs, memory_blobs) = match settings.blob_backend {
            BlobBackend::Memory => {
                let store = MemoryBlobStore::new(settings.blob.container.clone(), settings.public_base_url.clone());
                (BlobAdapter::new(store.clone(), settings.blob.clone()), Some(store))
            }
            BlobBackend::S3 => {
                let config = S3Config::from_env(settings.blob.container.clone())?;
                let store = S3CompatibleStore::new(config).await;
                (BlobAdapter::new(store, settings.blob.clone()), None)
            }
        };

        let posts: Arc<dyn PostStore> = match settings.doc_backend {
            DocBackend::Memory => Arc::new(MemoryPostStore::new()),
            DocBackend::Mongo => Arc::new(MongoPostStore::connect(&MongoConfig::from_env()?).await?),
        };

        tracing::info!(
            blob_backend = ?settings.blob_backend,
            doc_backend = ?settings.doc_backend,
            container = %settings.blob.container,
            "stores connected"
        );

        Ok(Self {
            blobs,
            posts,
            memory_blobs,
        })
    }
}

/// Assemble the HTTP app around already connected stores.
pub fn app(settings: &Settings, stores: Stores) -> AxumApp {
    let service = Arc::new(PostsService::new(stores.blobs, stores.posts));
    let state = FeedState::new(service).with_multipart(settings.multipart());

    let mut ax = axum(state).service("/health", || async { "ok" });
    if let Some(store) = stores.memory_blobs {
        ax = ax.merge(blobs::router(store));
    }

    ax.with_static_dir(&settings.static_dir).with_http_layers()
}

pub async fn build(settings: &Settings) -> anyhow::Result<AxumApp> {
    let stores = Stores::connect(settings).await?;
    stores.blobs.ensure_container().await?;

    Ok(app(settings, stores))
}
