use std::sync::Arc;

use snapfeed_core::FeedService;

use crate::MultipartConfig;

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct FeedState {
    pub service: Arc<dyn FeedService>,
    pub multipart: Arc<MultipartConfig>,
}

impl FeedState {
    pub fn new(service: Arc<dyn FeedService>) -> Self {
        Self {
            service,
            multipart: Arc::new(MultipartConfig::default()),
        }
    }

    pub fn with_multipart(mut self, config: MultipartConfig) -> Self {
        self.multipart = Arc::new(config);
        self
    }
}
