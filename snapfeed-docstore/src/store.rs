use async_trait::async_trait;
use snapfeed_core::Post;

use crate::DocResult;

/// Persistence for posts. Posts are append-only: there is no update or
/// delete.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post and return it as stored.
    async fn create(&self, post: Post) -> DocResult<Post>;

    /// Every post ordered by `created_at` descending, ties by id descending.
    async fn find_newest_first(&self) -> DocResult<Vec<Post>>;
}
