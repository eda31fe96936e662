use std::sync::Arc;

use async_trait::async_trait;
use snapfeed_core::Post;
use tokio::sync::RwLock;

use crate::{DocError, DocResult, PostStore};

#[derive(Clone, Default)]
pub struct MemoryPostStore {
    posts: Arc<RwLock<Vec<Post>>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, post: Post) -> DocResult<Post> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(DocError::conflict(post.id.as_str()));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn find_newest_first(&self) -> DocResult<Vec<Post>> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(Post::newest_first);
        Ok(posts)
    }
}
