use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use snapfeed_core::{env_opt, env_var_or, Post};

use crate::{DocError, DocResult, PostStore};

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB connection settings
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub connection_string: String,
    pub database: String,
    pub collection: String,
}

impl MongoConfig {
    pub fn new<S: Into<String>>(connection_string: S) -> Self {
        Self {
            connection_string: connection_string.into(),
            database: "instagramdb".to_string(),
            collection: "posts".to_string(),
        }
    }

    /// `DOCSTORE_CONNECTION_STRING` (required), `DOCSTORE_DATABASE`,
    /// `DOCSTORE_COLLECTION`
    pub fn from_env() -> DocResult<Self> {
        let connection_string = env_opt("DOCSTORE_CONNECTION_STRING")
            .ok_or_else(|| DocError::invalid("DOCSTORE_CONNECTION_STRING environment variable required"))?;
        let defaults = Self::new(connection_string);

        Ok(Self {
            database: env_var_or("DOCSTORE_DATABASE", defaults.database.clone()),
            collection: env_var_or("DOCSTORE_COLLECTION", defaults.collection.clone()),
            ..defaults
        })
    }
}

#[derive(Clone)]
pub struct MongoPostStore {
    posts: Collection<Post>,
}

impl MongoPostStore {
    /// Connect and make sure the feed indexes exist.
    pub async fn connect(config: &MongoConfig) -> DocResult<Self> {
        let options = ClientOptions::parse(&config.connection_string).await?;
        let client = Client::with_options(options)?;
        let posts = client
            .database(&config.database)
            .collection::<Post>(&config.collection);

        let store = Self { posts };
        store.ensure_indexes().await?;

        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "docstore.connected"
        );
        Ok(store)
    }

    async fn ensure_indexes(&self) -> DocResult<()> {
        self.posts
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "id": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        self.posts
            .create_index(IndexModel::builder().keys(doc! { "createdAt": -1, "id": -1 }).build())
            .await?;
        Ok(())
    }

    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
        )
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn create(&self, post: Post) -> DocResult<Post> {
        match self.posts.insert_one(&post).await {
            Ok(_) => Ok(post),
            Err(err) if Self::is_duplicate_key(&err) => Err(DocError::conflict(post.id.as_str())),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_newest_first(&self) -> DocResult<Vec<Post>> {
        let cursor = self
            .posts
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "id": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_the_feed_layout() {
        let config = MongoConfig::new("mongodb://localhost:27017");
        assert_eq!(config.database, "instagramdb");
        assert_eq!(config.collection, "posts");
    }
}
