//! snapfeed-docstore: where post records live.
//!
//! [`PostStore`] is the whole contract: persist a new post, and read every
//! post back newest first. [`MongoPostStore`] talks to MongoDB;
//! [`MemoryPostStore`] keeps posts in process for development and tests.

mod error;
mod memory;
mod mongo;
mod store;

pub use error::{DocError, DocResult};
pub use memory::MemoryPostStore;
pub use mongo::{MongoConfig, MongoPostStore};
pub use store::PostStore;
