//! snapfeed-core: transport-agnostic core for snapfeed.
//!
//! Holds the single persisted entity ([`Post`]), the contract every feed
//! backend implements ([`FeedService`]) and the structured error type that
//! flows through `anyhow::Error` up to whichever transport serves the feed.

pub mod config;
pub mod errors;
pub mod post;
pub mod service;

pub use config::{env_list, env_opt, env_var_or};
pub use errors::{ErrorKind, FeedError};
pub use post::{Post, PostId};
pub use service::{FeedService, ImageUpload};
