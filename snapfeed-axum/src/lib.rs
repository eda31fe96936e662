//! snapfeed-axum: Axum adapter for snapfeed.
//!
//! Builds the HTTP surface (`/`, `/upload`, `/posts`) around any
//! [`snapfeed_core::FeedService`], plus the middleware stack every response
//! goes through.

pub mod app;
pub mod multipart;
pub mod routes;
pub mod state;
mod error;
pub use error::FeedAxumError;
pub use state::FeedState;

pub use app::{axum, AxumApp};
pub use multipart::{MultipartConfig, UploadForm, UploadedFile};
