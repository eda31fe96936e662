use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use snapfeed_core::errors::FeedError;

#[derive(Debug)]
pub struct FeedAxumError(pub anyhow::Error);

impl From<anyhow::Error> for FeedAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<FeedError> for FeedAxumError {
    fn from(e: FeedError) -> Self {
        Self(e.into_anyhow())
    }
}

fn respond(err: &FeedError) -> Response {
    if err.kind.is_server_error() {
        tracing::error!(error = ?err.source_message(), "{}", err);
    } else {
        tracing::warn!("{}", err);
    }

    let status = StatusCode::from_u16(err.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err.to_json())).into_response()
}

impl IntoResponse for FeedAxumError {
    fn into_response(self) -> Response {
        // If it's a FeedError (even if wrapped by anyhow contexts), keep its kind
        if let Some(feed) = FeedError::find(&self.0) {
            return respond(feed);
        }

        // Fallback: anything else is a 500 carrying the original message
        respond(&FeedError::general_error("Internal server error").with_source(self.0))
    }
}
