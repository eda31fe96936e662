//! # Errors
//!
//! snapfeed uses one structured error for everything a client can observe.
//! Core goals:
//! - a small set of kinds with fixed status codes
//! - can be carried through anyhow::Error (services return `anyhow::Result`)
//! - transport-agnostic (the HTTP crate decides how to serialize)
//!
//! The JSON payload is `{ "message": ... }`, plus `"error"` carrying the
//! underlying failure's message when a source is attached.

use std::fmt;

use anyhow::Error as AnyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,           // 400
    Forbidden,            // 403
    NotFound,             // 404
    PayloadTooLarge,      // 413
    UnsupportedMediaType, // 415
    GeneralError,         // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::UnsupportedMediaType => 415,
            ErrorKind::GeneralError => 500,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PayloadTooLarge => "PayloadTooLarge",
            ErrorKind::UnsupportedMediaType => "UnsupportedMediaType",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

/// A structured snapfeed error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct FeedError {
    pub kind: ErrorKind,
    pub message: String,
    pub source: Option<AnyError>,
}

impl FeedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Convert into `anyhow::Error` so it flows through service results.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Find a `FeedError` anywhere in an `anyhow::Error` chain.
    pub fn find(err: &AnyError) -> Option<&FeedError> {
        err.chain().find_map(|e| e.downcast_ref::<FeedError>())
    }

    /// Turn any error into a FeedError:
    /// - if it's already a FeedError, keep it
    /// - otherwise wrap it as a GeneralError with `message`, keeping the
    ///   original as source so its text reaches the client
    pub fn normalize(err: AnyError, message: impl Into<String>) -> FeedError {
        match err.downcast::<FeedError>() {
            Ok(feed) => feed,
            Err(other) => FeedError::general_error(message).with_source(other),
        }
    }

    /// The underlying failure's message, if any.
    pub fn source_message(&self) -> Option<String> {
        self.source.as_ref().map(|s| s.to_string())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, msg)
    }
    pub fn unsupported_media_type(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedMediaType, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }

    /// Client payload: `{message}` or `{message, error}`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::json!({ "message": self.message });
        if let Some(source) = self.source_message() {
            body["error"] = serde_json::Value::String(source);
        }
        body
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_has_message_only() {
        let err = FeedError::bad_request("No image uploaded");
        assert_eq!(err.code(), 400);
        assert_eq!(err.to_json(), serde_json::json!({"message": "No image uploaded"}));
    }

    #[test]
    fn normalize_wraps_foreign_errors_and_keeps_their_text() {
        let err = FeedError::normalize(anyhow::anyhow!("connection reset"), "Upload failed");
        assert_eq!(err.kind, ErrorKind::GeneralError);
        let body = err.to_json();
        assert_eq!(body["message"], "Upload failed");
        assert_eq!(body["error"], "connection reset");
    }

    #[test]
    fn normalize_keeps_feed_errors() {
        let err = FeedError::payload_too_large("too big").into_anyhow();
        let err = FeedError::normalize(err, "Upload failed");
        assert_eq!(err.kind, ErrorKind::PayloadTooLarge);
        assert_eq!(err.message, "too big");
    }

    #[test]
    fn find_looks_through_context() {
        let err = FeedError::forbidden("expired")
            .into_anyhow()
            .context("while serving blob");
        let found = FeedError::find(&err).expect("feed error in chain");
        assert_eq!(found.kind, ErrorKind::Forbidden);
    }
}
