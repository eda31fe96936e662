use std::collections::HashSet;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderMap};
use bytes::Bytes;
use snapfeed_core::FeedError;

/// Configuration for reading the upload form
#[derive(Clone, Debug)]
pub struct MultipartConfig {
    /// Maximum file size in bytes
    pub max_file_size: u64,
    /// Maximum total request size in bytes
    pub max_total_size: u64,
    /// Allowed content types for the image (empty = all allowed)
    pub allowed_content_types: HashSet<String>,
    /// Field carrying the image
    pub file_field: String,
    /// Field carrying the caption
    pub caption_field: String,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_file_size: 25 * 1024 * 1024, // 25MB
            max_total_size: 26 * 1024 * 1024,
            allowed_content_types: HashSet::new(), // Allow all
            file_field: "image".to_string(),
            caption_field: "caption".to_string(),
        }
    }
}

impl MultipartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum file size in bytes; the request limit follows it with
    /// 1MB of headroom for the other fields.
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self.max_total_size = size.saturating_add(1024 * 1024);
        self
    }

    /// Add allowed content type for the image
    pub fn allow_content_type(mut self, content_type: &str) -> Self {
        self.allowed_content_types
            .insert(content_type.trim().to_ascii_lowercase());
        self
    }

    fn allows(&self, content_type: &str) -> bool {
        self.allowed_content_types.is_empty()
            || self
                .allowed_content_types
                .contains(&content_type.to_ascii_lowercase())
    }
}

/// An uploaded file as the client sent it
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// The upload form: at most one image and a caption (empty when absent)
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub image: Option<UploadedFile>,
    pub caption: String,
}

impl UploadForm {
    /// Read the form from a request.
    ///
    /// A request that is not `multipart/form-data` yields an empty form, the
    /// same as a form without an image. A file input left empty by a browser
    /// (no filename, no bytes) also counts as no image.
    pub async fn read(headers: &HeaderMap, body: Body, config: &MultipartConfig) -> Result<Self, FeedError> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type
            .to_ascii_lowercase()
            .starts_with("multipart/form-data")
        {
            tracing::debug!(content_type, "upload form is not multipart");
            return Ok(Self::default());
        }

        let boundary = multer::parse_boundary(content_type)
            .map_err(|e| FeedError::bad_request(format!("Failed to parse multipart data: {}", e)))?;

        let constraints = multer::Constraints::new().size_limit(
            multer::SizeLimit::new()
                .whole_stream(config.max_total_size)
                .per_field(config.max_file_size),
        );
        let mut multipart = multer::Multipart::with_constraints(body.into_data_stream(), boundary, constraints);

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(map_multer_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == config.file_field {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let data = field.bytes().await.map_err(map_multer_error)?;

                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                if form.image.is_some() {
                    return Err(FeedError::bad_request(format!(
                        "Only one '{}' file may be uploaded",
                        config.file_field
                    )));
                }
                if let Some(ct) = &content_type {
                    if !config.allows(ct) {
                        return Err(FeedError::unsupported_media_type(format!(
                            "Content type '{}' is not allowed",
                            ct
                        )));
                    }
                }

                form.image = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            } else if name == config.caption_field {
                form.caption = field.text().await.map_err(map_multer_error)?;
            }
            // Other fields are drained and ignored
        }

        Ok(form)
    }
}

fn map_multer_error(err: multer::Error) -> FeedError {
    match err {
        multer::Error::FieldSizeExceeded { limit, .. } | multer::Error::StreamSizeExceeded { limit } => {
            FeedError::payload_too_large(format!("Upload exceeds the maximum size of {} bytes", limit))
        }
        other => FeedError::bad_request(format!("Failed to parse multipart data: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use snapfeed_core::ErrorKind;

    const BOUNDARY: &str = "snapfeed-test-boundary";

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}")).unwrap(),
        );
        headers
    }

    fn file_part(name: &str, filename: &str, content_type: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
        )
    }

    fn text_part(name: &str, value: &str) -> String {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    }

    fn body(parts: &[String]) -> Body {
        Body::from(format!("{}--{BOUNDARY}--\r\n", parts.concat()))
    }

    #[tokio::test]
    async fn reads_image_and_caption() {
        let parts = [
            file_part("image", "cat.png", "image/png", "PNGDATA"),
            text_part("caption", "hello"),
        ];
        let form = UploadForm::read(&headers(), body(&parts), &MultipartConfig::default())
            .await
            .unwrap();

        let image = form.image.unwrap();
        assert_eq!(image.filename, "cat.png");
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(&image.data[..], b"PNGDATA");
        assert_eq!(form.caption, "hello");
    }

    #[tokio::test]
    async fn empty_file_input_counts_as_no_image() {
        let parts = [
            file_part("image", "", "application/octet-stream", ""),
            text_part("caption", "just words"),
        ];
        let form = UploadForm::read(&headers(), body(&parts), &MultipartConfig::default())
            .await
            .unwrap();
        assert!(form.image.is_none());
        assert_eq!(form.caption, "just words");
    }

    #[tokio::test]
    async fn non_multipart_is_an_empty_form() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let form = UploadForm::read(&headers, Body::from("{}"), &MultipartConfig::default())
            .await
            .unwrap();
        assert!(form.image.is_none());
        assert_eq!(form.caption, "");
    }

    #[tokio::test]
    async fn media_type_is_matched_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!("Multipart/Form-Data; boundary={BOUNDARY}")).unwrap(),
        );
        let parts = [file_part("image", "cat.png", "image/png", "PNGDATA")];
        let form = UploadForm::read(&headers, body(&parts), &MultipartConfig::default())
            .await
            .unwrap();

        assert_eq!(form.image.unwrap().filename, "cat.png");
    }

    #[test]
    fn huge_file_limit_saturates() {
        let config = MultipartConfig::default().max_file_size(u64::MAX);
        assert_eq!(config.max_file_size, u64::MAX);
        assert_eq!(config.max_total_size, u64::MAX);
    }

    #[tokio::test]
    async fn oversized_file_is_payload_too_large() {
        let parts = [file_part("image", "big.png", "image/png", "0123456789")];
        let config = MultipartConfig::default().max_file_size(4);
        let err = UploadForm::read(&headers(), body(&parts), &config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::PayloadTooLarge);
    }

    #[tokio::test]
    async fn disallowed_content_type_is_rejected() {
        let parts = [file_part("image", "doc.pdf", "application/pdf", "%PDF")];
        let config = MultipartConfig::default()
            .allow_content_type("image/png")
            .allow_content_type("image/jpeg");
        let err = UploadForm::read(&headers(), body(&parts), &config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedMediaType);
    }

    #[tokio::test]
    async fn second_image_is_rejected() {
        let parts = [
            file_part("image", "a.png", "image/png", "A"),
            file_part("image", "b.png", "image/png", "B"),
        ];
        let err = UploadForm::read(&headers(), body(&parts), &MultipartConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn truncated_body_is_bad_request() {
        let truncated = Body::from(format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nno end"
        ));
        let err = UploadForm::read(&headers(), truncated, &MultipartConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadRequest);
    }
}
