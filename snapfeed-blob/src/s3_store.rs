use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream as AwsByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::Utc;
use snapfeed_core::{env_opt, env_var_or};

use crate::{BlobError, BlobResult, BlobStore, GetResult, PutResult, SignedUrl, SignedUrlBlobStore};

const DEFAULT_REGION: &str = "us-east-1";

/// S3-compatible store configuration
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible services (MinIO, RustFS, ...)
    pub endpoint_url: Option<String>,
    /// Path-style addressing; required by most S3-compatible services
    pub force_path_style: bool,
}

impl S3Config {
    /// Load from `BLOB_*` environment variables; `bucket` comes from the
    /// blob config's container name.
    pub fn from_env(bucket: impl Into<String>) -> BlobResult<Self> {
        fn required(key: &str) -> BlobResult<String> {
            env_opt(key).ok_or_else(|| BlobError::invalid(format!("{} environment variable required", key)))
        }

        let endpoint_url = env_opt("BLOB_ENDPOINT_URL");
        Ok(Self {
            bucket: bucket.into(),
            region: env_var_or("BLOB_REGION", DEFAULT_REGION.to_string()),
            access_key_id: required("BLOB_ACCESS_KEY_ID")?,
            secret_access_key: required("BLOB_SECRET_ACCESS_KEY")?,
            force_path_style: env_var_or("BLOB_FORCE_PATH_STYLE", endpoint_url.is_some()),
            endpoint_url,
        })
    }

    /// Unsigned object URL in the addressing style the client uses
    pub fn object_url(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) if self.force_path_style => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            Some(endpoint) => {
                let (scheme, host) = endpoint
                    .trim_end_matches('/')
                    .split_once("://")
                    .unwrap_or(("https", endpoint.as_str()));
                format!("{}://{}.{}/{}", scheme, self.bucket, host, key)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

/// S3-compatible store implementation using the AWS SDK
#[derive(Clone)]
pub struct S3CompatibleStore {
    client: Client,
    config: S3Config,
}

impl S3CompatibleStore {
    pub async fn new(config: S3Config) -> Self {
        let client = Self::create_client(&config).await;
        Self { client, config }
    }

    async fn create_client(config: &S3Config) -> Client {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "snapfeed",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let aws_config = loader.load().await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(config.force_path_style)
                .build(),
        )
    }

    fn map_sdk_error<E, R>(err: SdkError<E, R>) -> BlobError
    where
        E: std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        BlobError::backend_message(DisplayErrorContext(&err).to_string())
    }

    fn bucket_configuration(&self) -> Option<CreateBucketConfiguration> {
        // us-east-1 rejects an explicit location constraint
        if self.config.endpoint_url.is_some() || self.config.region == DEFAULT_REGION {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.config.region.as_str()))
                .build(),
        )
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
    fn container(&self) -> &str {
        &self.config.bucket
    }

    async fn ensure_container(&self) -> BlobResult<()> {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .is_ok();
        if exists {
            return Ok(());
        }

        let mut request = self.client.create_bucket().bucket(&self.config.bucket);
        if let Some(configuration) = self.bucket_configuration() {
            request = request.create_bucket_configuration(configuration);
        }

        match request.send().await {
            Ok(_) => {
                tracing::info!(bucket = %self.config.bucket, "blob.container.created");
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_bucket_already_owned_by_you())
                    .unwrap_or(false) =>
            {
                Ok(())
            }
            Err(err) => Err(Self::map_sdk_error(err)),
        }
    }

    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> BlobResult<PutResult> {
        let size_bytes = data.len() as u64;

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .body(AwsByteStream::from(data))
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        Ok(PutResult { size_bytes })
    }

    async fn get(&self, key: &str) -> BlobResult<GetResult> {
        let result = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(Self::map_sdk_error)?;

        let content_type = result.content_type().map(str::to_string);
        let body = result.body.collect().await.map_err(BlobError::backend)?;

        Ok(GetResult {
            data: body.into_bytes(),
            content_type,
        })
    }

    fn object_url(&self, key: &str) -> String {
        self.config.object_url(key)
    }
}

#[async_trait]
impl SignedUrlBlobStore for S3CompatibleStore {
    async fn sign_get(&self, key: &str, expires_in: Duration) -> BlobResult<SignedUrl> {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(expires_in)
                .map_err(|_| BlobError::invalid("signed URL lifetime out of range"))?;
        let presigning = PresigningConfig::expires_in(expires_in).map_err(BlobError::backend)?;

        let request = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(Self::map_sdk_error)?;

        Ok(SignedUrl {
            url: request.uri().to_string(),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint_url: Option<&str>, force_path_style: bool) -> S3Config {
        S3Config {
            bucket: "media".to_string(),
            region: "eu-west-1".to_string(),
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            endpoint_url: endpoint_url.map(str::to_string),
            force_path_style,
        }
    }

    #[test]
    fn object_url_aws_virtual_hosted() {
        assert_eq!(
            config(None, false).object_url("a.png"),
            "https://media.s3.eu-west-1.amazonaws.com/a.png"
        );
    }

    #[test]
    fn object_url_custom_endpoint_path_style() {
        assert_eq!(
            config(Some("http://localhost:9000/"), true).object_url("a.png"),
            "http://localhost:9000/media/a.png"
        );
    }

    #[test]
    fn object_url_custom_endpoint_virtual_hosted() {
        assert_eq!(
            config(Some("https://storage.example.com"), false).object_url("a.png"),
            "https://media.storage.example.com/a.png"
        );
    }

    #[tokio::test]
    async fn presigned_get_is_read_only_and_time_limited() {
        let store = S3CompatibleStore::new(config(Some("http://localhost:9000"), true)).await;
        let signed = store
            .sign_get("a.png", Duration::from_secs(3600))
            .await
            .unwrap();

        assert!(signed.url.starts_with("http://localhost:9000/media/a.png?"));
        assert!(signed.url.contains("X-Amz-Expires=3600"));
        assert!(signed.url.contains("X-Amz-Signature="));
        assert!(signed.url.contains("AKIDEXAMPLE"));
    }
}
