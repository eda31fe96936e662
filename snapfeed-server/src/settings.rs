use std::path::PathBuf;

use anyhow::{bail, Result};
use snapfeed_axum::MultipartConfig;
use snapfeed_blob::BlobConfig;
use snapfeed_core::{env_list, env_opt, env_var_or};

struct Defaults;

impl Defaults {
    const HTTP_HOST: &'static str = "127.0.0.1";
    const HTTP_PORT: u16 = 3000;
    const MAX_FILE_SIZE_MB: u64 = 25;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobBackend {
    Memory,
    S3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocBackend {
    Memory,
    Mongo,
}

impl BlobBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "s3" => Ok(Self::S3),
            other => bail!("BLOB_BACKEND must be 'memory' or 's3', got '{other}'"),
        }
    }
}

impl DocBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            other => bail!("DOCSTORE_BACKEND must be 'memory' or 'mongo', got '{other}'"),
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Base of the URLs the in-memory blob store hands out
    pub public_base_url: String,
    pub static_dir: PathBuf,
    pub blob_backend: BlobBackend,
    pub blob: BlobConfig,
    pub doc_backend: DocBackend,
    pub max_file_mb: u64,
    pub allowed_types: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let host = Defaults::HTTP_HOST.to_string();
        let port = Defaults::HTTP_PORT;
        Self {
            public_base_url: format!("http://{host}:{port}"),
            host,
            port,
            static_dir: default_static_dir(),
            blob_backend: BlobBackend::Memory,
            blob: BlobConfig::default(),
            doc_backend: DocBackend::Memory,
            max_file_mb: Defaults::MAX_FILE_SIZE_MB,
            allowed_types: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let host = env_var_or("HTTP_HOST", Defaults::HTTP_HOST.to_string());
        let port = env_var_or("HTTP_PORT", Defaults::HTTP_PORT);

        let blob_backend = BlobBackend::parse(&env_var_or("BLOB_BACKEND", "memory".to_string()))?;
        let doc_backend = DocBackend::parse(&env_var_or("DOCSTORE_BACKEND", "memory".to_string()))?;

        Ok(Self {
            public_base_url: env_opt("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}")),
            static_dir: env_opt("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_static_dir),
            blob_backend,
            blob: BlobConfig::from_env(),
            doc_backend,
            max_file_mb: env_var_or("UPLOAD_MAX_FILE_MB", Defaults::MAX_FILE_SIZE_MB),
            allowed_types: env_list("UPLOAD_ALLOWED_TYPES"),
            host,
            port,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn multipart(&self) -> MultipartConfig {
        let mut config = MultipartConfig::new().max_file_size(self.max_file_mb.saturating_mul(1024 * 1024));
        for content_type in &self.allowed_types {
            config = config.allow_content_type(content_type);
        }
        config
    }
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}
