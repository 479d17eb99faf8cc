//! Storage configuration loaded from environment variables.

use std::path::PathBuf;

/// Default directory for the local backend.
const DEFAULT_LOCAL_DIR: &str = "storage/uploads";
/// Default URL prefix the API serves local uploads under.
const DEFAULT_LOCAL_PUBLIC_URL: &str = "/uploads";

/// Which blob store to use and how to reach it.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    S3(S3Config),
}

/// Settings for the S3 backend.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (path-style addressing).
    pub endpoint: Option<String>,
    /// Base URL objects are publicly served from.
    pub public_base_url: String,
    /// Static credentials; when absent the default AWS provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                    | Required         | Default           |
    /// |----------------------------|------------------|-------------------|
    /// | `STORAGE_BACKEND`          | no               | `local`           |
    /// | `LOCAL_STORAGE_DIR`        | no               | `storage/uploads` |
    /// | `LOCAL_STORAGE_PUBLIC_URL` | no               | `/uploads`        |
    /// | `S3_BUCKET`                | **yes** for `s3` | --                |
    /// | `S3_REGION`                | no               | `us-east-1`       |
    /// | `S3_ENDPOINT`              | no               | --                |
    /// | `S3_PUBLIC_BASE_URL`       | no               | derived           |
    /// | `S3_ACCESS_KEY_ID`         | no               | provider chain    |
    /// | `S3_SECRET_ACCESS_KEY`     | no               | provider chain    |
    ///
    /// # Panics
    ///
    /// Panics on an unknown `STORAGE_BACKEND` or a missing `S3_BUCKET`.
    pub fn from_env() -> Self {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());
        match backend.as_str() {
            "local" => StorageConfig::Local {
                root: std::env::var("LOCAL_STORAGE_DIR")
                    .unwrap_or_else(|_| DEFAULT_LOCAL_DIR.into())
                    .into(),
                public_base_url: std::env::var("LOCAL_STORAGE_PUBLIC_URL")
                    .unwrap_or_else(|_| DEFAULT_LOCAL_PUBLIC_URL.into()),
            },
            "s3" => {
                let bucket = std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3");
                let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into());
                let endpoint = non_empty_var("S3_ENDPOINT");
                let public_base_url = non_empty_var("S3_PUBLIC_BASE_URL").unwrap_or_else(|| {
                    default_s3_public_url(&bucket, &region, endpoint.as_deref())
                });
                StorageConfig::S3(S3Config {
                    bucket,
                    region,
                    endpoint,
                    public_base_url,
                    access_key_id: non_empty_var("S3_ACCESS_KEY_ID"),
                    secret_access_key: non_empty_var("S3_SECRET_ACCESS_KEY"),
                })
            }
            other => panic!("Unknown STORAGE_BACKEND '{other}'. Expected 'local' or 's3'"),
        }
    }

    /// Local root directory, if this is the local backend.
    pub fn local_root(&self) -> Option<&PathBuf> {
        match self {
            StorageConfig::Local { root, .. } => Some(root),
            StorageConfig::S3(_) => None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Virtual-hosted AWS URL, or `{endpoint}/{bucket}` for custom endpoints.
pub fn default_s3_public_url(bucket: &str, region: &str, endpoint: Option<&str>) -> String {
    match endpoint {
        Some(ep) => format!("{}/{bucket}", ep.trim_end_matches('/')),
        None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
    }
}
