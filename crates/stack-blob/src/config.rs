//! Blob store configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::providers::GcsCredentials;

/// Configuration for a bucket-backed blob store.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct BlobStoreConfig {
    /// Google Cloud Storage bucket name
    #[cfg_attr(feature = "config", arg(long = "bucket", env = "BLOB_STORE_BUCKET"))]
    pub bucket: String,

    /// Path prefix inside the bucket under which all keys are stored
    #[cfg_attr(
        feature = "config",
        arg(long = "prefix", env = "BLOB_STORE_PREFIX", default_value = "")
    )]
    #[serde(default)]
    pub prefix: String,

    /// Service account key as inline JSON
    #[cfg_attr(
        feature = "config",
        arg(long = "google-credentials", env = "GOOGLE_CREDENTIALS", hide_env_values = true)
    )]
    #[serde(default)]
    pub google_credentials: Option<String>,

    /// Base URL of a storage emulator (http or https)
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-endpoint", env = "STORAGE_EMULATOR_HOST")
    )]
    #[serde(default)]
    pub storage_endpoint: Option<String>,

    /// Do not warn when falling back to application default credentials
    ///
    /// Only the exact value `true` enables it; any other value leaves the
    /// warning on.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "suppress-gcloud-creds-warning",
            env = "SUPPRESS_GCLOUD_CREDS_WARNING",
            action = clap::ArgAction::SetTrue,
            value_parser = parse_flag
        )
    )]
    #[serde(default)]
    pub suppress_gcloud_creds_warning: bool,
}

/// Reads a boolean switch the way the environment sets it: `true` enables
/// it, anything else disables it.
#[cfg_attr(not(feature = "config"), allow(dead_code))]
fn parse_flag(value: &str) -> std::result::Result<bool, std::convert::Infallible> {
    Ok(value == "true")
}

impl BlobStoreConfig {
    /// Creates a configuration for `bucket` with no prefix.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: String::new(),
            google_credentials: None,
            storage_endpoint: None,
            suppress_gcloud_creds_warning: false,
        }
    }

    /// Sets the path prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the inline service account key JSON.
    #[must_use]
    pub fn with_google_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.google_credentials = Some(credentials.into());
        self
    }

    /// Sets the storage emulator base URL.
    #[must_use]
    pub fn with_storage_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.storage_endpoint = Some(endpoint.into());
        self
    }

    /// Returns the storage emulator base URL, treating a blank value as unset.
    pub fn storage_endpoint(&self) -> Option<&str> {
        self.storage_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }

    /// Silences the application default credentials warning.
    #[must_use]
    pub fn with_suppressed_creds_warning(mut self) -> Self {
        self.suppress_gcloud_creds_warning = true;
        self
    }

    /// Returns the service account key, treating a blank value as unset.
    pub fn service_account_key(&self) -> Option<&str> {
        self.google_credentials
            .as_deref()
            .filter(|creds| !creds.trim().is_empty())
    }

    /// Builds provider credentials from this configuration.
    pub fn gcs_credentials(&self) -> GcsCredentials {
        let mut credentials = GcsCredentials::new(self.bucket.trim());
        if let Some(key) = self.service_account_key() {
            credentials = credentials.with_service_account_key(key);
        }
        if let Some(endpoint) = self.storage_endpoint() {
            credentials = credentials.with_endpoint(endpoint);
        }
        credentials
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(Error::config("bucket name must not be empty"));
        }

        if let Some(key) = self.service_account_key() {
            let value: serde_json::Value = serde_json::from_str(key)
                .map_err(|e| Error::config(format!("GOOGLE_CREDENTIALS is not valid JSON: {e}")))?;
            if !value.is_object() {
                return Err(Error::config("GOOGLE_CREDENTIALS must be a JSON object"));
            }
        }

        if let Some(endpoint) = self.storage_endpoint() {
            let has_host = endpoint
                .strip_prefix("http://")
                .or_else(|| endpoint.strip_prefix("https://"))
                .is_some_and(|rest| !rest.is_empty());
            if !has_host {
                return Err(Error::config(format!(
                    "STORAGE_EMULATOR_HOST must be an http(s) URL, got {endpoint:?}"
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for BlobStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStoreConfig")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .field(
                "google_credentials",
                &self.service_account_key().map(|_| "<redacted>"),
            )
            .field("storage_endpoint", &self.storage_endpoint)
            .field(
                "suppress_gcloud_creds_warning",
                &self.suppress_gcloud_creds_warning,
            )
            .finish()
    }
}
