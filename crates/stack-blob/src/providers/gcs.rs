//! Google Cloud Storage provider using [`object_store::gcp::GoogleCloudStorageBuilder`].

use std::sync::Arc;

use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::{ClientOptions, ObjectStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Provider;
use crate::error::{Error, Result};

/// Typed credentials for Google Cloud Storage.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsCredentials {
    /// GCS bucket name.
    pub bucket: String,
    /// Serialized JSON service account key.
    ///
    /// When absent, application default credentials are used.
    #[serde(default)]
    pub service_account_key: Option<String>,
    /// Base URL of a storage emulator, such as `http://localhost:4443`.
    ///
    /// Without a service account key, requests to the emulator are sent
    /// unauthenticated.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl GcsCredentials {
    /// Creates credentials for `bucket` using application default credentials.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            service_account_key: None,
            endpoint: None,
        }
    }

    /// Sets the serialized service account key.
    pub fn with_service_account_key(mut self, key: impl Into<String>) -> Self {
        self.service_account_key = Some(key.into());
        self
    }

    /// Sets the storage emulator base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Returns the service account key handed to the builder.
    ///
    /// `object_store` reads the endpoint override from the key itself
    /// (`gcs_base_url`), so it is merged into the configured key or into a
    /// key that disables OAuth when none is configured.
    fn effective_service_account_key(&self) -> Result<Option<String>> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(self.service_account_key.clone());
        };

        let mut key = match &self.service_account_key {
            Some(key) => serde_json::from_str::<Map<String, Value>>(key)
                .map_err(|e| Error::config(format!("service account key: {e}")))?,
            None => {
                let mut key = Map::new();
                key.insert("disable_oauth".into(), Value::Bool(true));
                for field in ["client_email", "private_key", "private_key_id"] {
                    key.insert(field.into(), Value::String(String::new()));
                }
                key
            }
        };
        key.insert("gcs_base_url".into(), Value::String(endpoint.clone()));

        Ok(Some(Value::Object(key).to_string()))
    }
}

impl std::fmt::Debug for GcsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsCredentials")
            .field("bucket", &self.bucket)
            .field(
                "service_account_key",
                &self.service_account_key.as_ref().map(|_| "<redacted>"),
            )
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Google Cloud Storage provider.
pub struct GcsProvider;

impl Provider for GcsProvider {
    type Credentials = GcsCredentials;

    const ID: &'static str = "gcs";

    fn connect(creds: &Self::Credentials) -> Result<Arc<dyn ObjectStore>> {
        let mut builder = GoogleCloudStorageBuilder::new().with_bucket_name(&creds.bucket);

        if let Some(key) = creds.effective_service_account_key()? {
            builder = builder.with_service_account_key(key);
        }

        if creds
            .endpoint
            .as_deref()
            .is_some_and(|endpoint| endpoint.starts_with("http://"))
        {
            builder = builder.with_client_options(ClientOptions::new().with_allow_http(true));
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("[{}] {e}", Self::ID)))?;

        Ok(Arc::new(store))
    }
}
