//! Provider trait for creating authenticated object store handles.

use std::sync::Arc;

use object_store::ObjectStore;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Factory for authenticated connections to an object storage service.
///
/// Implementations handle credential handling and client construction for a
/// specific provider (e.g. GCS). Construction does not touch the network;
/// use [`ObjectBlobStore::verify_reachable`](crate::ObjectBlobStore::verify_reachable)
/// to check connectivity.
pub trait Provider: Send + Sync + 'static {
    /// Strongly-typed credentials for this provider.
    type Credentials: DeserializeOwned + Send;

    /// Unique identifier (e.g. "gcs").
    const ID: &'static str;

    /// Create a shared object store handle.
    fn connect(creds: &Self::Credentials) -> Result<Arc<dyn ObjectStore>>;
}
