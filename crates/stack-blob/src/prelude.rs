//! Prelude module for convenient imports.

pub use crate::config::BlobStoreConfig;
pub use crate::error::{Error, Result};
pub use crate::providers::{GcsCredentials, GcsProvider, Provider};
pub use crate::store::{BlobMeta, BlobStore, ObjectBlobStore};
