//! The [`BlobStore`] abstraction and its object-store-backed implementation.

mod meta;
mod object;

use bytes::Bytes;
pub use meta::{BlobMeta, CREATED_AT_ATTRIBUTE, ObjectAttributes};
pub use object::ObjectBlobStore;

use crate::error::Result;

/// Key-value store of opaque byte content.
///
/// Keys are logical names; implementations decide where the content lives.
/// Missing keys are reported as [`Error::NotFound`](crate::Error::NotFound)
/// by [`get`](Self::get), [`get_meta`](Self::get_meta) and
/// [`remove`](Self::remove).
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns the full content stored under `key`.
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Returns size and timestamps of the content stored under `key`.
    async fn get_meta(&self, key: &str) -> Result<BlobMeta>;

    /// Stores `content` under `key`, replacing any previous content.
    async fn set(&self, key: &str, content: Bytes) -> Result<()>;

    /// Deletes the content stored under `key`.
    async fn remove(&self, key: &str) -> Result<()>;
}
