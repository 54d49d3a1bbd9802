//! Blob metadata and the defaults applied to what a backend reports.

use jiff::Timestamp;
use object_store::{Attribute, Attributes, ObjectMeta};
use serde::{Deserialize, Serialize};

/// User-defined object metadata attribute holding the upload time.
pub const CREATED_AT_ATTRIBUTE: &str = "created-at";

/// Metadata of a stored blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMeta {
    /// Content length in bytes.
    pub size: u64,
    /// Last access time. The store does not track reads, so this mirrors `mtime`.
    pub atime: Timestamp,
    /// Creation time.
    pub ctime: Timestamp,
    /// Last modification time.
    pub mtime: Timestamp,
}

/// Attributes as reported by the object store, any of which may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectAttributes {
    /// Content length in bytes.
    pub size: Option<u64>,
    /// When the object was created.
    pub created: Option<Timestamp>,
    /// When the object was last updated.
    pub updated: Option<Timestamp>,
}

impl ObjectAttributes {
    /// Collects attributes from an object store response.
    pub fn from_object(meta: &ObjectMeta, attributes: &Attributes) -> Self {
        let updated = Timestamp::new(
            meta.last_modified.timestamp(),
            meta.last_modified.timestamp_subsec_nanos() as i32,
        )
        .ok();

        let created = attributes
            .get(&Attribute::Metadata(CREATED_AT_ATTRIBUTE.into()))
            .and_then(|value| value.to_string().parse::<Timestamp>().ok());

        Self {
            size: Some(meta.size),
            created,
            updated,
        }
    }

    /// Resolves into [`BlobMeta`], using `now` for any missing timestamp
    /// and zero for a missing size.
    pub fn into_meta(self, now: Timestamp) -> BlobMeta {
        let updated = self.updated.unwrap_or(now);

        BlobMeta {
            size: self.size.unwrap_or(0),
            atime: updated,
            ctime: self.created.unwrap_or(now),
            mtime: updated,
        }
    }
}
