#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
pub mod path;
/// Provider trait and object storage provider factories.
pub mod providers;
mod store;

#[doc(hidden)]
pub mod prelude;

pub use config::BlobStoreConfig;
pub use error::{Error, Result};
pub use store::{BlobMeta, BlobStore, CREATED_AT_ATTRIBUTE, ObjectAttributes, ObjectBlobStore};

/// Tracing target for blob store operations.
pub const TRACING_TARGET: &str = "stack_blob";
