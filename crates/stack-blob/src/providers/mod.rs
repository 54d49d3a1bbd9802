//! Provider trait and object storage provider factories.

mod gcs;
mod provider;

pub use gcs::{GcsCredentials, GcsProvider};
pub use provider::Provider;
