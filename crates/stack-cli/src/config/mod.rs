//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── store: BlobStoreConfig   # Bucket, prefix, credentials
//! └── command: Command         # get | meta | set | rm | check
//! ```
//!
//! All store configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! stack-blob --bucket media --prefix sites/1 get 2024/01/photo.jpg -o photo.jpg
//!
//! # Or via environment variables
//! BLOB_STORE_BUCKET=media BLOB_STORE_PREFIX=sites/1 stack-blob meta 2024/01/photo.jpg
//! ```

use std::process;

use clap::Parser;
use stack_blob::BlobStoreConfig;

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "stack-blob")]
#[command(about = "Read and write blobs in a Google Cloud Storage bucket")]
#[command(version)]
pub struct Cli {
    /// Bucket, prefix and credentials.
    #[clap(flatten)]
    pub store: BlobStoreConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so that its
    /// variables can serve as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            bucket = %self.store.bucket,
            prefix = %self.store.prefix,
            explicit_credentials = self.store.service_account_key().is_some(),
            endpoint = ?self.store.storage_endpoint(),
            command = self.command.name(),
            "Blob store configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
