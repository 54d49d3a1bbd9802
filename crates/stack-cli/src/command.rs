//! Blob store operations exposed as subcommands.

use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use clap::Subcommand;
use stack_blob::{BlobStore, ObjectBlobStore};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::TRACING_TARGET_COMMAND;

/// Operation to run against the blob store.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Download a blob
    Get {
        /// Blob key
        key: String,
        /// Write the content to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print blob metadata as JSON
    Meta {
        /// Blob key
        key: String,
    },
    /// Upload a blob, replacing any existing content
    Set {
        /// Blob key
        key: String,
        /// Read the content from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Delete a blob
    Rm {
        /// Blob key
        key: String,
    },
    /// Verify that the bucket is reachable
    Check,
}

impl Command {
    /// Returns the subcommand name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Get { .. } => "get",
            Self::Meta { .. } => "meta",
            Self::Set { .. } => "set",
            Self::Rm { .. } => "rm",
            Self::Check => "check",
        }
    }

    /// Runs the operation, writing any printable result to `stdout`.
    pub async fn execute<W>(&self, store: &ObjectBlobStore, stdout: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match self {
            Self::Get { key, output } => {
                let content = store
                    .get(key)
                    .await
                    .with_context(|| format!("failed to get '{key}'"))?;

                match output {
                    Some(path) => tokio::fs::write(path, &content)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?,
                    None => stdout.write_all(&content).await?,
                }

                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    key = %key,
                    size = content.len(),
                    "Blob downloaded"
                );
            }
            Self::Meta { key } => {
                let meta = store
                    .get_meta(key)
                    .await
                    .with_context(|| format!("failed to get metadata of '{key}'"))?;

                let mut json = serde_json::to_vec_pretty(&meta)?;
                json.push(b'\n');
                stdout.write_all(&json).await?;
            }
            Self::Set { key, input } => {
                let content = read_input(input.as_ref()).await?;
                let size = content.len();

                store
                    .set(key, content)
                    .await
                    .with_context(|| format!("failed to set '{key}'"))?;

                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    key = %key,
                    size,
                    "Blob uploaded"
                );
            }
            Self::Rm { key } => {
                store
                    .remove(key)
                    .await
                    .with_context(|| format!("failed to remove '{key}'"))?;

                tracing::info!(target: TRACING_TARGET_COMMAND, key = %key, "Blob removed");
            }
            Self::Check => {
                store
                    .verify_reachable()
                    .await
                    .context("bucket is not reachable")?;

                tracing::info!(target: TRACING_TARGET_COMMAND, "Bucket is reachable");
            }
        }

        stdout.flush().await?;
        Ok(())
    }
}

/// Reads the upload content from a file, or from stdin when no file is given.
async fn read_input(input: Option<&PathBuf>) -> anyhow::Result<Bytes> {
    let data = match input {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("failed to read stdin")?;
            buf
        }
    };

    Ok(Bytes::from(data))
}
