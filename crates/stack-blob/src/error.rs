//! Blob store error types.

/// Result type for blob store operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur during blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The object does not exist in the bucket.
    #[error("{0}")]
    NotFound(String),

    /// Any other failure reported by the object store.
    #[error("{message}")]
    Storage {
        message: String,
        #[source]
        source: object_store::Error,
    },

    /// The key does not name an object once normalized.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// Invalid configuration or credentials.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wraps a backend error as a generic storage failure, keeping its message.
    ///
    /// Unlike the [`From`] conversion, this never yields [`Error::NotFound`].
    pub fn storage(err: object_store::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
            source: err,
        }
    }

    /// Creates a new invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }

    /// Creates a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error reports a missing object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<object_store::Error> for Error {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { .. } => Self::NotFound(err.to_string()),
            _ => Self::storage(err),
        }
    }
}
