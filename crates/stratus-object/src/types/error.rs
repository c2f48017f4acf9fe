//! Error type for blob storage operations.

use std::path::{Path, PathBuf};

use stratus_listing::ListingError;

/// Type alias for boxed errors carried as a source.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for blob storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur during blob storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider could not build a client.
    #[error("[{provider}] connection failed: {message}")]
    Connection {
        /// Provider identifier (e.g. `"azure"`).
        provider: &'static str,
        /// Description of the failure.
        message: String,
        /// Underlying builder error, if any.
        #[source]
        source: Option<BoxedError>,
    },

    /// Credentials or a connection string were malformed or incomplete.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Blob not found.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// Blob already exists.
    #[error("blob already exists: {0}")]
    AlreadyExists(String),

    /// A plain delete was refused because the blob still has snapshots.
    #[error("blob {name} has {count} snapshot(s)")]
    SnapshotsPresent {
        /// Blob name.
        name: String,
        /// Number of snapshots found.
        count: usize,
    },

    /// A listing addressed a container other than the one the client is bound to.
    #[error("resource {requested} does not match container {container}")]
    InvalidResource {
        /// Resource named in the request.
        requested: String,
        /// Container the client is bound to.
        container: String,
    },

    /// A write targeted the reserved snapshot namespace.
    #[error("blob name {0} is reserved for snapshots")]
    ReservedName(String),

    /// A continuation cursor could not be decoded.
    #[error("invalid continuation cursor: {0}")]
    InvalidCursor(String),

    /// Local file access failed.
    #[error("local file {}: {source}", path.display())]
    Io {
        /// Local path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Segmented listing failed.
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// Backend-specific error.
    #[error("object store error: {source}")]
    Backend {
        /// Underlying object store error.
        #[source]
        source: object_store::Error,
        /// Whether a retry may succeed.
        retryable: bool,
    },
}

impl Error {
    /// Creates a new connection error.
    pub fn connection(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Connection {
            provider,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new invalid credentials error.
    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        Self::InvalidCredentials(msg.into())
    }

    /// Creates a new local I/O error.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Attaches a source to a connection error; other variants are returned unchanged.
    pub fn with_source(self, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        match self {
            Self::Connection {
                provider, message, ..
            } => Self::Connection {
                provider,
                message,
                source: Some(Box::new(err)),
            },
            other => other,
        }
    }

    /// Whether the caller should retry this operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection { .. } => true,
            Self::Backend { retryable, .. } => *retryable,
            Self::Listing(err) => matches!(err, ListingError::RemoteListing { .. }),
            _ => false,
        }
    }

    /// Returns true if a listing ended because its token was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Listing(err) if err.is_cancelled())
    }

    /// Returns true if the error reports a missing blob.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<object_store::Error> for Error {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => Self::NotFound(path),
            object_store::Error::AlreadyExists { path, .. } => Self::AlreadyExists(path),
            other => {
                let retryable = !matches!(
                    other,
                    object_store::Error::PermissionDenied { .. }
                        | object_store::Error::Unauthenticated { .. }
                        | object_store::Error::Precondition { .. }
                        | object_store::Error::NotSupported { .. }
                        | object_store::Error::NotImplemented
                        | object_store::Error::InvalidPath { .. }
                );
                Self::Backend {
                    source: other,
                    retryable,
                }
            }
        }
    }
}
