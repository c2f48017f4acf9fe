//! Listing error types.

use crate::Cursor;

/// Type alias for boxed errors returned by page sources.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for listing operations.
pub type ListingResult<T> = Result<T, ListingError>;

/// Errors surfaced by [`SegmentedLister`](crate::SegmentedLister).
///
/// None of these are recovered from inside the lister. Callers decide
/// whether to restart the scan or resume from [`resume_cursor`].
///
/// [`resume_cursor`]: ListingError::resume_cursor
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// The listing was rejected before any remote call was made.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Human-readable description of the rejected input.
        reason: String,
    },

    /// A page fetch failed.
    #[error("listing failed after {emitted} item(s): {source}")]
    RemoteListing {
        /// Number of items emitted before the failure.
        emitted: u64,
        /// Cursor of the request that failed.
        cursor: Cursor,
        /// Underlying page source error.
        #[source]
        source: BoxedError,
    },

    /// The caller cancelled the listing.
    #[error("listing cancelled after {emitted} item(s)")]
    Cancelled {
        /// Number of items emitted before cancellation.
        emitted: u64,
    },
}

impl ListingError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates a new remote listing error.
    pub fn remote(
        emitted: u64,
        cursor: Cursor,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::RemoteListing {
            emitted,
            cursor,
            source: Box::new(source),
        }
    }

    /// Creates a new cancellation error.
    pub fn cancelled(emitted: u64) -> Self {
        Self::Cancelled { emitted }
    }

    /// Returns how many items were emitted before the error.
    pub fn emitted(&self) -> u64 {
        match self {
            Self::InvalidArgument { .. } => 0,
            Self::RemoteListing { emitted, .. } | Self::Cancelled { emitted } => *emitted,
        }
    }

    /// Returns the cursor a caller can reuse to retry the failed page.
    ///
    /// Only remote failures carry one. [`Cursor::Absent`] here means the
    /// very first page failed.
    pub fn resume_cursor(&self) -> Option<&Cursor> {
        match self {
            Self::RemoteListing { cursor, .. } => Some(cursor),
            _ => None,
        }
    }

    /// Returns true if the listing was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
