//! Convenience re-exports.

pub use crate::{
    ContinuationToken, Cursor, Item, ListingError, ListingRequest, ListingResult, Page,
    PageSource, SegmentedLister,
};
