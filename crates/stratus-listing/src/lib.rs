#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod cursor;
mod error;
mod lister;
mod page;
mod source;

#[doc(hidden)]
pub mod prelude;

pub use cursor::{ContinuationToken, Cursor};
pub use error::{BoxedError, ListingError, ListingResult};
pub use lister::{ItemStream, SegmentedLister};
pub use page::{Item, ListingRequest, Page};
pub use source::PageSource;

/// Tracing target for listing operations.
pub const TRACING_TARGET: &str = "stratus_listing";
