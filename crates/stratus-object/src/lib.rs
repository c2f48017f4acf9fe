#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod client;
/// Provider trait and object storage provider factories.
pub mod providers;
/// Error and snapshot types.
pub mod types;

#[doc(hidden)]
pub mod prelude;

/// Tracing target for object storage operations.
pub const TRACING_TARGET: &str = "stratus_object";
