//! Listing requests, pages and items.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::Cursor;

/// A single listed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier of the entry within its resource.
    pub name: String,
    /// Free-form metadata reported by the source (e.g. snapshot time).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Size in bytes, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modification time, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

impl Item {
    /// Creates an item with no metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: BTreeMap::new(),
            size: None,
            last_modified: None,
        }
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sets the size in bytes.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the last modification time.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Returns a metadata value by key.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// One bounded batch of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Items in the order the source returned them.
    pub items: Vec<Item>,
    /// Cursor for the next page; [`Cursor::Absent`] on the last page.
    pub cursor: Cursor,
}

impl Page {
    /// Creates a page followed by more results.
    pub fn new(items: Vec<Item>, cursor: Cursor) -> Self {
        Self { items, cursor }
    }

    /// Creates the final page of a listing.
    pub fn last(items: Vec<Item>) -> Self {
        Self {
            items,
            cursor: Cursor::Absent,
        }
    }
}

/// Parameters of a single page fetch.
///
/// Built by the lister once per call and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    resource: String,
    prefix: String,
    page_size: NonZeroU32,
    cursor: Cursor,
}

impl ListingRequest {
    /// Creates a new request.
    pub fn new(
        resource: impl Into<String>,
        prefix: impl Into<String>,
        page_size: NonZeroU32,
        cursor: Cursor,
    ) -> Self {
        Self {
            resource: resource.into(),
            prefix: prefix.into(),
            page_size,
            cursor,
        }
    }

    /// Logical resource being listed (e.g. a container name).
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Prefix filter; empty means unfiltered.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Maximum number of items the page may hold.
    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Cursor returned by the previous page.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Returns true if this request starts a listing.
    pub fn is_first_page(&self) -> bool {
        !self.cursor.is_present()
    }

    /// Consumes the request and returns its cursor.
    pub fn into_cursor(self) -> Cursor {
        self.cursor
    }
}
