//! Snapshot identity and delete options.
//!
//! `object_store` exposes no snapshot API, so a snapshot is a server-side
//! copy of the blob stored under a reserved namespace:
//!
//! ```text
//! _snapshots/<blob name>/<microseconds since epoch, zero-padded to 20 digits>
//! ```
//!
//! The padding keeps lexicographic listing order equal to creation order.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Key prefix reserved for snapshot copies.
pub const SNAPSHOT_NAMESPACE: &str = "_snapshots";

/// Metadata key carrying the RFC 3339 snapshot time on listed items.
pub const SNAPSHOT_TIME_KEY: &str = "snapshot";

/// Metadata key flagging listed items that are snapshots.
pub const IS_SNAPSHOT_KEY: &str = "is_snapshot";

/// A point-in-time copy of a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name of the base blob.
    pub name: String,
    /// When the snapshot was taken.
    pub taken_at: Timestamp,
}

impl Snapshot {
    /// Creates a snapshot handle for `name` taken at `taken_at`.
    pub fn new(name: impl Into<String>, taken_at: Timestamp) -> Self {
        Self {
            name: name.into(),
            taken_at,
        }
    }

    /// Storage key holding the snapshot contents.
    pub fn key(&self) -> String {
        format!(
            "{}{:020}",
            Self::prefix_for(&self.name),
            self.taken_at.as_microsecond()
        )
    }

    /// Listing prefix covering every snapshot of `name`.
    pub fn prefix_for(name: &str) -> String {
        format!("{SNAPSHOT_NAMESPACE}/{name}/")
    }

    /// Returns true if `key` lies in the snapshot namespace.
    pub fn is_snapshot_key(key: &str) -> bool {
        key.strip_prefix(SNAPSHOT_NAMESPACE)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Decodes a storage key produced by [`key`](Self::key).
    pub fn from_key(key: &str) -> Option<Self> {
        let rest = key.strip_prefix(SNAPSHOT_NAMESPACE)?.strip_prefix('/')?;
        let (name, micros) = rest.rsplit_once('/')?;
        if name.is_empty() || micros.len() != 20 {
            return None;
        }

        let taken_at = Timestamp::from_microsecond(micros.parse().ok()?).ok()?;
        Some(Self::new(name, taken_at))
    }
}

/// Which parts of a blob a delete removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr, Display)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeleteSnapshots {
    /// Delete the base blob only; refused while snapshots exist.
    #[default]
    None,
    /// Delete the base blob and all of its snapshots.
    IncludeSnapshots,
    /// Delete the snapshots and keep the base blob.
    SnapshotsOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips() {
        let taken_at = Timestamp::from_microsecond(1_700_000_000_123_456).unwrap();
        let snapshot = Snapshot::new("reports/test-file.txt", taken_at);

        let key = snapshot.key();
        assert_eq!(
            key,
            "_snapshots/reports/test-file.txt/00001700000000123456"
        );
        assert_eq!(Snapshot::from_key(&key), Some(snapshot));
    }

    #[test]
    fn rejects_foreign_keys() {
        assert_eq!(Snapshot::from_key("test-file.txt"), None);
        assert_eq!(Snapshot::from_key("_snapshotsX/a/00001700000000123456"), None);
        assert_eq!(Snapshot::from_key("_snapshots/a/not-a-number"), None);
        assert!(!Snapshot::is_snapshot_key("_snapshots.txt"));
        assert!(Snapshot::is_snapshot_key("_snapshots/a/00001700000000123456"));
    }

    #[test]
    fn delete_option_names() {
        assert_eq!(DeleteSnapshots::IncludeSnapshots.as_ref(), "include_snapshots");
        assert_eq!(DeleteSnapshots::default(), DeleteSnapshots::None);
    }
}
