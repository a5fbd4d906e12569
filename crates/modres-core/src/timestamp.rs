//! Modification-time probing.
//!
//! A [`Timestamp`] is the whole number of seconds since the Unix epoch at
//! which a filesystem entry was last modified. Resolution compares these
//! values to decide whether a cached artifact is still usable.

use std::path::Path;
use std::time::UNIX_EPOCH;

/// Last-modified time of a filesystem entry, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp from seconds since the Unix epoch.
    pub fn from_secs(secs: u64) -> Self {
        Timestamp(secs)
    }

    /// Seconds since the Unix epoch.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// The 32-bit stamp stored in cache records.
    ///
    /// Records only have room for the low 32 bits, so validity checks
    /// compare stamps, never full timestamps.
    pub fn record_stamp(&self) -> u32 {
        self.0 as u32
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read the modification time of `path`.
///
/// Returns `None` when the entry does not exist. Every other failure
/// (permission denied, an mtime before the epoch, a platform without mtimes)
/// is reported the same way: this layer never distinguishes "missing" from
/// "unreadable".
pub fn probe(path: &Path) -> Option<Timestamp> {
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
    tracing::trace!(path = %path.display(), secs, "probed timestamp");
    Some(Timestamp(secs))
}
