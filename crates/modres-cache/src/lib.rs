//! Compiled-artifact cache records for modres.
//!
//! One record file sits next to each compiled source. A record is only
//! trusted when its header carries the committed magic and its stored stamp
//! matches the current timestamp of the source it caches.
//!
//! ## File Layout
//!
//! ```text
//! Cache Record Layout:
//! ┌──────────────────────────────┐
//! │ Magic: "MRC\x01"            │  4 bytes (zeroed until commit)
//! │ Source stamp: u32 LE         │  4 bytes
//! ├──────────────────────────────┤
//! │ Compiled unit                │
//! │   (bincode payload)          │
//! └──────────────────────────────┘
//! ```
//!
//! Writers emit a zeroed header first and overwrite it with the magic as the
//! very last step, so a reader racing a writer (or reading after a crash)
//! sees an uncommitted record and recompiles instead of loading garbage.

mod format;

pub use format::{try_load, write, CacheError, CacheRecord, RecordHeader, MAGIC};
