//! Cache record format implementation.
//!
//! The format is an 8-byte header (magic + source stamp) followed by the
//! bincode-serialized compiled unit. The magic doubles as the commit marker.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use thiserror::Error;

use modres_core::{CompiledUnit, Timestamp};

/// Magic bytes identifying a committed cache record: "MRC\x01".
///
/// Changing the record layout requires changing this value.
pub const MAGIC: [u8; 4] = [0x4D, 0x52, 0x43, 0x01];

/// Header written before the payload and replaced by [`MAGIC`] on commit.
const PLACEHOLDER: [u8; 4] = [0; 4];

/// Size of the fixed header (magic + stamp).
const HEADER_SIZE: usize = 8;

/// Errors that can occur while reading or writing cache records.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("invalid magic bytes: expected MRC\\x01")]
    InvalidMagic,

    #[error("record header was never committed")]
    UncommittedHeader,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("file too small to be a cache record")]
    TooSmall,
}

/// A decoded cache record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Low 32 bits of the source timestamp the unit was compiled from.
    pub stamp: u32,
    /// The cached compiled unit.
    pub unit: CompiledUnit,
}

impl CacheRecord {
    pub fn new(source_timestamp: Timestamp, unit: CompiledUnit) -> Self {
        Self {
            stamp: source_timestamp.record_stamp(),
            unit,
        }
    }

    /// Whether this record caches the source at `timestamp`.
    pub fn matches(&self, timestamp: Timestamp) -> bool {
        self.stamp == timestamp.record_stamp()
    }

    /// Serialize to a committed record image.
    pub fn encode(&self) -> Result<Vec<u8>, CacheError> {
        let payload =
            bincode::serialize(&self.unit).map_err(|e| CacheError::Serialization(e.to_string()))?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&self.stamp.to_le_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Deserialize a record image.
    pub fn decode(data: &[u8]) -> Result<Self, CacheError> {
        if data.len() < HEADER_SIZE {
            return Err(CacheError::TooSmall);
        }
        check_magic(&data[0..4])?;
        let stamp = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let unit = decode_unit(&data[HEADER_SIZE..])?;
        Ok(Self { stamp, unit })
    }
}

/// Payloads are decoded from memory so a corrupt length prefix fails on
/// the slice bounds instead of sizing an allocation.
fn decode_unit(payload: &[u8]) -> Result<CompiledUnit, CacheError> {
    bincode::deserialize(payload).map_err(|e| CacheError::Serialization(e.to_string()))
}

fn check_magic(header: &[u8]) -> Result<(), CacheError> {
    if header == MAGIC {
        Ok(())
    } else if header == PLACEHOLDER {
        Err(CacheError::UncommittedHeader)
    } else {
        Err(CacheError::InvalidMagic)
    }
}

/// Load the unit cached at `path` if the record is valid for `expected`.
///
/// Every failure (missing file, short read, wrong magic, stamp mismatch,
/// undecodable payload) is a miss. A missing `expected` timestamp never
/// matches: a record cannot be validated without its source.
pub fn try_load(path: &Path, expected: Option<Timestamp>) -> Option<CompiledUnit> {
    match load_checked(path, expected) {
        Ok(unit) => unit,
        Err(e) => {
            tracing::trace!(path = %path.display(), error = %e, "cache record unreadable");
            None
        }
    }
}

fn load_checked(path: &Path, expected: Option<Timestamp>) -> Result<Option<CompiledUnit>, CacheError> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    check_magic(&magic)?;

    let mut stamp = [0u8; 4];
    reader.read_exact(&mut stamp)?;
    let stamp = u32::from_le_bytes(stamp);
    let Some(expected) = expected else {
        return Ok(None);
    };
    if stamp != expected.record_stamp() {
        tracing::trace!(
            path = %path.display(),
            stored = stamp,
            expected = expected.record_stamp(),
            "cache record is stale"
        );
        return Ok(None);
    }

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;
    Ok(Some(decode_unit(&payload)?))
}

/// Persist `unit` as the cache record for a source at `source_timestamp`.
///
/// The header is written as zeroes, then the stamp and payload, and only
/// after a flush is the magic written over the placeholder. A record is
/// therefore never valid before all of its bytes are in place.
pub fn write(path: &Path, source_timestamp: Timestamp, unit: &CompiledUnit) -> Result<(), CacheError> {
    // Serialize before touching the file so a failure leaves the old record intact.
    let payload =
        bincode::serialize(unit).map_err(|e| CacheError::Serialization(e.to_string()))?;

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(&PLACEHOLDER)?;
    file.write_all(&source_timestamp.record_stamp().to_le_bytes())?;
    file.write_all(&payload)?;
    file.flush()?;

    file.seek(SeekFrom::Start(0))?;
    file.write_all(&MAGIC)?;
    file.flush()?;
    Ok(())
}

/// Header-level view of a record, for tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Whether the commit marker is in place.
    pub committed: bool,
    /// Raw first four bytes.
    pub magic: [u8; 4],
    /// Stored source stamp.
    pub stamp: u32,
    /// Length of the serialized unit.
    pub payload_len: u64,
    /// SHA-256 of the serialized unit, lowercase hex.
    pub payload_sha256: String,
}

impl RecordHeader {
    /// Parse the header of an in-memory record image.
    pub fn parse(data: &[u8]) -> Result<Self, CacheError> {
        if data.len() < HEADER_SIZE {
            return Err(CacheError::TooSmall);
        }
        let magic = [data[0], data[1], data[2], data[3]];
        let payload = &data[HEADER_SIZE..];
        let digest = Sha256::digest(payload);
        Ok(Self {
            committed: magic == MAGIC,
            magic,
            stamp: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
            payload_len: payload.len() as u64,
            payload_sha256: digest.iter().map(|b| format!("{b:02x}")).collect(),
        })
    }
}
