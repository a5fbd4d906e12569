//! `modres inspect`: show what a cache record holds.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use modres_cache::{CacheRecord, RecordHeader};

use super::hex;

/// Header fields plus, for committed records, the unit's identity.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub path: PathBuf,
    pub committed: bool,
    pub magic: String,
    pub stamp: u32,
    pub payload_len: u64,
    pub payload_sha256: String,
    pub module: Option<String>,
    pub source: Option<PathBuf>,
    pub code_len: Option<usize>,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let report = inspect(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("--- Cache Record ({}) ---", report.path.display());
    let state = if report.committed { "committed" } else { "uncommitted" };
    println!("  Magic:   {} ({state})", report.magic);
    println!("  Stamp:   {}", report.stamp);
    println!("  Payload: {} bytes, sha256 {}", report.payload_len, report.payload_sha256);
    match (&report.module, &report.source, report.code_len) {
        (Some(module), Some(source), Some(len)) => {
            println!("  Module:  {module}");
            println!("  Source:  {}", source.display());
            println!("  Code:    {len} bytes");
        }
        _ if report.committed => println!("  Payload could not be decoded"),
        _ => {}
    }
    Ok(())
}

/// Read the record at `path`. Uncommitted or undecodable payloads are
/// reported, not treated as errors.
pub fn inspect(path: &Path) -> Result<InspectReport> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let header = RecordHeader::parse(&data)
        .with_context(|| format!("reading cache record {}", path.display()))?;

    let unit = if header.committed {
        match CacheRecord::decode(&data) {
            Ok(record) => Some(record.unit),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "undecodable payload");
                None
            }
        }
    } else {
        None
    };

    Ok(InspectReport {
        path: path.to_path_buf(),
        committed: header.committed,
        magic: hex(&header.magic),
        stamp: header.stamp,
        payload_len: header.payload_len,
        payload_sha256: header.payload_sha256,
        module: unit.as_ref().map(|u| u.module.clone()),
        source: unit.as_ref().map(|u| u.source().to_path_buf()),
        code_len: unit.as_ref().map(|u| u.code.len()),
    })
}
