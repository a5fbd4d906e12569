//! `modres clean`: remove cache records.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use modres_core::ArtifactLayout;

/// Remove every cache record (either flavor) under each root.
pub fn run(roots: &[PathBuf], layout: &ArtifactLayout) -> Result<()> {
    let mut removed = 0;
    for root in roots {
        if !root.is_dir() {
            println!("Skipping {}: not a directory", root.display());
            continue;
        }
        removed += clean_dir(root, layout)?;
    }
    println!("Removed {removed} cache record(s)");
    Ok(())
}

/// Symlinks are never followed.
fn clean_dir(dir: &Path, layout: &ArtifactLayout) -> Result<usize> {
    let mut removed = 0;
    let entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            removed += clean_dir(&path, layout)?;
        } else if file_type.is_file() && layout.is_cache_file(&path) {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
            tracing::debug!(path = %path.display(), "removed cache record");
            removed += 1;
        }
    }
    Ok(removed)
}
