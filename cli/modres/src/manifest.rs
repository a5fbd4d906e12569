//! `modres.toml` manifest parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use modres_resolve::ResolverConfig;
use modres_targets::{PlatformDef, PlatformSet};

/// Name of the manifest file searched for by the CLI.
pub const MANIFEST_FILE: &str = "modres.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModresManifest {
    /// Resolver settings.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Search path configuration.
    #[serde(default)]
    pub search: SearchConfig,
    /// Platform configuration.
    #[serde(default)]
    pub targets: TargetsConfig,
}

/// Search path section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Directories searched in order; relative entries are taken from the
    /// manifest's directory.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// Targets section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Platform used when none is given on the command line.
    #[serde(default)]
    pub default: Option<String>,
    /// `platforms.toml` file whose definitions are added to the inline
    /// ones; relative paths are taken from the manifest's directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Platform definitions.
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformDef>,
}

impl ModresManifest {
    /// Search upward from `start_dir` for a `modres.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?
                    .with_platform_file(&dir)?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let manifest: ModresManifest = toml::from_str(s)?;
        modres_targets::parse::validate_platforms(&manifest.platform_set())?;
        Ok(manifest)
    }

    /// Merge the definitions of `[targets] file`, if any, and revalidate.
    pub fn with_platform_file(mut self, root: &Path) -> Result<Self> {
        let Some(file) = &self.targets.file else {
            return Ok(self);
        };
        let path = root.join(file);
        let set = modres_targets::load_platforms_toml(&path)
            .with_context(|| format!("loading platforms from {}", path.display()))?;
        self.targets.platforms.extend(set.platforms);
        modres_targets::parse::validate_platforms(&self.platform_set())
            .with_context(|| format!("merging platforms from {}", path.display()))?;
        Ok(self)
    }

    /// Search directories, made absolute against `root`.
    pub fn search_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.search.paths.iter().map(|p| root.join(p)).collect()
    }

    pub fn platform_set(&self) -> PlatformSet {
        PlatformSet::new(self.targets.platforms.clone())
    }

    pub fn default_platform(&self) -> Option<&str> {
        self.targets.default.as_deref()
    }
}
