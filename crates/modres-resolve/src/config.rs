//! Resolver configuration.
//!
//! A [`ResolverConfig`] is an explicit value handed to
//! [`FilesystemResolver::new`](crate::FilesystemResolver::new); nothing is
//! read from process-wide state. It can be built in code or loaded from TOML:
//!
//! ```toml
//! source-extension = "mod"
//! flavor = "optimized"
//! package-root = "__init__"
//! platforms = ["safari", "webkit", "browser"]
//!
//! [[native-suffixes]]
//! suffix = ".so"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use modres_core::{ArtifactLayout, CacheFlavor, NativeSuffix};
use modres_targets::{PlatformChain, PlatformSet};

use crate::error::ConfigError;

/// Settings shared by every resolver built on one filesystem engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ResolverConfig {
    /// Extension of source files, without the dot.
    pub source_extension: String,
    /// Cache record flavor.
    pub flavor: CacheFlavor,
    /// Stem of a package's own source file.
    pub package_root: String,
    /// Native extension suffixes, tried in order.
    pub native_suffixes: Vec<NativeSuffix>,
    /// Platform override chain, most specific first.
    pub platforms: PlatformChain,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source_extension: ArtifactLayout::DEFAULT_SOURCE_EXTENSION.to_string(),
            flavor: CacheFlavor::Debug,
            package_root: ArtifactLayout::DEFAULT_PACKAGE_ROOT.to_string(),
            native_suffixes: vec![NativeSuffix::host()],
            platforms: PlatformChain::empty(),
        }
    }
}

impl ResolverConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_flavor(mut self, flavor: CacheFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn with_native_suffixes(mut self, suffixes: Vec<NativeSuffix>) -> Self {
        self.native_suffixes = suffixes;
        self
    }

    pub fn with_platforms(mut self, chain: PlatformChain) -> Self {
        self.platforms = chain;
        self
    }

    /// Use the chain of `platform` as defined in `set`.
    pub fn select_platform(mut self, set: &PlatformSet, platform: &str) -> Result<Self, ConfigError> {
        self.platforms = set.chain_for(platform)?;
        Ok(self)
    }

    /// The file naming scheme this configuration describes.
    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.source_extension, self.flavor, &self.package_root)
    }
}
