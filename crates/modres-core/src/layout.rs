//! File naming for sources and their cached compiles.
//!
//! A module `foo` in directory `dir` lives at `dir/foo.<source-ext>`; its
//! cache record sits next to it with the flavor character appended to the
//! source extension (`foo.modc` for debug builds, `foo.modo` for optimized).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which compile flavor cache records belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheFlavor {
    #[default]
    Debug,
    Optimized,
}

impl CacheFlavor {
    /// Character appended to the source extension.
    pub fn suffix_char(&self) -> char {
        match self {
            CacheFlavor::Debug => 'c',
            CacheFlavor::Optimized => 'o',
        }
    }
}

/// Naming scheme for source files, cache files, and package roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    source_extension: String,
    flavor: CacheFlavor,
    package_root: String,
}

impl ArtifactLayout {
    pub const DEFAULT_SOURCE_EXTENSION: &'static str = "mod";
    pub const DEFAULT_PACKAGE_ROOT: &'static str = "__init__";

    pub fn new(
        source_extension: impl Into<String>,
        flavor: CacheFlavor,
        package_root: impl Into<String>,
    ) -> Self {
        Self {
            source_extension: source_extension.into(),
            flavor,
            package_root: package_root.into(),
        }
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn flavor(&self) -> CacheFlavor {
        self.flavor
    }

    /// Stem of the file that holds a package's own body.
    pub fn package_root(&self) -> &str {
        &self.package_root
    }

    /// Extension of cache records, e.g. `modc`.
    pub fn cache_extension(&self) -> String {
        format!("{}{}", self.source_extension, self.flavor.suffix_char())
    }

    /// Source path for an extension-less module path.
    pub fn source_path(&self, stem: &Path) -> PathBuf {
        append_extension(stem, &self.source_extension)
    }

    /// Cache path for an extension-less module path.
    pub fn cache_path(&self, stem: &Path) -> PathBuf {
        append_extension(stem, &self.cache_extension())
    }

    /// Cache path belonging to a source path.
    pub fn cache_path_for_source(&self, source: &Path) -> PathBuf {
        source.with_extension(self.cache_extension())
    }

    /// Whether `path` looks like a cache record of any flavor.
    pub fn is_cache_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        [CacheFlavor::Debug, CacheFlavor::Optimized]
            .iter()
            .any(|f| ext == format!("{}{}", self.source_extension, f.suffix_char()))
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SOURCE_EXTENSION,
            CacheFlavor::Debug,
            Self::DEFAULT_PACKAGE_ROOT,
        )
    }
}

// `with_extension` would clobber dotted module names like `a.b`.
fn append_extension(stem: &Path, ext: &str) -> PathBuf {
    let mut s = stem.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}
