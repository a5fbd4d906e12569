//! Compiled units.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An opaque, executable representation of a compiled module.
///
/// The engine never looks inside `code`; it only persists and hands it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledUnit {
    /// Module name the unit was compiled for.
    pub module: String,
    /// Source file the unit was compiled from.
    pub source: PathBuf,
    /// Compiled body.
    pub code: Vec<u8>,
}

impl CompiledUnit {
    pub fn new(module: impl Into<String>, source: impl Into<PathBuf>, code: Vec<u8>) -> Self {
        Self {
            module: module.into(),
            source: source.into(),
            code,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// What a resolved module carries as its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleUnit {
    /// A real compiled unit (leaf modules, package roots, native modules).
    Compiled(CompiledUnit),
    /// A package with no executable body (synthetic archive packages).
    PackageMarker,
}

impl ModuleUnit {
    /// The compiled unit, if this is not a bare package marker.
    pub fn compiled(&self) -> Option<&CompiledUnit> {
        match self {
            ModuleUnit::Compiled(unit) => Some(unit),
            ModuleUnit::PackageMarker => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, ModuleUnit::PackageMarker)
    }
}

impl From<CompiledUnit> for ModuleUnit {
    fn from(unit: CompiledUnit) -> Self {
        ModuleUnit::Compiled(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_has_no_body() {
        assert!(ModuleUnit::PackageMarker.compiled().is_none());
        assert!(ModuleUnit::PackageMarker.is_marker());
    }

    #[test]
    fn compiled_exposes_unit() {
        let unit = CompiledUnit::new("foo", "/src/foo.mod", vec![1, 2, 3]);
        let body = ModuleUnit::from(unit.clone());
        assert_eq!(body.compiled(), Some(&unit));
        assert_eq!(unit.source(), Path::new("/src/foo.mod"));
    }
}
