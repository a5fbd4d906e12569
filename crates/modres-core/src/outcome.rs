//! Resolution outcomes.

use std::path::Path;

use crate::attrs::{Attributes, SOURCE_PATH};
use crate::request::{PackageContext, ResolverId};
use crate::unit::{CompiledUnit, ModuleUnit};

/// A module a resolver found.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModule {
    /// Whether sub-modules may be resolved under this module.
    pub is_package: bool,
    /// Module body.
    pub unit: ModuleUnit,
    /// Attributes to install on the module.
    pub attributes: Attributes,
}

impl ResolvedModule {
    pub fn new(is_package: bool, unit: impl Into<ModuleUnit>, attributes: Attributes) -> Self {
        Self {
            is_package,
            unit: unit.into(),
            attributes,
        }
    }

    pub fn compiled(&self) -> Option<&CompiledUnit> {
        self.unit.compiled()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.attributes.get(SOURCE_PATH).and_then(|v| v.as_path())
    }

    /// Turn a package into the context its sub-modules are resolved with.
    ///
    /// Returns `None` for leaf modules.
    pub fn into_package_context(
        self,
        resolver: ResolverId,
        qualified_name: impl Into<String>,
    ) -> Option<PackageContext> {
        self.is_package
            .then(|| PackageContext::new(resolver, qualified_name, self.attributes))
    }
}

/// Result of a single resolution request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// No backing store could satisfy the request; try the next resolver.
    NotFound,
    Found(ResolvedModule),
}

impl ResolutionOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionOutcome::Found(_))
    }

    pub fn found(self) -> Option<ResolvedModule> {
        match self {
            ResolutionOutcome::Found(m) => Some(m),
            ResolutionOutcome::NotFound => None,
        }
    }

    pub fn as_found(&self) -> Option<&ResolvedModule> {
        match self {
            ResolutionOutcome::Found(m) => Some(m),
            ResolutionOutcome::NotFound => None,
        }
    }
}

impl From<ResolvedModule> for ResolutionOutcome {
    fn from(module: ResolvedModule) -> Self {
        ResolutionOutcome::Found(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::{AttrValue, PACKAGE_DIR};
    use std::path::PathBuf;

    #[test]
    fn leaf_has_no_package_context() {
        let m = ResolvedModule::new(false, ModuleUnit::PackageMarker, Attributes::new());
        assert!(m.into_package_context(ResolverId::new(), "leaf").is_none());
    }

    #[test]
    fn package_context_keeps_attributes() {
        let mut attrs = Attributes::new();
        attrs.insert(PACKAGE_DIR.into(), AttrValue::Path(PathBuf::from("/p")));
        let id = ResolverId::new();
        let ctx = ResolvedModule::new(true, ModuleUnit::PackageMarker, attrs)
            .into_package_context(id, "p")
            .unwrap();
        assert_eq!(ctx.resolver, id);
        assert_eq!(ctx.package_dir(), Some(Path::new("/p")));
    }

    #[test]
    fn not_found_has_no_module() {
        assert!(!ResolutionOutcome::NotFound.is_found());
        assert!(ResolutionOutcome::NotFound.found().is_none());
    }
}
