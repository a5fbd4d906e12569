//! Resolution requests and package contexts.

use std::path::Path;

use uuid::Uuid;

use crate::attrs::{ArchiveHandle, Attributes, ARCHIVE, PACKAGE_DIR};

/// Identity of a resolver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolverId(Uuid);

impl ResolverId {
    /// Allocate a fresh, unique id.
    pub fn new() -> Self {
        ResolverId(Uuid::new_v4())
    }
}

impl Default for ResolverId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ResolverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An already-resolved package, as seen by resolvers of its sub-modules.
///
/// Owned by the host module table; resolvers only read it.
#[derive(Debug, Clone)]
pub struct PackageContext {
    /// Resolver that produced the package.
    pub resolver: ResolverId,
    /// Fully qualified package name.
    pub qualified_name: String,
    /// Attributes installed on the package.
    pub attributes: Attributes,
}

impl PackageContext {
    pub fn new(resolver: ResolverId, qualified_name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            resolver,
            qualified_name: qualified_name.into(),
            attributes,
        }
    }

    /// Directory sub-modules of this package are resolved in.
    pub fn package_dir(&self) -> Option<&Path> {
        self.attributes.get(PACKAGE_DIR).and_then(|v| v.as_path())
    }

    /// Archive handle stored by an archive resolver.
    pub fn archive(&self) -> Option<&ArchiveHandle> {
        self.attributes.get(ARCHIVE).and_then(|v| v.as_archive())
    }
}

/// A single request from the host module table.
#[derive(Debug, Clone)]
pub struct ModuleRequest<'a> {
    /// Enclosing package, for dotted sub-names.
    pub parent: Option<&'a PackageContext>,
    /// Last component of the dotted name.
    pub module_name: String,
    /// Full dotted name.
    pub qualified_name: String,
}

impl<'a> ModuleRequest<'a> {
    pub fn new(
        parent: Option<&'a PackageContext>,
        module_name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Self {
        Self {
            parent,
            module_name: module_name.into(),
            qualified_name: qualified_name.into(),
        }
    }

    /// Request for a top-level module.
    pub fn top_level(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            parent: None,
            qualified_name: name.clone(),
            module_name: name,
        }
    }

    /// Request for `name` inside `parent`.
    pub fn child(parent: &'a PackageContext, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            parent: Some(parent),
            qualified_name: format!("{}.{}", parent.qualified_name, name),
            module_name: name,
        }
    }
}
