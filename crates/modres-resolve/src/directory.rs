//! Resolver bound to a single directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modres_core::{ModuleRequest, ResolutionOutcome, ResolverId};

use crate::error::{ResolveError, Result};
use crate::fs::FilesystemResolver;
use crate::resolver::Resolver;

/// Resolves top-level modules in one fixed directory, and sub-modules in the
/// directory of their parent package.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    id: ResolverId,
    dir: PathBuf,
    fs: Arc<FilesystemResolver>,
}

impl DirectoryResolver {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<FilesystemResolver>) -> Self {
        Self {
            id: ResolverId::new(),
            dir: dir.into(),
            fs,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Resolver for DirectoryResolver {
    fn id(&self) -> ResolverId {
        self.id
    }

    fn resolve(&self, request: &ModuleRequest<'_>) -> Result<ResolutionOutcome> {
        let dir = match request.parent {
            Some(parent) => parent.package_dir().ok_or_else(|| {
                ResolveError::contract(format!(
                    "parent package '{}' has no package directory",
                    parent.qualified_name
                ))
            })?,
            None => self.dir.as_path(),
        };
        self.fs
            .resolve_in(dir, &request.module_name, &request.qualified_name)
    }
}

impl std::fmt::Display for DirectoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<DirectoryResolver for {:?}>", self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::resolver::resolve_dotted;
    use modres_core::{Attributes, BoxError, CompileRequest, CompiledUnit, Compiler, PackageContext};
    use std::fs;

    fn engine() -> Arc<FilesystemResolver> {
        let compiler: Arc<dyn Compiler> = Arc::new(
            |req: &CompileRequest<'_>| -> std::result::Result<CompiledUnit, BoxError> {
                Ok(CompiledUnit::new(req.qualified_name, req.source, fs::read(req.source)?))
            },
        );
        Arc::new(FilesystemResolver::new(ResolverConfig::default(), compiler))
    }

    #[test]
    fn resolves_top_level_in_own_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.mod"), "foo").unwrap();
        let resolver = DirectoryResolver::new(dir.path(), engine());

        let module = resolver
            .resolve(&ModuleRequest::top_level("foo"))
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(module.compiled().unwrap().code, b"foo");
    }

    #[test]
    fn sub_modules_use_parent_package_dir() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("__init__.mod"), "").unwrap();
        fs::write(pkg.join("sub.mod"), "sub").unwrap();
        // A same-named module at the top level must not be picked up.
        fs::write(dir.path().join("sub.mod"), "wrong").unwrap();
        let resolver = DirectoryResolver::new(dir.path(), engine());

        let module = resolve_dotted(&resolver, "pkg.sub").unwrap().found().unwrap();
        let unit = module.compiled().unwrap();
        assert_eq!(unit.code, b"sub");
        assert_eq!(unit.module, "pkg.sub");
    }

    #[test]
    fn parent_without_package_dir_is_contract_violation() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = DirectoryResolver::new(dir.path(), engine());
        let parent = PackageContext::new(resolver.id(), "odd", Attributes::new());

        let err = resolver
            .resolve(&ModuleRequest::child(&parent, "x"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::ContractViolation { .. }));
    }

    #[test]
    fn display_names_directory() {
        let resolver = DirectoryResolver::new("/lib/mods", engine());
        assert_eq!(resolver.to_string(), "<DirectoryResolver for \"/lib/mods\">");
    }
}
