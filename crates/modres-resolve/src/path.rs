//! Resolver over an ordered search path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modres_core::{ModuleRequest, ResolutionOutcome, ResolverId};

use crate::error::{ResolveError, Result};
use crate::fs::FilesystemResolver;
use crate::resolver::Resolver;

/// Environment variable holding the default search path.
pub const SEARCH_PATH_ENV: &str = "MODRES_PATH";

/// Tries each directory of a search path in order.
///
/// Sub-modules are only looked up in their parent's package directory, never
/// on the search path.
#[derive(Debug, Clone)]
pub struct PathResolver {
    id: ResolverId,
    paths: Vec<PathBuf>,
    fs: Arc<FilesystemResolver>,
}

impl PathResolver {
    pub fn new(paths: Vec<PathBuf>, fs: Arc<FilesystemResolver>) -> Self {
        Self {
            id: ResolverId::new(),
            paths,
            fs,
        }
    }

    /// Search path taken from `MODRES_PATH`; empty when unset.
    pub fn from_env(fs: Arc<FilesystemResolver>) -> Self {
        let paths = std::env::var_os(SEARCH_PATH_ENV)
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default();
        Self::new(paths, fs)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn resolve_top_level(&self, request: &ModuleRequest<'_>) -> Result<ResolutionOutcome> {
        for dir in &self.paths {
            let outcome = self
                .fs
                .resolve_in(dir, &request.module_name, &request.qualified_name)?;
            if outcome.is_found() {
                tracing::trace!(
                    module = %request.qualified_name,
                    dir = %dir.display(),
                    "found on search path"
                );
                return Ok(outcome);
            }
        }
        Ok(ResolutionOutcome::NotFound)
    }
}

impl Resolver for PathResolver {
    fn id(&self) -> ResolverId {
        self.id
    }

    fn resolve(&self, request: &ModuleRequest<'_>) -> Result<ResolutionOutcome> {
        let Some(parent) = request.parent else {
            return self.resolve_top_level(request);
        };
        let dir: &Path = parent.package_dir().ok_or_else(|| {
            ResolveError::contract(format!(
                "parent package '{}' has no package directory",
                parent.qualified_name
            ))
        })?;
        self.fs
            .resolve_in(dir, &request.module_name, &request.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::resolver::resolve_dotted;
    use modres_core::{BoxError, CompileRequest, CompiledUnit, Compiler};
    use std::fs;

    fn engine() -> Arc<FilesystemResolver> {
        let compiler: Arc<dyn Compiler> = Arc::new(
            |req: &CompileRequest<'_>| -> std::result::Result<CompiledUnit, BoxError> {
                Ok(CompiledUnit::new(req.qualified_name, req.source, fs::read(req.source)?))
            },
        );
        Arc::new(FilesystemResolver::new(ResolverConfig::default(), compiler))
    }

    fn code(resolver: &PathResolver, dotted: &str) -> Option<Vec<u8>> {
        resolve_dotted(resolver, dotted)
            .unwrap()
            .found()
            .and_then(|m| m.compiled().map(|u| u.code.clone()))
    }

    #[test]
    fn first_directory_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("foo.mod"), "first").unwrap();
        fs::write(second.path().join("foo.mod"), "second").unwrap();
        fs::write(second.path().join("bar.mod"), "bar").unwrap();
        let resolver = PathResolver::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            engine(),
        );

        assert_eq!(code(&resolver, "foo").as_deref(), Some(&b"first"[..]));
        assert_eq!(code(&resolver, "bar").as_deref(), Some(&b"bar"[..]));
        assert_eq!(code(&resolver, "baz"), None);
    }

    #[test]
    fn sub_modules_ignore_search_path() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let pkg = first.path().join("pkg");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("__init__.mod"), "").unwrap();
        fs::write(second.path().join("only_here.mod"), "x").unwrap();
        let resolver = PathResolver::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            engine(),
        );

        assert_eq!(code(&resolver, "pkg.only_here"), None);
        fs::write(pkg.join("only_here.mod"), "inner").unwrap();
        assert_eq!(code(&resolver, "pkg.only_here").as_deref(), Some(&b"inner"[..]));
    }

    #[test]
    fn errors_stop_the_search() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("bad.mod"), "x").unwrap();
        fs::write(second.path().join("bad.mod"), "y").unwrap();
        let failing: Arc<dyn Compiler> = Arc::new(
            |_: &CompileRequest<'_>| -> std::result::Result<CompiledUnit, BoxError> {
                Err("boom".into())
            },
        );
        let resolver = PathResolver::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            Arc::new(FilesystemResolver::new(ResolverConfig::default(), failing)),
        );

        let err = resolver.resolve(&ModuleRequest::top_level("bad")).unwrap_err();
        assert!(matches!(err, ResolveError::Compile { .. }));
    }

    #[test]
    fn empty_path_finds_nothing() {
        let resolver = PathResolver::new(Vec::new(), engine());
        assert!(!resolver
            .resolve(&ModuleRequest::top_level("anything"))
            .unwrap()
            .is_found());
    }
}
