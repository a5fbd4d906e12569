//! Filesystem resolution engine.
//!
//! Given a directory and a module name, decides between package and leaf
//! module and between native extension and source, then picks the first
//! usable unit from:
//!
//! 1. the platform-override compile (`dir/__<platform>__/foo.modc`)
//! 2. the base compile (`dir/foo.modc`)
//! 3. a fresh compile of the base source plus its override, written back to
//!    the cache on a best-effort basis
//!
//! Cache records are only trusted when their stored stamp equals the current
//! timestamp of the source they cache.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use modres_core::attrs::{PACKAGE_DIR, SEARCH_PATH, SOURCE_PATH};
use modres_core::{
    ArtifactLayout, AttrValue, Attributes, CompileRequest, CompiledUnit, Compiler, NativeLoader,
    NativeSuffix, ResolutionOutcome, ResolvedModule,
};
use modres_targets::{BaseStamps, OverridePlan, PlatformChain};
use serde::Serialize;

use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};

/// Statistics about engine activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Units produced by the compiler.
    pub compiles: usize,
    /// Units loaded from base cache records.
    pub cache_hits: usize,
    /// Units loaded from platform-override cache records.
    pub override_hits: usize,
    /// Native extensions handed to the loader.
    pub native_loads: usize,
    /// Cache writes that failed and were ignored.
    pub cache_write_failures: usize,
}

#[derive(Debug, Default)]
struct Counters {
    compiles: AtomicUsize,
    cache_hits: AtomicUsize,
    override_hits: AtomicUsize,
    native_loads: AtomicUsize,
    cache_write_failures: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::Relaxed);
}

/// Resolves modules inside plain directories.
pub struct FilesystemResolver {
    layout: ArtifactLayout,
    native_suffixes: Vec<NativeSuffix>,
    platforms: PlatformChain,
    compiler: Arc<dyn Compiler>,
    native_loader: Option<Arc<dyn NativeLoader>>,
    counters: Counters,
}

impl FilesystemResolver {
    /// Create an engine from its configuration and compiler.
    ///
    /// Without a native loader, native suffixes are never probed.
    pub fn new(config: ResolverConfig, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            layout: config.layout(),
            native_suffixes: config.native_suffixes,
            platforms: config.platforms,
            compiler,
            native_loader: None,
            counters: Counters::default(),
        }
    }

    pub fn with_native_loader(mut self, loader: Arc<dyn NativeLoader>) -> Self {
        self.native_loader = Some(loader);
        self
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub fn platforms(&self) -> &PlatformChain {
        &self.platforms
    }

    /// Snapshot of activity counters.
    pub fn statistics(&self) -> ResolveStats {
        let c = &self.counters;
        ResolveStats {
            compiles: c.compiles.load(Ordering::Relaxed),
            cache_hits: c.cache_hits.load(Ordering::Relaxed),
            override_hits: c.override_hits.load(Ordering::Relaxed),
            native_loads: c.native_loads.load(Ordering::Relaxed),
            cache_write_failures: c.cache_write_failures.load(Ordering::Relaxed),
        }
    }

    /// Resolve `module_name` inside `dir`.
    pub fn resolve_in(
        &self,
        dir: &Path,
        module_name: &str,
        qualified_name: &str,
    ) -> Result<ResolutionOutcome> {
        if !is_plain_name(module_name) {
            return Ok(ResolutionOutcome::NotFound);
        }
        let mut stem = dir.join(module_name);
        let mut attributes = Attributes::new();
        let is_package = stem.is_dir();

        if is_package {
            attributes.insert(PACKAGE_DIR.into(), AttrValue::Path(stem.clone()));
            attributes.insert(SEARCH_PATH.into(), AttrValue::PathList(vec![stem.clone()]));
            stem = stem.join(self.layout.package_root());
        } else if let Some(native) = self.load_native(&stem)? {
            return Ok(native.into());
        }

        let source = self.layout.source_path(&stem);
        let cache = self.layout.cache_path(&stem);
        let base = BaseStamps::probe(&source, &cache);
        if base.is_absent() {
            return Ok(ResolutionOutcome::NotFound);
        }

        let plan = self.platforms.plan(&source, &self.layout);
        let unit = match self.load_cached(&cache, base, plan.as_ref()) {
            Some(unit) => unit,
            None => self.compile_and_record(
                module_name,
                qualified_name,
                &source,
                &cache,
                base,
                plan.as_ref(),
            )?,
        };

        attributes.insert(SOURCE_PATH.into(), AttrValue::Path(source));
        Ok(ResolvedModule::new(is_package, unit, attributes).into())
    }

    fn load_native(&self, stem: &Path) -> Result<Option<ResolvedModule>> {
        let Some(loader) = &self.native_loader else {
            return Ok(None);
        };
        for suffix in &self.native_suffixes {
            let path = with_suffix(stem, &suffix.suffix);
            if !opens_as_file(&path) {
                continue;
            }
            tracing::debug!(path = %path.display(), "loading native extension");
            let unit = loader
                .load_native(&path, suffix)
                .map_err(|source| ResolveError::NativeLoad {
                    path: path.clone(),
                    source,
                })?;
            bump(&self.counters.native_loads);

            let mut attributes = Attributes::new();
            attributes.insert(SOURCE_PATH.into(), AttrValue::Path(path));
            return Ok(Some(ResolvedModule::new(false, unit, attributes)));
        }
        Ok(None)
    }

    fn load_cached(
        &self,
        cache: &Path,
        base: BaseStamps,
        plan: Option<&OverridePlan>,
    ) -> Option<CompiledUnit> {
        if let Some(plan) = plan {
            if let Some(unit) = plan.try_load(base) {
                tracing::debug!(
                    platform = %plan.platform,
                    cache = %plan.cache_path.display(),
                    "loaded platform override from cache"
                );
                bump(&self.counters.override_hits);
                return Some(unit);
            }
            // The base cache never includes the override, so a live
            // override source forces a recompile.
            if plan.has_source() {
                return None;
            }
        }

        if !base.cache_is_fresh() {
            return None;
        }
        let unit = modres_cache::try_load(cache, base.source)?;
        tracing::trace!(cache = %cache.display(), "loaded from cache");
        bump(&self.counters.cache_hits);
        Some(unit)
    }

    fn compile_and_record(
        &self,
        module_name: &str,
        qualified_name: &str,
        source: &Path,
        cache: &Path,
        base: BaseStamps,
        plan: Option<&OverridePlan>,
    ) -> Result<CompiledUnit> {
        let Some(source_ts) = base.source else {
            return Err(ResolveError::OrphanedCache {
                cache: cache.to_path_buf(),
            });
        };

        let request = CompileRequest {
            module_name,
            qualified_name,
            source,
            platform_override: plan
                .filter(|p| p.has_source())
                .map(|p| p.source_path.as_path()),
        };
        tracing::debug!(module = qualified_name, source = %source.display(), "compiling");
        let unit = self
            .compiler
            .compile(&request)
            .map_err(|source| ResolveError::Compile {
                module: qualified_name.to_string(),
                source,
            })?;
        bump(&self.counters.compiles);

        let (record_path, record_ts) = plan
            .and_then(|p| p.record_target())
            .unwrap_or((cache, source_ts));
        // Best-effort: a failed write only costs a recompile next time.
        if let Err(e) = modres_cache::write(record_path, record_ts, &unit) {
            tracing::debug!(cache = %record_path.display(), error = %e, "cache write failed");
            bump(&self.counters.cache_write_failures);
        }
        Ok(unit)
    }
}

impl std::fmt::Debug for FilesystemResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesystemResolver")
            .field("layout", &self.layout)
            .field("native_suffixes", &self.native_suffixes)
            .field("platforms", &self.platforms)
            .field("native_loader", &self.native_loader.is_some())
            .finish()
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(stem.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

/// A name that joins onto a directory as exactly one new component.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', std::path::MAIN_SEPARATOR])
}

fn opens_as_file(path: &Path) -> bool {
    File::open(path)
        .and_then(|f| f.metadata())
        .is_ok_and(|m| m.is_file())
}
