//! `modres resolve`: resolve a dotted module name through a search path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use modres_core::{BoxError, CacheFlavor, CompileRequest, CompiledUnit, Compiler};
use modres_resolve::{
    resolve_dotted, FilesystemResolver, PathResolver, ResolveStats, ResolverConfig,
};
use modres_targets::PlatformChain;

use super::sha256_hex;
use crate::manifest::ModresManifest;

/// Command-line options for a single resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub paths: Vec<PathBuf>,
    /// Resolver settings file used instead of the manifest's `[resolver]`.
    pub config: Option<PathBuf>,
    pub platform: Option<String>,
    pub optimized: bool,
    pub json: bool,
}

/// Reference compiler: the unit's code is the base source's bytes followed
/// by the override source's bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackingCompiler;

impl Compiler for PackingCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompiledUnit, BoxError> {
        let mut code = std::fs::read(request.source)?;
        if let Some(over) = request.platform_override {
            code.extend(std::fs::read(over)?);
        }
        Ok(CompiledUnit::new(request.qualified_name, request.source, code))
    }
}

/// What a resolution produced.
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub module: String,
    pub is_package: bool,
    pub source_path: Option<PathBuf>,
    /// Modification time of `source_path`, in seconds.
    pub source_mtime: Option<u64>,
    pub code_len: usize,
    pub code_sha256: Option<String>,
    pub platforms: Vec<String>,
    pub search_path: Vec<PathBuf>,
    pub stats: ResolveStats,
}

pub fn run(
    name: &str,
    manifest: Option<&ModresManifest>,
    project_dir: Option<&Path>,
    options: &ResolveOptions,
) -> Result<()> {
    let report = resolve(name, manifest, project_dir, options)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Resolve `name` with settings from `manifest` and `options`.
pub fn resolve(
    name: &str,
    manifest: Option<&ModresManifest>,
    project_dir: Option<&Path>,
    options: &ResolveOptions,
) -> Result<ResolveReport> {
    let mut config = match &options.config {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("loading resolver config {}", path.display()))?,
        None => manifest.map(|m| m.resolver.clone()).unwrap_or_default(),
    };
    if options.optimized {
        config = config.with_flavor(CacheFlavor::Optimized);
    }
    let platform = options
        .platform
        .as_deref()
        .or_else(|| manifest.and_then(|m| m.default_platform()));
    // A platform the manifest does not define is used on its own.
    if let Some(platform) = platform {
        config = match manifest.map(ModresManifest::platform_set) {
            Some(set) if set.get(platform).is_some() => config.select_platform(&set, platform)?,
            _ => config.with_platforms(PlatformChain::new(vec![platform.to_string()])),
        };
    }

    let engine = Arc::new(FilesystemResolver::new(config, Arc::new(PackingCompiler)));
    let resolver = search_resolver(options, manifest, project_dir, engine.clone());
    tracing::debug!(paths = ?resolver.paths(), platforms = ?engine.platforms(), "resolving {name}");

    let module = resolve_dotted(&resolver, name)
        .with_context(|| format!("resolving '{name}'"))?
        .found()
        .with_context(|| format!("module '{name}' not found"))?;

    let unit = module.compiled();
    let source_path = module.source_path().map(Path::to_path_buf);
    Ok(ResolveReport {
        module: name.to_string(),
        is_package: module.is_package,
        source_mtime: source_path
            .as_deref()
            .and_then(modres_core::probe)
            .map(|ts| ts.as_secs()),
        source_path,
        code_len: unit.map_or(0, |u| u.code.len()),
        code_sha256: unit.map(|u| sha256_hex(&u.code)),
        platforms: engine.platforms().platforms().to_vec(),
        search_path: resolver.paths().to_vec(),
        stats: engine.statistics(),
    })
}

/// Command-line paths, then the manifest's, then `MODRES_PATH`, then the
/// current directory.
fn search_resolver(
    options: &ResolveOptions,
    manifest: Option<&ModresManifest>,
    project_dir: Option<&Path>,
    engine: Arc<FilesystemResolver>,
) -> PathResolver {
    if !options.paths.is_empty() {
        return PathResolver::new(options.paths.clone(), engine);
    }
    if let (Some(m), Some(dir)) = (manifest, project_dir) {
        if !m.search.paths.is_empty() {
            return PathResolver::new(m.search_paths(dir), engine);
        }
    }
    let from_env = PathResolver::from_env(engine.clone());
    if from_env.paths().is_empty() {
        return PathResolver::new(vec![PathBuf::from(".")], engine);
    }
    from_env
}

fn print_report(report: &ResolveReport) {
    let kind = if report.is_package { "package" } else { "module" };
    println!("Resolved {} ({kind})", report.module);
    if let Some(source) = &report.source_path {
        match report.source_mtime {
            Some(mtime) => println!("  Source:    {} (mtime {mtime})", source.display()),
            None => println!("  Source:    {}", source.display()),
        }
    }
    match &report.code_sha256 {
        Some(digest) => println!("  Code:      {} bytes, sha256 {digest}", report.code_len),
        None => println!("  Code:      (package marker)"),
    }
    if !report.platforms.is_empty() {
        println!("  Platforms: {}", report.platforms.join(" -> "));
    }
    let stats = &report.stats;
    println!(
        "  Activity:  {} compiled, {} cache hits, {} override hits",
        stats.compiles, stats.cache_hits, stats.override_hits
    );
    if stats.cache_write_failures > 0 {
        println!("  Warning:   {} cache writes failed", stats.cache_write_failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options(dir: &Path) -> ResolveOptions {
        ResolveOptions {
            paths: vec![dir.to_path_buf()],
            ..Default::default()
        }
    }

    #[test]
    fn resolve_compiles_then_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.mod"), "hello").unwrap();

        let first = resolve("foo", None, None, &options(dir.path())).unwrap();
        assert_eq!(first.code_len, 5);
        assert_eq!(first.stats.compiles, 1);
        assert_eq!(first.source_path, Some(dir.path().join("foo.mod")));
        assert!(dir.path().join("foo.modc").is_file());

        let second = resolve("foo", None, None, &options(dir.path())).unwrap();
        assert_eq!(second.stats.compiles, 0);
        assert_eq!(second.stats.cache_hits, 1);
        assert_eq!(second.code_sha256, first.code_sha256);
    }

    #[test]
    fn optimized_flag_selects_other_flavor() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.mod"), "x").unwrap();
        let opts = ResolveOptions {
            optimized: true,
            ..options(dir.path())
        };
        resolve("foo", None, None, &opts).unwrap();
        assert!(dir.path().join("foo.modo").is_file());
        assert!(!dir.path().join("foo.modc").exists());
    }

    #[test]
    fn resolves_sub_module_of_package() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/__init__.mod"), "").unwrap();
        fs::write(dir.path().join("pkg/sub.mod"), "sub").unwrap();

        let report = resolve("pkg.sub", None, None, &options(dir.path())).unwrap();
        assert!(!report.is_package);
        assert_eq!(report.source_path, Some(dir.path().join("pkg/sub.mod")));
        assert_eq!(report.stats.compiles, 2);
    }

    #[test]
    fn platform_override_is_packed_after_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.mod"), "base;").unwrap();
        fs::create_dir(dir.path().join("__web__")).unwrap();
        fs::write(dir.path().join("__web__/foo.mod"), "web").unwrap();
        let opts = ResolveOptions {
            platform: Some("web".into()),
            ..options(dir.path())
        };

        let report = resolve("foo", None, None, &opts).unwrap();
        assert_eq!(report.code_len, "base;web".len());
        assert_eq!(report.code_sha256, Some(sha256_hex(b"base;web")));
        assert_eq!(report.platforms, vec!["web".to_string()]);
        assert!(dir.path().join("__web__/foo.modc").is_file());
    }

    #[test]
    fn manifest_supplies_search_path_and_platform() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/__webkit__")).unwrap();
        fs::write(dir.path().join("lib/foo.mod"), "base;").unwrap();
        fs::write(dir.path().join("lib/__webkit__/foo.mod"), "webkit").unwrap();
        let manifest = ModresManifest::parse(
            r#"
[search]
paths = ["lib"]

[targets]
default = "safari"

[[targets.platform]]
name = "webkit"

[[targets.platform]]
name = "safari"
parent = "webkit"
"#,
        )
        .unwrap();

        let report = resolve(
            "foo",
            Some(&manifest),
            Some(dir.path()),
            &ResolveOptions::default(),
        )
        .unwrap();
        assert_eq!(report.platforms, vec!["safari".to_string(), "webkit".to_string()]);
        assert_eq!(report.code_sha256, Some(sha256_hex(b"base;webkit")));
        assert_eq!(report.search_path, vec![dir.path().join("lib")]);
    }

    #[test]
    fn config_file_replaces_manifest_resolver_section() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.src"), "x").unwrap();
        fs::write(dir.path().join("foo.mod"), "ignored").unwrap();
        let config = dir.path().join("resolver.toml");
        fs::write(&config, "source-extension = \"src\"\nflavor = \"optimized\"\n").unwrap();
        let manifest = ModresManifest::parse("[resolver]\nsource-extension = \"mod\"\n").unwrap();
        let opts = ResolveOptions {
            config: Some(config),
            ..options(dir.path())
        };

        let report = resolve("foo", Some(&manifest), Some(dir.path()), &opts).unwrap();
        assert_eq!(report.source_path, Some(dir.path().join("foo.src")));
        assert!(dir.path().join("foo.srco").is_file());
        assert!(!dir.path().join("foo.modc").exists());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.mod"), "x").unwrap();
        let opts = ResolveOptions {
            config: Some(dir.path().join("nope.toml")),
            ..options(dir.path())
        };
        let err = resolve("foo", None, None, &opts).unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn report_carries_source_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("foo.mod");
        fs::write(&source, "x").unwrap();
        let file = fs::OpenOptions::new().write(true).open(&source).unwrap();
        file.set_modified(std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_234))
            .unwrap();

        let report = resolve("foo", None, None, &options(dir.path())).unwrap();
        assert_eq!(report.source_mtime, Some(1_234));
    }

    #[test]
    fn missing_module_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve("ghost", None, None, &options(dir.path())).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn report_serializes_to_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.mod"), "x").unwrap();
        let report = resolve("foo", None, None, &options(dir.path())).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["module"], "foo");
        assert_eq!(json["stats"]["compiles"], 1);
    }
}
