//! modres CLI: resolve modules, inspect cache records, and clean caches.

mod commands;
mod logging;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use manifest::ModresManifest;

#[derive(Parser)]
#[command(name = "modres", version, about = "Module resolution with compiled-artifact caching")]
struct Cli {
    /// Enable debug logging (overrides MODRES_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a dotted module name, compiling and caching as needed
    Resolve {
        /// Dotted module name (e.g., pkg.sub.module)
        name: String,
        /// Search directory; repeatable (default: modres.toml, then MODRES_PATH)
        #[arg(long = "path")]
        paths: Vec<PathBuf>,
        /// Resolver settings file (replaces the manifest's [resolver] section)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Platform whose override trees are consulted
        #[arg(long)]
        platform: Option<String>,
        /// Use optimized cache records instead of debug ones
        #[arg(long)]
        optimized: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the header of a cache record
    Inspect {
        /// Cache record file
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove cache records of both flavors
    Clean {
        /// Directory to clean recursively; repeatable
        #[arg(long = "path")]
        paths: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Resolve {
            name,
            paths,
            config,
            platform,
            optimized,
            json,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let options = commands::resolve::ResolveOptions {
                paths,
                config,
                platform,
                optimized,
                json,
            };
            commands::resolve::run(
                &name,
                manifest.as_ref(),
                project_dir.as_deref(),
                &options,
            )
        }

        Commands::Inspect { file, json } => commands::inspect::run(&file, json),

        Commands::Clean { paths } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let roots = if !paths.is_empty() {
                paths
            } else {
                match (&manifest, &project_dir) {
                    (Some(m), Some(dir)) if !m.search.paths.is_empty() => m.search_paths(dir),
                    _ => vec![cwd.clone()],
                }
            };
            let config = manifest.map(|m| m.resolver).unwrap_or_default();
            commands::clean::run(&roots, &config.layout())
        }
    }
}

/// Load `modres.toml` if one exists in the current directory or above.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<ModresManifest>, Option<PathBuf>)> {
    match ModresManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
