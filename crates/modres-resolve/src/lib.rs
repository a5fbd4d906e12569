//! Module resolvers for modres.
//!
//! Turns a module name into a compiled unit from one of several backing
//! stores, reusing cached compiles whenever their source has not changed.
//!
//! # Architecture
//!
//! - [`FilesystemResolver`]: the shared engine: package detection, native
//!   extensions, platform overrides, cache validation, compile on miss
//! - [`Resolver`]: the capability the host module table calls, with four
//!   variants:
//!   - [`DirectoryResolver`]: one fixed directory
//!   - [`PathResolver`]: an ordered search path
//!   - [`ArchiveResolver`]: opaque archives behind two lookup hooks
//!   - [`FunctionResolver`]: delegation to a closure

pub mod archive;
pub mod config;
pub mod directory;
pub mod error;
pub mod fs;
pub mod function;
pub mod path;
pub mod resolver;

// Re-exports for convenience.
pub use archive::{
    ArchiveMember, ArchiveResolver, ArchiveSource, HookArchive, HookArchiveBuilder, NamedArchive,
};
pub use config::ResolverConfig;
pub use directory::DirectoryResolver;
pub use error::{ConfigError, ResolveError, Result};
pub use fs::{FilesystemResolver, ResolveStats};
pub use function::FunctionResolver;
pub use path::{PathResolver, SEARCH_PATH_ENV};
pub use resolver::{resolve_dotted, Resolver};
