//! Resolver error types.

use std::path::PathBuf;

use modres_core::BoxError;
use modres_targets::TargetError;

/// Errors that abort a resolution request.
///
/// Missing modules and unusable cache records are not errors: the former is
/// [`modres_core::ResolutionOutcome::NotFound`], the latter silently falls
/// through to compilation.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The resolver was misconfigured or handed a foreign parent.
    #[error("resolver contract violated: {detail}")]
    ContractViolation { detail: String },

    /// The external compiler failed.
    #[error("failed to compile '{module}': {source}")]
    Compile {
        module: String,
        #[source]
        source: BoxError,
    },

    /// The external native loader failed.
    #[error("failed to load native module {}: {source}", path.display())]
    NativeLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// An archive hook failed while reading its archive.
    #[error("archive lookup failed for '{module}': {source}")]
    Archive {
        module: String,
        #[source]
        source: BoxError,
    },

    /// Only a cache record exists and it cannot be validated.
    #[error("cache record {} has no source to validate against", cache.display())]
    OrphanedCache { cache: PathBuf },
}

impl ResolveError {
    pub(crate) fn contract(detail: impl Into<String>) -> Self {
        ResolveError::ContractViolation {
            detail: detail.into(),
        }
    }
}

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur while loading resolver configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Platform definitions could not be turned into a chain.
    #[error("platform error: {0}")]
    Target(#[from] TargetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
