//! Error types for platform operations.

use std::path::PathBuf;

/// Errors that can occur while loading platforms or building chains.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading platform files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Platform file not found.
    #[error("platform file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A chain referenced a platform that is not defined.
    #[error("unknown platform '{name}'")]
    UnknownPlatform { name: String },

    /// Parent links loop back on themselves.
    #[error("platform chain is cyclic: {}", chain.join(" -> "))]
    CyclicChain { chain: Vec<String> },

    /// Validation error in a platform definition.
    #[error("validation error: {detail}")]
    Validation {
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for platform operations.
pub type Result<T> = std::result::Result<T, TargetError>;
