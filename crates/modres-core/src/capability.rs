//! Capabilities the engine consumes but does not implement.
//!
//! The compiler and the native-extension loader live outside this workspace.
//! Both are modelled as traits, with blanket impls so plain closures can be
//! plugged in directly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::unit::CompiledUnit;

/// Error type produced by external capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Input to a single compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Short module name (last dotted component).
    pub module_name: &'a str,
    /// Fully qualified module name.
    pub qualified_name: &'a str,
    /// Base source file.
    pub source: &'a Path,
    /// Platform-specific override source, when one exists.
    pub platform_override: Option<&'a Path>,
}

/// Turns a source file into a compiled unit.
pub trait Compiler: Send + Sync {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompiledUnit, BoxError>;
}

impl<F> Compiler for F
where
    F: Fn(&CompileRequest<'_>) -> Result<CompiledUnit, BoxError> + Send + Sync,
{
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompiledUnit, BoxError> {
        self(request)
    }
}

/// A file suffix that identifies a platform-native extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeSuffix {
    /// Appended to the module name, e.g. `.so` or `module.so`.
    pub suffix: String,
    /// Free-form description passed through to the loader.
    #[serde(default)]
    pub label: Option<String>,
}

impl NativeSuffix {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            label: None,
        }
    }

    /// The shared-library suffix of the host platform.
    pub fn host() -> Self {
        Self {
            suffix: std::env::consts::DLL_SUFFIX.to_string(),
            label: Some("host shared library".to_string()),
        }
    }
}

/// Loads a platform-native extension module.
pub trait NativeLoader: Send + Sync {
    fn load_native(&self, path: &Path, suffix: &NativeSuffix) -> Result<CompiledUnit, BoxError>;
}

impl<F> NativeLoader for F
where
    F: Fn(&Path, &NativeSuffix) -> Result<CompiledUnit, BoxError> + Send + Sync,
{
    fn load_native(&self, path: &Path, suffix: &NativeSuffix) -> Result<CompiledUnit, BoxError> {
        self(path, suffix)
    }
}
