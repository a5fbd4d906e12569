//! Shared data model for the modres module-resolution engine.
//!
//! Every resolver, the cache codec, and the platform override chain speak in
//! terms of the types defined here:
//! - **Timestamps**: optional modification times, the sole staleness signal
//! - **Compiled units**: opaque executable representations of a module
//! - **Requests and outcomes**: what the host module table asks for and
//!   what it gets back
//! - **Capabilities**: the external compiler and native loader

pub mod attrs;
pub mod capability;
pub mod layout;
pub mod outcome;
pub mod request;
pub mod timestamp;
pub mod unit;

pub use attrs::{ArchiveHandle, AttrValue, Attributes};
pub use capability::{BoxError, CompileRequest, Compiler, NativeLoader, NativeSuffix};
pub use layout::{ArtifactLayout, CacheFlavor};
pub use outcome::{ResolutionOutcome, ResolvedModule};
pub use request::{ModuleRequest, PackageContext, ResolverId};
pub use timestamp::{probe, Timestamp};
pub use unit::{CompiledUnit, ModuleUnit};
