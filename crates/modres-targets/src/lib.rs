//! Platform definitions and platform-override resolution for modres.
//!
//! A module may ship platform-specific variants in override trees next to
//! its base source (`dir/__<platform>__/foo.mod`). Platforms form chains from
//! most specific to most generic; the first platform in the chain with an
//! override wins, and the override tier is consulted before the base cache.
//!
//! - **Platform definitions** are loaded from TOML with optional parents
//! - **Chains** are resolved from definitions or given explicitly
//! - **Override plans** carry the override source/cache pair and decide
//!   whether the override's cached compile may be trusted

pub mod error;
pub mod overrides;
pub mod parse;
pub mod platform;

pub use error::{Result, TargetError};
pub use overrides::{BaseStamps, OverridePlan};
pub use parse::{load_platforms_toml, parse_platforms_toml};
pub use platform::{PlatformChain, PlatformDef, PlatformSet};
