//! The resolver capability.
//!
//! The host module table calls [`Resolver::resolve`] once per unresolved
//! module reference, passing the parent package's context for dotted
//! sub-names. Implementations are used through `dyn Resolver` values so a
//! table can hold any mix of variants.

use modres_core::{ModuleRequest, ResolutionOutcome, ResolverId};

use crate::error::Result;

/// A backing-store-specific strategy for turning module names into units.
pub trait Resolver: Send + Sync {
    /// Identity stamped into package contexts this resolver produces.
    fn id(&self) -> ResolverId;

    /// Resolve one request.
    fn resolve(&self, request: &ModuleRequest<'_>) -> Result<ResolutionOutcome>;
}

/// Resolve a dotted name component by component through one resolver.
///
/// Each intermediate component must resolve to a package; its context scopes
/// the next request. Returns `NotFound` as soon as any component is missing
/// or a leaf module appears mid-path. Names with an empty component
/// (`""`, `"a."`, `"a..b"`) never reach the resolver.
pub fn resolve_dotted(resolver: &dyn Resolver, dotted: &str) -> Result<ResolutionOutcome> {
    if dotted.split('.').any(str::is_empty) {
        return Ok(ResolutionOutcome::NotFound);
    }
    let mut parent = None;
    let mut components = dotted.split('.').peekable();

    while let Some(name) = components.next() {
        let (qualified, outcome) = {
            let request = match &parent {
                Some(ctx) => ModuleRequest::child(ctx, name),
                None => ModuleRequest::top_level(name),
            };
            (request.qualified_name.clone(), resolver.resolve(&request)?)
        };
        let module = match outcome {
            ResolutionOutcome::Found(module) => module,
            ResolutionOutcome::NotFound => return Ok(ResolutionOutcome::NotFound),
        };
        if components.peek().is_none() {
            return Ok(module.into());
        }
        match module.into_package_context(resolver.id(), qualified) {
            Some(ctx) => parent = Some(ctx),
            None => return Ok(ResolutionOutcome::NotFound),
        }
    }
    Ok(ResolutionOutcome::NotFound)
}
