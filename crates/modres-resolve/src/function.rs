//! Closure-backed resolver.

use modres_core::{ModuleRequest, ResolutionOutcome, ResolverId};

use crate::error::Result;
use crate::resolver::Resolver;

/// Delegates every request to a closure.
pub struct FunctionResolver<F> {
    id: ResolverId,
    func: F,
}

impl<F> FunctionResolver<F>
where
    F: Fn(&ModuleRequest<'_>) -> Result<ResolutionOutcome> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self {
            id: ResolverId::new(),
            func,
        }
    }
}

impl<F> Resolver for FunctionResolver<F>
where
    F: Fn(&ModuleRequest<'_>) -> Result<ResolutionOutcome> + Send + Sync,
{
    fn id(&self) -> ResolverId {
        self.id
    }

    fn resolve(&self, request: &ModuleRequest<'_>) -> Result<ResolutionOutcome> {
        (self.func)(request)
    }
}

impl<F> std::fmt::Debug for FunctionResolver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionResolver").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use modres_core::{Attributes, CompiledUnit, PackageContext, ResolvedModule};

    #[test]
    fn delegates_request_unchanged() {
        let resolver = FunctionResolver::new(|req: &ModuleRequest<'_>| {
            let code = req.module_name.clone().into_bytes();
            let unit = CompiledUnit::new(req.qualified_name.clone(), "", code);
            Ok(ResolvedModule::new(false, unit, Attributes::new()).into())
        });
        let parent = PackageContext::new(ResolverId::new(), "pkg", Attributes::new());

        let module = resolver
            .resolve(&ModuleRequest::child(&parent, "sub"))
            .unwrap()
            .found()
            .unwrap();
        let unit = module.compiled().unwrap();
        assert_eq!(unit.module, "pkg.sub");
        assert_eq!(unit.code, b"sub");
    }

    #[test]
    fn errors_pass_through() {
        let resolver = FunctionResolver::new(|_: &ModuleRequest<'_>| {
            Err(ResolveError::ContractViolation {
                detail: "nope".into(),
            })
        });
        let err = resolver.resolve(&ModuleRequest::top_level("x")).unwrap_err();
        assert!(matches!(err, ResolveError::ContractViolation { .. }));
    }

    #[test]
    fn each_instance_has_its_own_id() {
        let a = FunctionResolver::new(|_: &ModuleRequest<'_>| Ok(ResolutionOutcome::NotFound));
        let b = FunctionResolver::new(|_: &ModuleRequest<'_>| Ok(ResolutionOutcome::NotFound));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.id());
    }
}
