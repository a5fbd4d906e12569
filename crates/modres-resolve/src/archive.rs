//! Archive-backed resolution.
//!
//! An archive resolver serves `<archive>.<member>` names. The top-level name
//! locates an archive and becomes a synthetic package whose `archive`
//! attribute carries the handle; members are then looked up through that
//! handle. How archives are found and read is left to an [`ArchiveSource`].

use std::any::Any;
use std::path::{Path, PathBuf};

use modres_core::attrs::ARCHIVE;
use modres_core::{
    ArchiveHandle, AttrValue, Attributes, BoxError, CompiledUnit, ModuleRequest, ModuleUnit,
    ResolutionOutcome, ResolvedModule, ResolverId,
};

use crate::error::{ResolveError, Result};
use crate::resolver::Resolver;

/// A member found inside an archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveMember {
    pub unit: CompiledUnit,
    /// Extra attributes merged into the resolved module.
    pub attributes: Attributes,
}

impl ArchiveMember {
    pub fn new(unit: CompiledUnit) -> Self {
        Self {
            unit,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// The two lookup hooks behind an [`ArchiveResolver`].
pub trait ArchiveSource: Send + Sync {
    /// Context kept on the archive package for later member lookups.
    type Handle: Any + Send + Sync;

    /// Locate the archive named `module_name`.
    fn locate_archive(
        &self,
        module_name: &str,
    ) -> std::result::Result<Option<Self::Handle>, BoxError>;

    /// Locate `module_name` inside a previously located archive.
    fn locate_member(
        &self,
        handle: &Self::Handle,
        module_name: &str,
    ) -> std::result::Result<Option<ArchiveMember>, BoxError>;
}

/// Resolves archives and their members through an [`ArchiveSource`].
pub struct ArchiveResolver<S> {
    id: ResolverId,
    source: S,
}

impl<S: ArchiveSource> ArchiveResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            id: ResolverId::new(),
            source,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn resolve_archive(&self, request: &ModuleRequest<'_>) -> Result<ResolutionOutcome> {
        let handle = self
            .source
            .locate_archive(&request.module_name)
            .map_err(|source| archive_error(request, source))?;
        let Some(handle) = handle else {
            return Ok(ResolutionOutcome::NotFound);
        };
        tracing::debug!(archive = %request.qualified_name, "located archive");

        let mut attributes = Attributes::new();
        attributes.insert(
            ARCHIVE.into(),
            AttrValue::Archive(ArchiveHandle::new(handle)),
        );
        Ok(ResolvedModule::new(true, ModuleUnit::PackageMarker, attributes).into())
    }
}

impl<S: ArchiveSource> Resolver for ArchiveResolver<S> {
    fn id(&self) -> ResolverId {
        self.id
    }

    fn resolve(&self, request: &ModuleRequest<'_>) -> Result<ResolutionOutcome> {
        let Some(parent) = request.parent else {
            return self.resolve_archive(request);
        };
        if parent.resolver != self.id {
            return Err(ResolveError::contract(format!(
                "package '{}' was not resolved by this archive resolver",
                parent.qualified_name
            )));
        }
        let handle = parent
            .archive()
            .and_then(|h| h.downcast_ref::<S::Handle>())
            .ok_or_else(|| {
                ResolveError::contract(format!(
                    "package '{}' carries no usable archive handle",
                    parent.qualified_name
                ))
            })?;

        let member = self
            .source
            .locate_member(handle, &request.module_name)
            .map_err(|source| archive_error(request, source))?;
        Ok(match member {
            Some(member) => ResolvedModule::new(false, member.unit, member.attributes).into(),
            None => ResolutionOutcome::NotFound,
        })
    }
}

impl<S> std::fmt::Debug for ArchiveResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveResolver").field("id", &self.id).finish()
    }
}

fn archive_error(request: &ModuleRequest<'_>, source: BoxError) -> ResolveError {
    ResolveError::Archive {
        module: request.qualified_name.clone(),
        source,
    }
}

/// An archive source serving exactly one archive under a fixed name.
///
/// The handle is the archive path; members are read by `member`.
pub struct NamedArchive<M> {
    module_name: String,
    archive_path: PathBuf,
    member: M,
}

impl<M> NamedArchive<M>
where
    M: Fn(&Path, &str) -> std::result::Result<Option<ArchiveMember>, BoxError> + Send + Sync,
{
    pub fn new(module_name: impl Into<String>, archive_path: impl Into<PathBuf>, member: M) -> Self {
        Self {
            module_name: module_name.into(),
            archive_path: archive_path.into(),
            member,
        }
    }
}

impl<M> ArchiveSource for NamedArchive<M>
where
    M: Fn(&Path, &str) -> std::result::Result<Option<ArchiveMember>, BoxError> + Send + Sync,
{
    type Handle = PathBuf;

    fn locate_archive(&self, module_name: &str) -> std::result::Result<Option<PathBuf>, BoxError> {
        Ok((module_name == self.module_name).then(|| self.archive_path.clone()))
    }

    fn locate_member(
        &self,
        handle: &PathBuf,
        module_name: &str,
    ) -> std::result::Result<Option<ArchiveMember>, BoxError> {
        (self.member)(handle.as_path(), module_name)
    }
}

type LocateArchiveFn<H> =
    Box<dyn Fn(&str) -> std::result::Result<Option<H>, BoxError> + Send + Sync>;
type LocateMemberFn<H> =
    Box<dyn Fn(&H, &str) -> std::result::Result<Option<ArchiveMember>, BoxError> + Send + Sync>;

/// An archive source assembled from two closures.
pub struct HookArchive<H> {
    locate_archive: LocateArchiveFn<H>,
    locate_member: LocateMemberFn<H>,
}

impl<H: Any + Send + Sync> HookArchive<H> {
    pub fn builder() -> HookArchiveBuilder<H> {
        HookArchiveBuilder {
            locate_archive: None,
            locate_member: None,
        }
    }
}

impl<H: Any + Send + Sync> ArchiveSource for HookArchive<H> {
    type Handle = H;

    fn locate_archive(&self, module_name: &str) -> std::result::Result<Option<H>, BoxError> {
        (self.locate_archive)(module_name)
    }

    fn locate_member(
        &self,
        handle: &H,
        module_name: &str,
    ) -> std::result::Result<Option<ArchiveMember>, BoxError> {
        (self.locate_member)(handle, module_name)
    }
}

/// Builder for a [`HookArchive`] resolver; both hooks are required.
pub struct HookArchiveBuilder<H> {
    locate_archive: Option<LocateArchiveFn<H>>,
    locate_member: Option<LocateMemberFn<H>>,
}

impl<H: Any + Send + Sync> HookArchiveBuilder<H> {
    pub fn locate_archive<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<Option<H>, BoxError> + Send + Sync + 'static,
    {
        self.locate_archive = Some(Box::new(hook));
        self
    }

    pub fn locate_member<F>(mut self, hook: F) -> Self
    where
        F: Fn(&H, &str) -> std::result::Result<Option<ArchiveMember>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.locate_member = Some(Box::new(hook));
        self
    }

    /// Build the resolver, failing if either hook was never supplied.
    pub fn build(self) -> Result<ArchiveResolver<HookArchive<H>>> {
        let locate_archive = self
            .locate_archive
            .ok_or_else(|| ResolveError::contract("archive resolver has no locate_archive hook"))?;
        let locate_member = self
            .locate_member
            .ok_or_else(|| ResolveError::contract("archive resolver has no locate_member hook"))?;
        Ok(ArchiveResolver::new(HookArchive {
            locate_archive,
            locate_member,
        }))
    }
}
