//! Module attributes handed to the host module table.

use std::any::Any;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Attribute holding a package's own directory.
pub const PACKAGE_DIR: &str = "package_dir";
/// Attribute holding a package's sub-module search path.
pub const SEARCH_PATH: &str = "search_path";
/// Attribute holding the file a module was resolved from.
pub const SOURCE_PATH: &str = "source_path";
/// Attribute holding the archive handle of an archive package.
pub const ARCHIVE: &str = "archive";

/// Attributes installed alongside a module, keyed by name.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A single attribute value.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Path(PathBuf),
    PathList(Vec<PathBuf>),
    Text(String),
    Archive(ArchiveHandle),
}

impl AttrValue {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            AttrValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_path_list(&self) -> Option<&[PathBuf]> {
        match self {
            AttrValue::PathList(paths) => Some(paths),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_archive(&self) -> Option<&ArchiveHandle> {
        match self {
            AttrValue::Archive(h) => Some(h),
            _ => None,
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Path(a), AttrValue::Path(b)) => a == b,
            (AttrValue::PathList(a), AttrValue::PathList(b)) => a == b,
            (AttrValue::Text(a), AttrValue::Text(b)) => a == b,
            (AttrValue::Archive(a), AttrValue::Archive(b)) => a.same_handle(b),
            _ => false,
        }
    }
}

/// Opaque, shareable handle returned by an archive locator.
///
/// The archive resolver that created the handle downcasts it back to its
/// concrete type when resolving members of the archive package.
#[derive(Clone)]
pub struct ArchiveHandle(Arc<dyn Any + Send + Sync>);

impl ArchiveHandle {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        ArchiveHandle(Arc::new(value))
    }

    /// Borrow the handle as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles point at the same archive value.
    pub fn same_handle(&self, other: &ArchiveHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArchiveHandle({:p})", Arc::as_ptr(&self.0))
    }
}
