//! Platform definitions and override chains.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use modres_core::ArtifactLayout;

use crate::error::{Result, TargetError};
use crate::overrides::OverridePlan;

/// A named platform, optionally refining a more generic parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformDef {
    /// Platform identifier, used as the override directory name.
    pub name: String,
    /// More generic platform consulted after this one.
    #[serde(default)]
    pub parent: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

impl PlatformDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            description: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// A collection of platform definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSet {
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformDef>,
}

impl PlatformSet {
    pub fn new(platforms: Vec<PlatformDef>) -> Self {
        Self { platforms }
    }

    pub fn get(&self, name: &str) -> Option<&PlatformDef> {
        self.platforms.iter().find(|p| p.name == name)
    }

    /// Build the chain starting at `name` and following parent links.
    pub fn chain_for(&self, name: &str) -> Result<PlatformChain> {
        let mut chain: Vec<String> = Vec::new();
        let mut current = Some(name.to_string());

        while let Some(name) = current {
            if chain.contains(&name) {
                chain.push(name);
                return Err(TargetError::CyclicChain { chain });
            }
            let def = self
                .get(&name)
                .ok_or_else(|| TargetError::UnknownPlatform { name: name.clone() })?;
            current = def.parent.clone();
            chain.push(name);
        }

        Ok(PlatformChain::new(chain))
    }
}

/// Ordered platform identifiers, most specific first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformChain {
    platforms: Vec<String>,
}

impl PlatformChain {
    pub fn new(platforms: Vec<String>) -> Self {
        Self { platforms }
    }

    /// A chain with no platforms; no override is ever found.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Directory name holding overrides for `platform`.
    pub fn override_dir_name(platform: &str) -> String {
        format!("__{platform}__")
    }

    /// Override source path for `base_source` under `platform`.
    pub fn override_source(base_source: &Path, platform: &str) -> Option<PathBuf> {
        let file_name = base_source.file_name()?;
        let dir = base_source.parent().unwrap_or_else(|| Path::new(""));
        Some(dir.join(Self::override_dir_name(platform)).join(file_name))
    }

    /// Find the highest-priority override of `base_source`.
    ///
    /// Returns a plan for the first platform whose override source or
    /// override cache exists.
    pub fn plan(&self, base_source: &Path, layout: &ArtifactLayout) -> Option<OverridePlan> {
        self.platforms.iter().find_map(|platform| {
            let source = Self::override_source(base_source, platform)?;
            OverridePlan::probe(platform, source, layout)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn browser_set() -> PlatformSet {
        PlatformSet::new(vec![
            PlatformDef::new("browser"),
            PlatformDef::new("webkit").with_parent("browser"),
            PlatformDef::new("safari").with_parent("webkit"),
        ])
    }

    #[test]
    fn chain_follows_parents() {
        let chain = browser_set().chain_for("safari").unwrap();
        assert_eq!(chain.platforms(), &["safari", "webkit", "browser"]);
    }

    #[test]
    fn unknown_platform_rejected() {
        let result = browser_set().chain_for("opera");
        assert!(matches!(result, Err(TargetError::UnknownPlatform { .. })));
    }

    #[test]
    fn missing_parent_rejected() {
        let set = PlatformSet::new(vec![PlatformDef::new("a").with_parent("ghost")]);
        assert!(matches!(
            set.chain_for("a"),
            Err(TargetError::UnknownPlatform { name }) if name == "ghost"
        ));
    }

    #[test]
    fn cycle_rejected() {
        let set = PlatformSet::new(vec![
            PlatformDef::new("a").with_parent("b"),
            PlatformDef::new("b").with_parent("a"),
        ]);
        match set.chain_for("a") {
            Err(TargetError::CyclicChain { chain }) => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn override_source_location() {
        assert_eq!(
            PlatformChain::override_source(Path::new("/lib/foo.mod"), "web"),
            Some(PathBuf::from("/lib/__web__/foo.mod"))
        );
    }

    #[test]
    fn plan_prefers_most_specific_platform() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("foo.mod");
        fs::write(&base, "base").unwrap();
        for platform in ["webkit", "browser"] {
            let d = dir.path().join(PlatformChain::override_dir_name(platform));
            fs::create_dir(&d).unwrap();
            fs::write(d.join("foo.mod"), platform).unwrap();
        }

        let chain = browser_set().chain_for("safari").unwrap();
        let plan = chain.plan(&base, &ArtifactLayout::default()).unwrap();
        assert_eq!(plan.platform, "webkit");
        assert_eq!(plan.source_path, dir.path().join("__webkit__/foo.mod"));
        assert_eq!(plan.cache_path, dir.path().join("__webkit__/foo.modc"));
    }

    #[test]
    fn no_plan_without_override_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("foo.mod");
        fs::write(&base, "base").unwrap();
        fs::create_dir(dir.path().join("__web__")).unwrap();

        let chain = PlatformChain::new(vec!["web".into()]);
        assert!(chain.plan(&base, &ArtifactLayout::default()).is_none());
        assert!(PlatformChain::empty()
            .plan(&base, &ArtifactLayout::default())
            .is_none());
    }
}
