//! Platform override plans and their precedence rule.

use std::path::{Path, PathBuf};

use modres_core::{probe, ArtifactLayout, CompiledUnit, Timestamp};

/// Timestamps of the base source and its cache record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStamps {
    pub source: Option<Timestamp>,
    pub cache: Option<Timestamp>,
}

impl BaseStamps {
    pub fn probe(source: &Path, cache: &Path) -> Self {
        Self {
            source: probe(source),
            cache: probe(cache),
        }
    }

    /// Neither the source nor its cache exists.
    pub fn is_absent(&self) -> bool {
        self.source.is_none() && self.cache.is_none()
    }

    /// Whether the base cache is at least as new as the base source.
    pub fn cache_is_fresh(&self) -> bool {
        match (self.source, self.cache) {
            (None, _) => true,
            (Some(src), Some(cache)) => cache >= src,
            (Some(_), None) => false,
        }
    }
}

/// A platform-specific source/cache pair that shadows a base source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePlan {
    /// Platform the override belongs to.
    pub platform: String,
    /// Override source path.
    pub source_path: PathBuf,
    /// Override cache record path.
    pub cache_path: PathBuf,
    /// Override source timestamp.
    pub source_timestamp: Option<Timestamp>,
    /// Override cache timestamp.
    pub cache_timestamp: Option<Timestamp>,
}

impl OverridePlan {
    /// Probe the override at `source_path`; `None` unless its source or
    /// cache exists.
    pub fn probe(platform: &str, source_path: PathBuf, layout: &ArtifactLayout) -> Option<Self> {
        let cache_path = layout.cache_path_for_source(&source_path);
        let source_timestamp = probe(&source_path);
        let cache_timestamp = probe(&cache_path);
        if source_timestamp.is_none() && cache_timestamp.is_none() {
            return None;
        }
        Some(Self {
            platform: platform.to_string(),
            source_path,
            cache_path,
            source_timestamp,
            cache_timestamp,
        })
    }

    pub fn has_source(&self) -> bool {
        self.source_timestamp.is_some()
    }

    /// Whether the override tier may be used at all.
    ///
    /// The base source must not be strictly newer than the base cache, the
    /// override source, or the override cache. Each comparison only applies
    /// when both sides exist.
    pub fn is_eligible(&self, base: BaseStamps) -> bool {
        let Some(base_src) = base.source else {
            return true;
        };
        [base.cache, self.source_timestamp, self.cache_timestamp]
            .into_iter()
            .flatten()
            .all(|other| base_src <= other)
    }

    /// Whether the override cache is at least as new as the override source
    /// (or there is no override source at all).
    pub fn cache_is_fresh(&self) -> bool {
        match (self.source_timestamp, self.cache_timestamp) {
            (None, _) => true,
            (Some(src), Some(cache)) => cache >= src,
            (Some(_), None) => false,
        }
    }

    /// Load the override's cached compile if the precedence rule allows it.
    pub fn try_load(&self, base: BaseStamps) -> Option<CompiledUnit> {
        if !self.is_eligible(base) {
            tracing::debug!(
                platform = %self.platform,
                source = %self.source_path.display(),
                "base source is newer than the override tier"
            );
            return None;
        }
        if !self.cache_is_fresh() {
            return None;
        }
        modres_cache::try_load(&self.cache_path, self.source_timestamp)
    }

    /// Cache path and stamp a fresh compile should be recorded under, when
    /// the override has a source.
    pub fn record_target(&self) -> Option<(&Path, Timestamp)> {
        self.source_timestamp
            .map(|ts| (self.cache_path.as_path(), ts))
    }
}
