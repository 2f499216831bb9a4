//! Per-build context
//!
//! Everything that must not outlive one pass lives here: both clone caches
//! and the memoized default menu icon. A fresh context per avatar build keeps
//! builds reproducible and lets different avatars build concurrently.

use crate::config::BuildConfig;
use crate::error::BuildError;
use emote_merge::{CloneCache, MergeOptions};
use emote_model::{AssetRef, AssetResolver, Icon};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tracing::debug;
use ulid::Ulid;

/// Unique build identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildId(pub Ulid);

impl BuildId {
    /// Generate new build ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for BuildId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default menu icon, resolved at most once per build
#[derive(Debug, Clone, Default)]
pub struct IconCache {
    reference: Option<AssetRef>,
    resolved: Option<Option<Icon>>,
}

impl IconCache {
    /// Cache for `reference`
    #[must_use]
    pub fn new(reference: Option<AssetRef>) -> Self {
        Self {
            reference,
            resolved: None,
        }
    }

    /// Icon, resolving through `resolver` on first use
    pub fn get(&mut self, resolver: &dyn AssetResolver) -> Option<Icon> {
        let reference = self.reference.as_ref();
        self.resolved
            .get_or_insert_with(|| {
                let icon = reference.and_then(|r| resolver.resolve_icon(r));
                debug!(found = icon.is_some(), "default menu icon resolved");
                icon
            })
            .clone()
    }

    /// Whether a lookup already happened
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// State threaded through one build pass
#[derive(Debug)]
pub struct BuildContext {
    /// Build identity
    pub id: BuildId,
    /// Configuration the pass runs with
    pub config: BuildConfig,
    /// Engine options derived from `config`
    pub options: MergeOptions,
    /// Clones made by the action engine
    pub action_clones: CloneCache,
    /// Clones made by the effect engine
    pub effect_clones: CloneCache,
    /// Default menu icon
    pub icons: IconCache,
}

impl BuildContext {
    /// Fresh context for one build
    ///
    /// # Errors
    /// Returns [`BuildError::InvalidConfig`] if `config` fails validation
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self {
            id: BuildId::new(),
            options: config.merge_options(),
            icons: IconCache::new(config.default_menu_icon.clone()),
            config,
            action_clones: CloneCache::new(),
            effect_clones: CloneCache::new(),
        })
    }

    /// Total clones produced so far
    #[must_use]
    pub fn clone_count(&self) -> usize {
        self.action_clones.len() + self.effect_clones.len()
    }
}
