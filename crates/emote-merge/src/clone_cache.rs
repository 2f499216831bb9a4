//! Build-scoped clone identity cache
//!
//! A template shared by several slots is cloned once per
//! (template, slot, variant). Asking again for the same key returns the
//! clone made the first time, with any edits already applied to it. The
//! cache never evicts; it lives exactly as long as one build.

use emote_model::{BehaviorGraph, TemplateId};
use emote_slots::Slot;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter};
use tracing::debug;

/// Identity of one merge instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CloneKey {
    /// Template graph identity
    pub template: TemplateId,
    /// Winning slot
    pub slot: Slot,
    /// 0 for the action or primary effect template, 1..=2 for additional ones
    pub variant: u8,
}

impl CloneKey {
    /// Key for an action template
    #[inline]
    #[must_use]
    pub fn action(template: TemplateId, slot: Slot) -> Self {
        Self {
            template,
            slot,
            variant: 0,
        }
    }

    /// Key for an effect template variant
    #[inline]
    #[must_use]
    pub fn effect(template: TemplateId, slot: Slot, variant: u8) -> Self {
        Self {
            template,
            slot,
            variant,
        }
    }
}

impl Display for CloneKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}#{}", self.template, self.slot, self.variant)
    }
}

/// Clone handed out by [`CloneCache::clone_distinct`]
#[derive(Debug)]
pub struct Cloned<'a> {
    /// The clone, owned by the cache
    pub graph: &'a mut BehaviorGraph,
    /// Whether this key had been cloned earlier in the build
    pub reused: bool,
}

/// Memoized template clones for one build
#[derive(Debug, Clone, Default)]
pub struct CloneCache {
    clones: IndexMap<CloneKey, BehaviorGraph>,
    hits: usize,
}

impl CloneCache {
    /// Create empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone `template` once per key
    pub fn clone_distinct(&mut self, key: CloneKey, template: &BehaviorGraph) -> Cloned<'_> {
        match self.clones.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                debug!(key = %entry.key(), "clone cache hit");
                Cloned {
                    graph: entry.into_mut(),
                    reused: true,
                }
            }
            Entry::Vacant(entry) => {
                debug!(key = %entry.key(), "cloning template");
                Cloned {
                    graph: entry.insert(Self::clone_plain(template)),
                    reused: false,
                }
            }
        }
    }

    /// Unkeyed deep copy
    #[inline]
    #[must_use]
    pub fn clone_plain(template: &BehaviorGraph) -> BehaviorGraph {
        template.clone()
    }

    /// Clone stored for a key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &CloneKey) -> Option<&BehaviorGraph> {
        self.clones.get(key)
    }

    /// Number of distinct clones
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clones.len()
    }

    /// Whether nothing has been cloned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    /// Number of lookups served from the cache
    #[inline]
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Keys in first-clone order
    pub fn keys(&self) -> impl Iterator<Item = &CloneKey> {
        self.clones.keys()
    }
}
