//! Persistent asset references and the host resolution seam
//!
//! Templates, menus and icons are referenced by [`AssetRef`]: a content id, a
//! sub-object id within that content, and a display hint. The merge never
//! loads assets itself; it asks an [`AssetResolver`] and hands new artifacts
//! to an [`AssetSink`].

use crate::graph::BehaviorGraph;
use crate::menu::{Icon, MenuId, MenuNode};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Persistent reference to an asset or sub-asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRef {
    /// Content identifier
    pub guid: String,
    /// Sub-object within the content, `0` for the main object
    pub local_id: i64,
    /// Name at the time the reference was taken
    pub name_hint: String,
}

impl AssetRef {
    /// Reference to the main object of `guid`
    #[inline]
    #[must_use]
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            ..Self::default()
        }
    }

    /// Set the sub-object id
    #[inline]
    #[must_use]
    pub fn with_local_id(mut self, local_id: i64) -> Self {
        self.local_id = local_id;
        self
    }

    /// Set the name hint
    #[inline]
    #[must_use]
    pub fn with_name_hint(mut self, hint: impl Into<String>) -> Self {
        self.name_hint = hint.into();
        self
    }

    /// Whether the reference points at anything
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.guid.is_empty()
    }

    /// Reset to the unset state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Display for AssetRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.name_hint.is_empty() {
            write!(f, "{}:{}", self.guid, self.local_id)
        } else {
            write!(f, "{} ({}:{})", self.name_hint, self.guid, self.local_id)
        }
    }
}

/// Stable identity of a template graph within one build
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Wrap an identity string
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&AssetRef> for TemplateId {
    fn from(reference: &AssetRef) -> Self {
        Self(format!("{}:{}", reference.guid, reference.local_id))
    }
}

impl Display for TemplateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of asset a caller expects from a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Behavior graph template
    Graph,
    /// Menu node
    Menu,
    /// Icon
    Icon,
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Graph => "graph",
            Self::Menu => "menu",
            Self::Icon => "icon",
        };
        f.write_str(name)
    }
}

/// Asset returned by a resolver
#[derive(Debug, Clone, Copy)]
pub enum ResolvedAsset<'a> {
    /// Behavior graph and its identity
    Graph {
        /// Template identity
        id: &'a TemplateId,
        /// Graph contents
        graph: &'a BehaviorGraph,
    },
    /// Menu node in the build's menu store
    Menu(MenuId),
    /// Icon
    Icon(&'a Icon),
}

impl ResolvedAsset<'_> {
    /// Kind of the resolved asset
    #[inline]
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Graph { .. } => AssetKind::Graph,
            Self::Menu(_) => AssetKind::Menu,
            Self::Icon(_) => AssetKind::Icon,
        }
    }
}

/// Host lookup for persistent references
///
/// Resolution is pure: the same reference resolves to the same asset for the
/// whole build. An unset or dangling reference resolves to `None`, and so
/// does a reference whose asset is not of the expected kind.
pub trait AssetResolver {
    /// Resolve a reference expecting `expected`
    fn resolve(&self, reference: &AssetRef, expected: AssetKind) -> Option<ResolvedAsset<'_>>;

    /// Resolve a behavior graph template
    fn resolve_graph(&self, reference: &AssetRef) -> Option<(&TemplateId, &BehaviorGraph)> {
        match self.resolve(reference, AssetKind::Graph)? {
            ResolvedAsset::Graph { id, graph } => Some((id, graph)),
            _ => None,
        }
    }

    /// Resolve a menu node
    fn resolve_menu(&self, reference: &AssetRef) -> Option<MenuId> {
        match self.resolve(reference, AssetKind::Menu)? {
            ResolvedAsset::Menu(id) => Some(id),
            _ => None,
        }
    }

    /// Resolve an icon
    fn resolve_icon(&self, reference: &AssetRef) -> Option<Icon> {
        match self.resolve(reference, AssetKind::Icon)? {
            ResolvedAsset::Icon(icon) => Some(icon.clone()),
            _ => None,
        }
    }
}

/// Artifact handed to the host for persistence
#[derive(Debug, Clone, Copy)]
pub enum SavedAsset<'a> {
    /// Patched host graph
    Graph(&'a BehaviorGraph),
    /// Newly created menu node
    Menu {
        /// Store id of the node
        id: MenuId,
        /// Node contents
        node: &'a MenuNode,
    },
}

/// Host persistence for build artifacts
pub trait AssetSink {
    /// Persist an artifact that must outlive the pass
    fn save(&mut self, asset: SavedAsset<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneGraph {
        reference: AssetRef,
        id: TemplateId,
        graph: BehaviorGraph,
    }

    impl AssetResolver for OneGraph {
        fn resolve(&self, reference: &AssetRef, expected: AssetKind) -> Option<ResolvedAsset<'_>> {
            (reference.is_set() && *reference == self.reference && expected == AssetKind::Graph).then_some(
                ResolvedAsset::Graph {
                    id: &self.id,
                    graph: &self.graph,
                },
            )
        }
    }

    #[test]
    fn unset_reference() {
        let mut r = AssetRef::new("abc").with_local_id(5).with_name_hint("Wave");
        assert!(r.is_set());
        r.clear();
        assert!(!r.is_set());
        assert_eq!(r, AssetRef::default());
    }

    #[test]
    fn template_id_from_reference() {
        let r = AssetRef::new("abc").with_local_id(9);
        assert_eq!(TemplateId::from(&r).as_str(), "abc:9");
    }

    #[test]
    fn default_methods_filter_by_kind() {
        let reference = AssetRef::new("g1");
        let resolver = OneGraph {
            reference: reference.clone(),
            id: TemplateId::from(&reference),
            graph: BehaviorGraph::new("Wave"),
        };
        let (id, graph) = resolver.resolve_graph(&reference).unwrap();
        assert_eq!(id.as_str(), "g1:0");
        assert_eq!(graph.name, "Wave");
        assert!(resolver.resolve_menu(&reference).is_none());
        assert!(resolver.resolve_icon(&reference).is_none());
        assert!(resolver.resolve_graph(&AssetRef::default()).is_none());
    }
}
