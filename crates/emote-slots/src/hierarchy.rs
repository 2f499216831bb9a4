//! Avatar object hierarchy
//!
//! Templates are attached to nodes of the avatar's object tree. The tree
//! decides two things: whether a template is live (its node and every
//! ancestor are active) and the order templates are considered in
//! (depth-first sibling order, see [`Hierarchy::compare`]).

use crate::error::SlotError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

/// Stable per-node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw identity
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identity
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Object in the avatar tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Identity
    pub id: NodeId,
    /// Object name
    pub name: String,
    /// Parent, `None` for the avatar root
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Children in sibling order
    #[serde(default)]
    pub children: Vec<NodeId>,
    /// Local active flag
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Avatar object tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hierarchy {
    root: Option<NodeId>,
    #[serde(with = "indexmap::map::serde_seq")]
    nodes: IndexMap<NodeId, HierarchyNode>,
    next_id: u64,
}

impl Hierarchy {
    /// Tree with a single root node
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut tree = Self::default();
        let id = tree.allocate();
        tree.nodes.insert(
            id,
            HierarchyNode {
                id,
                name: root_name.into(),
                parent: None,
                children: Vec::new(),
                active: true,
            },
        );
        tree.root = Some(id);
        tree
    }

    fn allocate(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    /// Avatar root
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by id
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(&id)
    }

    /// Node name
    #[inline]
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a child as the last sibling under `parent`
    ///
    /// # Errors
    /// Returns [`SlotError::UnknownNode`] if `parent` is not in the tree
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SlotError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SlotError::UnknownNode(parent));
        }
        let id = self.allocate();
        self.nodes.insert(
            id,
            HierarchyNode {
                id,
                name: name.into(),
                parent: Some(parent),
                children: Vec::new(),
                active: true,
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Set the local active flag
    ///
    /// # Errors
    /// Returns [`SlotError::UnknownNode`] if `id` is not in the tree
    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<(), SlotError> {
        let node = self.nodes.get_mut(&id).ok_or(SlotError::UnknownNode(id))?;
        node.active = active;
        Ok(())
    }

    /// Ancestors of `id`, nearest first, including `id`
    ///
    /// Stops at the root or at the first repeated node.
    fn lineage(&self, id: NodeId) -> Option<Vec<&HierarchyNode>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            let node = self.nodes.get(&current)?;
            chain.push(node);
            cursor = node.parent;
        }
        Some(chain)
    }

    /// Whether the node and every ancestor are active
    #[must_use]
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        self.lineage(id)
            .is_some_and(|chain| chain.iter().all(|n| n.active))
    }

    /// Sibling indices from the top of the tree down to `id`
    ///
    /// The first entry is the index of the topmost ancestor (`0` for the
    /// root). `None` if the node or one of its parents is missing, or if the
    /// node is not listed among its parent's children.
    #[must_use]
    pub fn sibling_path(&self, id: NodeId) -> Option<Vec<usize>> {
        let chain = self.lineage(id)?;
        let mut path = Vec::with_capacity(chain.len());
        for node in &chain {
            let index = match node.parent {
                Some(parent) => self
                    .nodes
                    .get(&parent)?
                    .children
                    .iter()
                    .position(|c| *c == node.id)?,
                None => 0,
            };
            path.push(index);
        }
        path.reverse();
        Some(path)
    }

    /// Depth-first order between two nodes
    ///
    /// Compares sibling paths element by element; a prefix sorts before the
    /// longer path, and equal paths fall back to node identity. Nodes whose
    /// path cannot be built sort last.
    #[must_use]
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        match (self.sibling_path(a), self.sibling_path(b)) {
            (Some(pa), Some(pb)) => pa.cmp(&pb).then_with(|| a.cmp(&b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(&b),
        }
    }

    /// Nodes in depth-first pre-order from the root
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else { continue };
            order.push(id);
            stack.extend(node.children.iter().rev());
        }
        order
    }
}
