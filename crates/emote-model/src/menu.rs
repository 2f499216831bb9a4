//! Selector menu trees
//!
//! Menus live in a [`MenuStore`] and link to sub-menus by [`MenuId`]. Nodes
//! are never edited in place by a build: the patcher appends fresh copies to
//! the store and returns a new root, so earlier ids keep their contents.

use crate::error::ModelError;
use crate::hash::Fingerprint;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt::{self, Display, Formatter};

/// Index of a node inside a [`MenuStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(u32);

impl MenuId {
    /// Wrap a raw index
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Store slot
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for MenuId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "menu{}", self.0)
    }
}

/// Icon reference, opaque to the merge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Icon(String);

impl Icon {
    /// Wrap an icon key
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Icon key
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Control behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlKind {
    /// Sets the parameter for one frame
    #[default]
    Button,
    /// Holds the parameter while selected
    Toggle,
    /// Opens a sub-menu
    SubMenu,
    /// Two-axis puppet
    TwoAxisPuppet,
    /// Four-axis puppet
    FourAxisPuppet,
    /// Radial puppet
    RadialPuppet,
}

impl ControlKind {
    /// Whether the control selects a value directly
    #[inline]
    #[must_use]
    pub fn is_selectable(self) -> bool {
        matches!(self, Self::Button | Self::Toggle)
    }
}

/// Menu entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Display name
    pub name: String,
    /// Icon
    #[serde(default)]
    pub icon: Option<Icon>,
    /// Behavior
    #[serde(default)]
    pub kind: ControlKind,
    /// Bound parameter name
    #[serde(default)]
    pub parameter: Option<String>,
    /// Bound value
    #[serde(default)]
    pub value: f32,
    /// Child menu for [`ControlKind::SubMenu`]
    #[serde(default)]
    pub submenu: Option<MenuId>,
}

impl Control {
    /// Control bound to `parameter == value`
    #[must_use]
    pub fn bound(name: impl Into<String>, kind: ControlKind, parameter: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            icon: None,
            kind,
            parameter: Some(parameter.into()),
            value,
            submenu: None,
        }
    }

    /// Control opening `menu`
    #[must_use]
    pub fn submenu(name: impl Into<String>, menu: MenuId) -> Self {
        Self {
            name: name.into(),
            icon: None,
            kind: ControlKind::SubMenu,
            parameter: None,
            value: 0.0,
            submenu: Some(menu),
        }
    }

    /// Whether the control is bound to `parameter`
    #[inline]
    #[must_use]
    pub fn is_bound_to(&self, parameter: &str) -> bool {
        self.parameter.as_deref() == Some(parameter)
    }

    /// Bound value rounded to the nearest integer
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded_value(&self) -> i32 {
        self.value.round() as i32
    }
}

/// Menu page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuNode {
    /// Node name
    pub name: String,
    /// Entries, in display order
    #[serde(default)]
    pub controls: Vec<Control>,
}

impl MenuNode {
    /// Create empty node
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controls: Vec::new(),
        }
    }

    /// Sub-menus linked from this node, in control order
    pub fn children(&self) -> impl Iterator<Item = MenuId> + '_ {
        self.controls.iter().filter_map(|c| c.submenu)
    }
}

impl Fingerprint for MenuNode {}

/// Storage for menu nodes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuStore {
    nodes: Vec<MenuNode>,
}

impl MenuStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node
    #[allow(clippy::cast_possible_truncation)]
    pub fn push(&mut self, node: MenuNode) -> MenuId {
        let id = MenuId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Node by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: MenuId) -> Option<&MenuNode> {
        self.nodes.get(id.index())
    }

    /// Mutable node by id
    #[inline]
    pub fn get_mut(&mut self, id: MenuId) -> Option<&mut MenuNode> {
        self.nodes.get_mut(id.index())
    }

    /// Node by id or error
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownMenu`] for an id outside the store
    pub fn try_get(&self, id: MenuId) -> Result<&MenuNode, ModelError> {
        self.get(id).ok_or(ModelError::UnknownMenu(id))
    }

    /// Number of stored nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes reachable from `root` in breadth-first order
    ///
    /// Each node appears once even if several controls link to it. Links to
    /// ids outside the store are skipped.
    #[must_use]
    pub fn reachable(&self, root: MenuId) -> Vec<MenuId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([root]);

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.get(id) else { continue };
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            queue.extend(node.children());
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (MenuStore, MenuId, MenuId) {
        let mut store = MenuStore::new();
        let emotes = store.push(MenuNode {
            name: "Emotes".into(),
            controls: (1..=4)
                .map(|v| Control::bound(format!("E{v}"), ControlKind::Button, "VRCEmote", v as f32))
                .collect(),
        });
        let root = store.push(MenuNode {
            name: "Root".into(),
            controls: vec![Control::submenu("Emotes", emotes)],
        });
        (store, root, emotes)
    }

    #[test]
    fn reachable_is_breadth_first() {
        let (store, root, emotes) = tree();
        assert_eq!(store.reachable(root), vec![root, emotes]);
    }

    #[test]
    fn shared_and_cyclic_links_visited_once() {
        let (mut store, root, emotes) = tree();
        let node = store.get_mut(root).unwrap();
        node.controls.push(Control::submenu("Again", emotes));
        node.controls.push(Control::submenu("Self", root));
        assert_eq!(store.reachable(root), vec![root, emotes]);
    }

    #[test]
    fn dangling_links_are_skipped() {
        let (mut store, root, _) = tree();
        store
            .get_mut(root)
            .unwrap()
            .controls
            .push(Control::submenu("Gone", MenuId::new(99)));
        assert_eq!(store.reachable(root).len(), 2);
        assert!(store.try_get(MenuId::new(99)).is_err());
    }

    #[test]
    fn binding_helpers() {
        let control = Control::bound("Wave", ControlKind::Toggle, "VRCEmote", 2.6);
        assert!(control.is_bound_to("VRCEmote"));
        assert!(!control.is_bound_to("Other"));
        assert_eq!(control.rounded_value(), 3);
        assert!(control.kind.is_selectable());
        assert!(!ControlKind::SubMenu.is_selectable());
    }
}
