//! Avatar descriptor and build input
//!
//! The descriptor is the host's view of an avatar: one controller slot per
//! layer kind, each either using the platform default or a custom graph, and
//! the current menu root. [`Avatar`] bundles it with the object hierarchy,
//! the authored slot templates and the menu store.

use emote_model::{BehaviorGraph, MenuId, MenuStore};
use emote_slots::{Hierarchy, SlotTemplate};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Controller slot on the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Locomotion
    Base,
    /// Additive
    Additive,
    /// Hand gestures
    Gesture,
    /// Full-body emote actions
    Action,
    /// Effects
    Fx,
}

impl Display for LayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::Additive => "additive",
            Self::Gesture => "gesture",
            Self::Action => "action",
            Self::Fx => "fx",
        };
        f.write_str(name)
    }
}

/// One controller slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayer {
    /// Which slot
    pub kind: LayerKind,
    /// Whether the platform default controller is used
    #[serde(default)]
    pub is_default: bool,
    /// Controller to merge into; for a default slot, the host's copy of
    /// the platform controller
    #[serde(default)]
    pub graph: Option<BehaviorGraph>,
}

impl BaseLayer {
    /// Slot using a custom controller
    #[must_use]
    pub fn custom(kind: LayerKind, graph: BehaviorGraph) -> Self {
        Self {
            kind,
            is_default: false,
            graph: Some(graph),
        }
    }

    /// Slot using the platform default, with no controller supplied
    #[must_use]
    pub fn default_for(kind: LayerKind) -> Self {
        Self {
            kind,
            is_default: true,
            graph: None,
        }
    }

    /// Slot using the platform default, with the host's copy of it
    #[must_use]
    pub fn stock(kind: LayerKind, graph: BehaviorGraph) -> Self {
        Self {
            kind,
            is_default: true,
            graph: Some(graph),
        }
    }
}

/// Host avatar descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    /// Avatar name
    pub name: String,
    /// Controller slots
    #[serde(default)]
    pub base_layers: Vec<BaseLayer>,
    /// Current menu root
    #[serde(default)]
    pub menu_root: Option<MenuId>,
}

impl AvatarDescriptor {
    /// Create descriptor with no layers and no menu
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add or replace a controller slot
    #[must_use]
    pub fn with_layer(mut self, layer: BaseLayer) -> Self {
        self.base_layers.retain(|l| l.kind != layer.kind);
        self.base_layers.push(layer);
        self
    }

    /// Set the menu root
    #[must_use]
    pub fn with_menu_root(mut self, root: MenuId) -> Self {
        self.menu_root = Some(root);
        self
    }

    /// Controller slot by kind
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&BaseLayer> {
        self.base_layers.iter().find(|l| l.kind == kind)
    }

    /// Controller of a slot, default or custom
    #[must_use]
    pub fn graph(&self, kind: LayerKind) -> Option<&BehaviorGraph> {
        self.layer(kind).and_then(|l| l.graph.as_ref())
    }

    /// Mutable controller of a slot, default or custom
    pub fn graph_mut(&mut self, kind: LayerKind) -> Option<&mut BehaviorGraph> {
        self.base_layers
            .iter_mut()
            .find(|l| l.kind == kind)
            .and_then(|l| l.graph.as_mut())
    }
}

/// Everything a build reads about one avatar
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Avatar {
    /// Descriptor
    pub descriptor: AvatarDescriptor,
    /// Object hierarchy
    pub hierarchy: Hierarchy,
    /// Authored slot templates
    #[serde(default)]
    pub templates: Vec<SlotTemplate>,
    /// Menu node storage
    #[serde(default)]
    pub menus: MenuStore,
}

impl Avatar {
    /// Bundle an avatar
    #[must_use]
    pub fn new(descriptor: AvatarDescriptor, hierarchy: Hierarchy) -> Self {
        Self {
            descriptor,
            hierarchy,
            templates: Vec::new(),
            menus: MenuStore::new(),
        }
    }

    /// Add a slot template
    pub fn add_template(&mut self, template: SlotTemplate) {
        self.templates.push(template);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layers_expose_a_supplied_graph() {
        let mut descriptor = AvatarDescriptor::new("Avatar")
            .with_layer(BaseLayer::custom(LayerKind::Fx, BehaviorGraph::new("FX")))
            .with_layer(BaseLayer::stock(LayerKind::Action, BehaviorGraph::new("Stock")))
            .with_layer(BaseLayer::default_for(LayerKind::Gesture));
        assert!(descriptor.graph(LayerKind::Fx).is_some());
        assert_eq!(descriptor.graph_mut(LayerKind::Action).unwrap().name, "Stock");
        assert!(descriptor.layer(LayerKind::Action).unwrap().is_default);
        assert!(descriptor.layer(LayerKind::Gesture).is_some());
        assert!(descriptor.graph(LayerKind::Gesture).is_none());
        assert!(descriptor.graph(LayerKind::Base).is_none());
    }

    #[test]
    fn with_layer_replaces_same_kind() {
        let mut descriptor = AvatarDescriptor::new("Avatar")
            .with_layer(BaseLayer::default_for(LayerKind::Action))
            .with_layer(BaseLayer::custom(LayerKind::Action, BehaviorGraph::new("Custom")));
        assert_eq!(descriptor.base_layers.len(), 1);
        assert_eq!(descriptor.graph_mut(LayerKind::Action).unwrap().name, "Custom");
    }
}
