//! In-memory asset library
//!
//! A serializable [`AssetResolver`] for hosts that ship their templates,
//! menu references and icons alongside the avatar, and a sink that records
//! what a pass asked to persist.

use emote_model::{
    AssetKind, AssetRef, AssetResolver, AssetSink, BehaviorGraph, Icon, MenuId, ResolvedAsset, SavedAsset, TemplateId,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Assets keyed by reference identity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLibrary {
    graphs: IndexMap<TemplateId, BehaviorGraph>,
    menus: IndexMap<TemplateId, MenuId>,
    icons: IndexMap<TemplateId, Icon>,
}

impl AssetLibrary {
    /// Create empty library
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a graph under `reference`, replacing any previous one
    pub fn insert_graph(&mut self, reference: &AssetRef, graph: BehaviorGraph) {
        self.graphs.insert(TemplateId::from(reference), graph);
    }

    /// Register a menu node under `reference`
    pub fn insert_menu(&mut self, reference: &AssetRef, menu: MenuId) {
        self.menus.insert(TemplateId::from(reference), menu);
    }

    /// Register an icon under `reference`
    pub fn insert_icon(&mut self, reference: &AssetRef, icon: Icon) {
        self.icons.insert(TemplateId::from(reference), icon);
    }

    /// Number of registered assets
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len() + self.menus.len() + self.icons.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetResolver for AssetLibrary {
    fn resolve(&self, reference: &AssetRef, expected: AssetKind) -> Option<ResolvedAsset<'_>> {
        if !reference.is_set() {
            return None;
        }
        let key = TemplateId::from(reference);
        let found = match expected {
            AssetKind::Graph => self
                .graphs
                .get_key_value(&key)
                .map(|(id, graph)| ResolvedAsset::Graph { id, graph }),
            AssetKind::Menu => self.menus.get(&key).copied().map(ResolvedAsset::Menu),
            AssetKind::Icon => self.icons.get(&key).map(ResolvedAsset::Icon),
        };
        if found.is_none() {
            debug!(reference = %reference, kind = %expected, "reference did not resolve");
        }
        found
    }
}

/// What a pass handed over for persistence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedLog {
    /// Names of saved graphs, in save order
    pub graphs: Vec<String>,
    /// Saved menu nodes, in save order
    pub menus: Vec<MenuId>,
}

impl AssetSink for SavedLog {
    fn save(&mut self, asset: SavedAsset<'_>) {
        match asset {
            SavedAsset::Graph(graph) => self.graphs.push(graph.name.clone()),
            SavedAsset::Menu { id, .. } => self.menus.push(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_guid_and_local_id() {
        let mut library = AssetLibrary::new();
        let main = AssetRef::new("g");
        let sub = AssetRef::new("g").with_local_id(7);
        library.insert_graph(&main, BehaviorGraph::new("Main"));
        library.insert_graph(&sub, BehaviorGraph::new("Sub"));

        assert_eq!(library.resolve_graph(&main).unwrap().1.name, "Main");
        let (id, graph) = library.resolve_graph(&sub).unwrap();
        assert_eq!(graph.name, "Sub");
        assert_eq!(id.as_str(), "g:7");
        assert!(library.resolve_graph(&AssetRef::default()).is_none());
    }

    #[test]
    fn kind_mismatch_is_unresolved() {
        let mut library = AssetLibrary::new();
        let reference = AssetRef::new("icon");
        library.insert_icon(&reference, Icon::new("star"));
        assert!(library.resolve_graph(&reference).is_none());
        assert_eq!(library.resolve_icon(&reference), Some(Icon::new("star")));
    }

    #[test]
    fn json_round_trip() {
        let mut library = AssetLibrary::new();
        library.insert_menu(&AssetRef::new("menu"), MenuId::new(4));
        library.insert_graph(&AssetRef::new("wave"), BehaviorGraph::new("Wave"));
        let json = serde_json::to_string(&library).unwrap();
        let back: AssetLibrary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, library);
    }

    #[test]
    fn sink_records_saves() {
        let mut log = SavedLog::default();
        let graph = BehaviorGraph::new("Action");
        log.save(SavedAsset::Graph(&graph));
        assert_eq!(log.graphs, vec!["Action".to_string()]);
    }
}
