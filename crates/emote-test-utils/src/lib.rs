//! Testing utilities for the emote workspace
//!
//! Shared fixtures: a host action graph shaped like the stock emote layer,
//! action and effect templates authored against a placeholder slot, emote
//! menus, and an in-memory asset resolver and sink.

#![allow(missing_docs)]

use emote_model::{
    AssetKind, AssetRef, AssetResolver, AssetSink, BehaviorGraph, Condition, ConditionMode, Control, ControlKind,
    Icon, MachineId, MenuId, MenuNode, MenuStore, Parameter, ParameterKind, ResolvedAsset, SavedAsset, StateId,
    TemplateId, Transition, TransitionSettings,
};
use emote_slots::{Hierarchy, NodeId, SELECTOR_PARAMETER};
use indexmap::IndexMap;

pub const START: &str = "Prepare Standing";
pub const END: &str = "BlendOut Stand";
pub const SETTINGS_STATE: &str = "[ME] StartState Transition Settings";

/// Host action graph with ids of the interesting parts
#[derive(Debug, Clone)]
pub struct HostAction {
    pub graph: BehaviorGraph,
    pub root: MachineId,
    pub standing: MachineId,
    pub seated: MachineId,
    pub start: StateId,
    pub end: StateId,
    pub sit: StateId,
    /// Placeholder state per slot, index 0 is slot 1
    pub emotes: Vec<StateId>,
}

pub fn selector(value: f32) -> Condition {
    Condition::equals(SELECTOR_PARAMETER, value)
}

/// Action layer: `Action > Standing` holds start, end and one placeholder per
/// slot; `Action > Seated` holds a sit branch on the reserved range.
pub fn host_action_graph() -> HostAction {
    let mut graph = BehaviorGraph::new("Action Controller");
    graph.add_parameter(Parameter::new(SELECTOR_PARAMETER, ParameterKind::Int));
    graph.add_parameter(Parameter::new("Seated", ParameterKind::Bool));

    let root = graph.add_layer("Action", 1.0);
    let standing = graph.arena.add_child_machine(root, "Standing").unwrap();
    let start = graph.arena.add_state(standing, START).unwrap();
    let end = graph.arena.add_state(standing, END).unwrap();

    let mut emotes = Vec::new();
    for slot in 1..=8u8 {
        let emote = graph.arena.add_state(standing, format!("Emote {slot}")).unwrap();
        graph
            .arena
            .add_transition(start, Transition::to(emote).with_condition(selector(f32::from(slot))))
            .unwrap();
        graph
            .arena
            .add_transition(
                emote,
                Transition::to(end).with_condition(Condition::new(
                    SELECTOR_PARAMETER,
                    ConditionMode::NotEqual,
                    f32::from(slot),
                )),
            )
            .unwrap();
        emotes.push(emote);
    }

    let seated = graph.arena.add_child_machine(root, "Seated").unwrap();
    let sit = graph.arena.add_state(seated, "Prepare Sit").unwrap();
    let sit_out = graph.arena.add_state(seated, "BlendOut Sit").unwrap();
    graph
        .arena
        .add_transition(sit, Transition::to(sit_out).with_condition(selector(9.0)))
        .unwrap();

    HostAction {
        graph,
        root,
        standing,
        seated,
        start,
        end,
        sit,
        emotes,
    }
}

/// Host effect graph with a single base layer
pub fn host_effect_graph() -> BehaviorGraph {
    let mut graph = BehaviorGraph::new("FX Controller");
    graph.add_parameter(Parameter::new("Blink", ParameterKind::Bool));
    let root = graph.add_layer("Base", 1.0);
    graph.arena.add_state(root, "Idle").unwrap();
    graph
}

/// Action template authored against `authored` as its slot value
///
/// States `"{name} Start"` (default) and `"{name} Loop"`; the loop exits when
/// the selector leaves the authored value.
pub fn action_template(name: &str, authored: f32) -> BehaviorGraph {
    let mut graph = BehaviorGraph::new(name);
    graph.add_parameter(Parameter::new(SELECTOR_PARAMETER, ParameterKind::Int));
    graph.add_parameter(Parameter::new(format!("{name}Speed"), ParameterKind::Float));

    let root = graph.add_layer("Base Layer", 1.0);
    let first = graph.arena.add_state(root, format!("{name} Start")).unwrap();
    let loop_state = graph.arena.add_state(root, format!("{name} Loop")).unwrap();
    graph
        .arena
        .add_transition(first, Transition::to(loop_state).with_condition(selector(authored)))
        .unwrap();
    graph
        .arena
        .add_transition(
            loop_state,
            Transition::default().with_condition(Condition::new(SELECTOR_PARAMETER, ConditionMode::NotEqual, authored)),
        )
        .unwrap();
    graph
}

/// [`action_template`] with a settings-marker state placed first
pub fn action_template_with_settings(name: &str, authored: f32, settings: TransitionSettings) -> BehaviorGraph {
    let mut graph = BehaviorGraph::new(name);
    graph.add_parameter(Parameter::new(SELECTOR_PARAMETER, ParameterKind::Int));

    let root = graph.add_layer("Base Layer", 1.0);
    let marker = graph.arena.add_state(root, SETTINGS_STATE).unwrap();
    graph.arena.state_mut(marker).unwrap().settings = Some(settings);
    let first = graph.arena.add_state(root, format!("{name} Start")).unwrap();
    let loop_state = graph.arena.add_state(root, format!("{name} Loop")).unwrap();
    graph
        .arena
        .add_transition(first, Transition::to(loop_state).with_condition(selector(authored)))
        .unwrap();
    graph
}

/// Effect template with a half-weight layer reading the selector
pub fn effect_template(name: &str, authored: f32) -> BehaviorGraph {
    let mut graph = BehaviorGraph::new(name);
    graph.add_parameter(Parameter::new(SELECTOR_PARAMETER, ParameterKind::Int));
    graph.add_parameter(Parameter::new(format!("{name}Amount"), ParameterKind::Float));

    let root = graph.add_layer(format!("{name} Layer"), 0.5);
    let off = graph.arena.add_state(root, "Off").unwrap();
    let on = graph.arena.add_state(root, "On").unwrap();
    graph
        .arena
        .add_transition(off, Transition::to(on).with_condition(selector(authored)))
        .unwrap();
    graph
        .arena
        .add_transition(
            on,
            Transition::to(off).with_condition(Condition::new(SELECTOR_PARAMETER, ConditionMode::NotEqual, authored)),
        )
        .unwrap();
    graph
}

/// Menu node with one selector-bound button per value
pub fn emote_menu(values: &[u8]) -> MenuNode {
    let mut node = MenuNode::new("Emotes");
    for v in values {
        node.controls.push(Control::bound(
            format!("Emote {v}"),
            ControlKind::Button,
            SELECTOR_PARAMETER,
            f32::from(*v),
        ));
    }
    node
}

/// Menu tree `Root > [Emotes, Settings]`
#[derive(Debug, Clone)]
pub struct MenuFixture {
    pub store: MenuStore,
    pub root: MenuId,
    pub emotes: MenuId,
    pub settings: MenuId,
}

pub fn menu_tree(values: &[u8]) -> MenuFixture {
    let mut store = MenuStore::new();
    let emotes = store.push(emote_menu(values));
    let mut settings = MenuNode::new("Settings");
    settings
        .controls
        .push(Control::bound("Mute", ControlKind::Toggle, "Mute", 1.0));
    let settings = store.push(settings);

    let mut root = MenuNode::new("Root");
    root.controls.push(Control::submenu("Emotes", emotes));
    root.controls.push(Control::submenu("Settings", settings));
    let root = store.push(root);

    MenuFixture {
        store,
        root,
        emotes,
        settings,
    }
}

/// Avatar hierarchy with one child node per name under the root
pub fn hierarchy(names: &[&str]) -> (Hierarchy, Vec<NodeId>) {
    let mut tree = Hierarchy::new("Avatar");
    let root = tree.root().unwrap();
    let nodes = names.iter().map(|n| tree.add_child(root, *n).unwrap()).collect();
    (tree, nodes)
}

/// In-memory resolver keyed by guid
#[derive(Debug, Default)]
pub struct TestAssets {
    graphs: IndexMap<String, (TemplateId, BehaviorGraph)>,
    menus: IndexMap<String, MenuId>,
    icons: IndexMap<String, Icon>,
}

impl TestAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_graph(&mut self, guid: &str, graph: BehaviorGraph) -> AssetRef {
        let reference = AssetRef::new(guid).with_name_hint(graph.name.clone());
        self.graphs
            .insert(guid.to_string(), (TemplateId::from(&reference), graph));
        reference
    }

    pub fn add_menu(&mut self, guid: &str, menu: MenuId) -> AssetRef {
        self.menus.insert(guid.to_string(), menu);
        AssetRef::new(guid)
    }

    pub fn add_icon(&mut self, guid: &str, icon: Icon) -> AssetRef {
        self.icons.insert(guid.to_string(), icon);
        AssetRef::new(guid)
    }

    pub fn graph(&self, guid: &str) -> Option<&BehaviorGraph> {
        self.graphs.get(guid).map(|(_, g)| g)
    }
}

impl AssetResolver for TestAssets {
    fn resolve(&self, reference: &AssetRef, expected: AssetKind) -> Option<ResolvedAsset<'_>> {
        if !reference.is_set() {
            return None;
        }
        match expected {
            AssetKind::Graph => self
                .graphs
                .get(&reference.guid)
                .map(|(id, graph)| ResolvedAsset::Graph { id, graph }),
            AssetKind::Menu => self.menus.get(&reference.guid).copied().map(ResolvedAsset::Menu),
            AssetKind::Icon => self.icons.get(&reference.guid).map(ResolvedAsset::Icon),
        }
    }
}

/// Sink that records what it was asked to persist
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub graphs: Vec<String>,
    pub menus: Vec<MenuId>,
}

impl AssetSink for RecordingSink {
    fn save(&mut self, asset: SavedAsset<'_>) {
        match asset {
            SavedAsset::Graph(graph) => self.graphs.push(graph.name.clone()),
            SavedAsset::Menu { id, .. } => self.menus.push(id),
        }
    }
}

/// State by name anywhere in the graph
pub fn state_named(graph: &BehaviorGraph, name: &str) -> Option<StateId> {
    graph.layers.iter().find_map(|layer| {
        graph
            .arena
            .states_under(layer.root)
            .ok()?
            .into_iter()
            .find(|id| graph.arena.state(*id).is_some_and(|s| s.name == name))
    })
}

/// Machine by name anywhere in the graph
pub fn machine_named(graph: &BehaviorGraph, name: &str) -> Option<MachineId> {
    graph.layers.iter().find_map(|layer| {
        graph
            .arena
            .descendants(layer.root)
            .ok()?
            .into_iter()
            .find(|id| graph.arena.machine(*id).is_some_and(|m| m.name == name))
    })
}
