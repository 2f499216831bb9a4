//! Layered behavior graphs
//!
//! A [`BehaviorGraph`] owns an ordered list of layers, a parameter table and a
//! [`GraphArena`] holding every state machine and state of the graph. Nodes
//! refer to each other through arena-local ids ([`MachineId`], [`StateId`]),
//! so cloning a graph is a plain deep copy and moving a sub-machine from one
//! graph to another is an explicit [`GraphArena::graft`] with id remapping.
//!
//! Traversals are iterative and keep a visited set, so a malformed arena with
//! a machine listed under two parents (or under itself) is walked once per
//! machine and never overflows the stack.

use crate::error::ModelError;
use crate::hash::Fingerprint;
use crate::settings::TransitionSettings;
use crate::transition::Transition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// Index of a state machine inside a [`GraphArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(u32);

impl MachineId {
    /// Wrap a raw index
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena slot
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for MachineId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Index of a state inside a [`GraphArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u32);

impl StateId {
    /// Wrap a raw index
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena slot
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Layout hint for editors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal
    pub x: f32,
    /// Vertical
    pub y: f32,
}

impl Position {
    /// Create position
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Type of a graph parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Boolean
    Bool,
    /// Integer
    Int,
    /// Float
    Float,
    /// Self-resetting boolean
    Trigger,
}

/// Parameter declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name, unique within a graph
    pub name: String,
    /// Declared type
    pub kind: ParameterKind,
    /// Default value; bools and triggers use 0/1
    #[serde(default)]
    pub default_value: f32,
}

impl Parameter {
    /// Create a declaration with a zero default
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default_value: 0.0,
        }
    }
}

/// Animation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// State name
    pub name: String,
    /// Whether the state writes default values
    #[serde(default = "default_true")]
    pub write_defaults: bool,
    /// Outgoing transitions, in priority order
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Slot transition override carried by the settings-marker state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<TransitionSettings>,
}

fn default_true() -> bool {
    true
}

impl State {
    /// Create state with no transitions
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            write_defaults: true,
            transitions: Vec::new(),
            settings: None,
        }
    }
}

/// State placed in a machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChildState {
    /// Placed state
    pub state: StateId,
    /// Layout hint
    #[serde(default)]
    pub position: Position,
}

/// Sub-machine placed in a machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChildMachine {
    /// Placed machine
    pub machine: MachineId,
    /// Layout hint
    #[serde(default)]
    pub position: Position,
}

/// Hierarchical state machine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateMachine {
    /// Machine name
    pub name: String,
    /// Direct states, in declared order
    pub states: Vec<ChildState>,
    /// Direct sub-machines, in declared order
    pub machines: Vec<ChildMachine>,
    /// Transitions taken from any state
    pub any_state_transitions: Vec<Transition>,
    /// Transitions taken on entering the machine
    pub entry_transitions: Vec<Transition>,
    /// Transitions taken when a child machine exits, keyed by that child
    #[serde(with = "indexmap::map::serde_seq")]
    pub machine_transitions: IndexMap<MachineId, Vec<Transition>>,
    /// State entered by default
    pub default_state: Option<StateId>,
    /// Layout hint for the parent-machine node
    pub parent_machine_position: Position,
}

impl StateMachine {
    /// Create empty machine
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether `state` is a direct state of this machine
    #[inline]
    #[must_use]
    pub fn contains_state(&self, state: StateId) -> bool {
        self.states.iter().any(|c| c.state == state)
    }

    /// Direct state ids
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().map(|c| c.state)
    }

    /// Direct sub-machine ids
    pub fn machine_ids(&self) -> impl Iterator<Item = MachineId> + '_ {
        self.machines.iter().map(|c| c.machine)
    }
}

/// Storage for machines and states of one graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphArena {
    machines: Vec<StateMachine>,
    states: Vec<State>,
}

/// Old-to-new id mapping produced by [`GraphArena::graft`]
#[derive(Debug, Clone, Default)]
pub struct IdRemap {
    root: Option<MachineId>,
    machines: HashMap<MachineId, MachineId>,
    states: HashMap<StateId, StateId>,
}

impl IdRemap {
    /// New id of the grafted root
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<MachineId> {
        self.root
    }

    /// New id of a copied machine
    #[inline]
    #[must_use]
    pub fn machine(&self, old: MachineId) -> Option<MachineId> {
        self.machines.get(&old).copied()
    }

    /// New id of a copied state
    #[inline]
    #[must_use]
    pub fn state(&self, old: StateId) -> Option<StateId> {
        self.states.get(&old).copied()
    }

    /// Number of machines copied
    #[inline]
    #[must_use]
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Number of states copied
    #[inline]
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

impl GraphArena {
    /// Create empty arena
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine by id
    #[inline]
    #[must_use]
    pub fn machine(&self, id: MachineId) -> Option<&StateMachine> {
        self.machines.get(id.index())
    }

    /// Mutable machine by id
    #[inline]
    pub fn machine_mut(&mut self, id: MachineId) -> Option<&mut StateMachine> {
        self.machines.get_mut(id.index())
    }

    /// State by id
    #[inline]
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Mutable state by id
    #[inline]
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.get_mut(id.index())
    }

    /// Machine by id or error
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownMachine`] for an id outside the arena
    pub fn try_machine(&self, id: MachineId) -> Result<&StateMachine, ModelError> {
        self.machine(id).ok_or(ModelError::UnknownMachine(id))
    }

    /// Mutable machine by id or error
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownMachine`] for an id outside the arena
    pub fn try_machine_mut(&mut self, id: MachineId) -> Result<&mut StateMachine, ModelError> {
        self.machine_mut(id).ok_or(ModelError::UnknownMachine(id))
    }

    /// State by id or error
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownState`] for an id outside the arena
    pub fn try_state(&self, id: StateId) -> Result<&State, ModelError> {
        self.state(id).ok_or(ModelError::UnknownState(id))
    }

    /// Mutable state by id or error
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownState`] for an id outside the arena
    pub fn try_state_mut(&mut self, id: StateId) -> Result<&mut State, ModelError> {
        self.state_mut(id).ok_or(ModelError::UnknownState(id))
    }

    /// Number of machines
    #[inline]
    #[must_use]
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Number of states
    #[inline]
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Store a detached machine
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_machine(&mut self, machine: StateMachine) -> MachineId {
        let id = MachineId::new(self.machines.len() as u32);
        self.machines.push(machine);
        id
    }

    /// Store a detached state
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_state(&mut self, state: State) -> StateId {
        let id = StateId::new(self.states.len() as u32);
        self.states.push(state);
        id
    }

    /// Create a state and place it in `machine`
    ///
    /// The first state placed in a machine becomes its default state.
    ///
    /// # Errors
    /// Returns error if `machine` is unknown
    pub fn add_state(&mut self, machine: MachineId, name: impl Into<String>) -> Result<StateId, ModelError> {
        self.try_machine(machine)?;
        let id = self.push_state(State::new(name));
        let parent = self.try_machine_mut(machine)?;
        parent.states.push(ChildState {
            state: id,
            position: Position::default(),
        });
        if parent.default_state.is_none() {
            parent.default_state = Some(id);
        }
        Ok(id)
    }

    /// Create a sub-machine and place it in `parent`
    ///
    /// # Errors
    /// Returns error if `parent` is unknown
    pub fn add_child_machine(
        &mut self,
        parent: MachineId,
        name: impl Into<String>,
    ) -> Result<MachineId, ModelError> {
        self.try_machine(parent)?;
        let id = self.push_machine(StateMachine::new(name));
        self.try_machine_mut(parent)?.machines.push(ChildMachine {
            machine: id,
            position: Position::default(),
        });
        Ok(id)
    }

    /// Append an outgoing transition to `from`
    ///
    /// # Errors
    /// Returns error if `from` is unknown
    pub fn add_transition(&mut self, from: StateId, transition: Transition) -> Result<(), ModelError> {
        self.try_state_mut(from)?.transitions.push(transition);
        Ok(())
    }

    /// Machines reachable from `root`, pre-order, children in declared order
    ///
    /// # Errors
    /// Returns error if a reachable id is outside the arena
    pub fn descendants(&self, root: MachineId) -> Result<Vec<MachineId>, ModelError> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let machine = self.try_machine(id)?;
            order.push(id);
            stack.extend(machine.machine_ids().collect::<Vec<_>>().into_iter().rev());
        }

        Ok(order)
    }

    /// States placed anywhere under `root`, machine by machine in pre-order
    ///
    /// # Errors
    /// Returns error if a reachable id is outside the arena
    pub fn states_under(&self, root: MachineId) -> Result<Vec<StateId>, ModelError> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for machine in self.descendants(root)? {
            for state in self.try_machine(machine)?.state_ids() {
                self.try_state(state)?;
                if seen.insert(state) {
                    out.push(state);
                }
            }
        }
        Ok(out)
    }

    /// Apply `f` to every transition owned by the tree under `root`
    ///
    /// Covers state transitions, any-state, entry and machine-exit lists.
    ///
    /// # Errors
    /// Returns error if a reachable id is outside the arena
    pub fn for_each_transition_mut<F>(&mut self, root: MachineId, mut f: F) -> Result<(), ModelError>
    where
        F: FnMut(&mut Transition),
    {
        let machines = self.descendants(root)?;
        let states = self.states_under(root)?;

        for id in states {
            self.try_state_mut(id)?.transitions.iter_mut().for_each(&mut f);
        }
        for id in machines {
            let machine = self.try_machine_mut(id)?;
            machine.any_state_transitions.iter_mut().for_each(&mut f);
            machine.entry_transitions.iter_mut().for_each(&mut f);
            machine
                .machine_transitions
                .values_mut()
                .flat_map(|list| list.iter_mut())
                .for_each(&mut f);
        }
        Ok(())
    }

    /// Every transition owned by the tree under `root`
    ///
    /// # Errors
    /// Returns error if a reachable id is outside the arena
    pub fn transitions_under(&self, root: MachineId) -> Result<Vec<&Transition>, ModelError> {
        let mut out = Vec::new();
        for id in self.states_under(root)? {
            out.extend(self.try_state(id)?.transitions.iter());
        }
        for id in self.descendants(root)? {
            let machine = self.try_machine(id)?;
            out.extend(machine.any_state_transitions.iter());
            out.extend(machine.entry_transitions.iter());
            out.extend(machine.machine_transitions.values().flatten());
        }
        Ok(out)
    }

    /// Copy the tree under `root` from `source` into this arena
    ///
    /// The copy is detached: the caller places [`IdRemap::root`] under a
    /// parent or a layer. Destinations and default states that point outside
    /// the copied tree are cleared, since they have no counterpart here.
    ///
    /// # Errors
    /// Returns error if a reachable id is outside `source`
    pub fn graft(&mut self, source: &GraphArena, root: MachineId) -> Result<IdRemap, ModelError> {
        let machines = source.descendants(root)?;
        let states = source.states_under(root)?;

        let mut remap = IdRemap::default();
        for (offset, old) in machines.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let new = MachineId::new((self.machines.len() + offset) as u32);
            remap.machines.insert(*old, new);
        }
        for (offset, old) in states.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let new = StateId::new((self.states.len() + offset) as u32);
            remap.states.insert(*old, new);
        }

        for old in &states {
            let mut state = source.try_state(*old)?.clone();
            for t in &mut state.transitions {
                remap_transition(t, &remap);
            }
            self.states.push(state);
        }

        for old in &machines {
            let src = source.try_machine(*old)?;
            let mut copy = StateMachine {
                name: src.name.clone(),
                states: Vec::with_capacity(src.states.len()),
                machines: Vec::with_capacity(src.machines.len()),
                any_state_transitions: src.any_state_transitions.clone(),
                entry_transitions: src.entry_transitions.clone(),
                machine_transitions: IndexMap::new(),
                default_state: src.default_state.and_then(|s| remap.state(s)),
                parent_machine_position: src.parent_machine_position,
            };
            for child in &src.states {
                if let Some(state) = remap.state(child.state) {
                    copy.states.push(ChildState {
                        state,
                        position: child.position,
                    });
                }
            }
            for child in &src.machines {
                if let Some(machine) = remap.machine(child.machine) {
                    copy.machines.push(ChildMachine {
                        machine,
                        position: child.position,
                    });
                }
            }
            for (key, list) in &src.machine_transitions {
                if let Some(key) = remap.machine(*key) {
                    copy.machine_transitions.insert(key, list.clone());
                }
            }
            copy.any_state_transitions
                .iter_mut()
                .chain(copy.entry_transitions.iter_mut())
                .chain(copy.machine_transitions.values_mut().flatten())
                .for_each(|t| remap_transition(t, &remap));
            self.machines.push(copy);
        }

        remap.root = remap.machine(root);
        Ok(remap)
    }
}

fn remap_transition(transition: &mut Transition, remap: &IdRemap) {
    transition.destination = transition.destination.and_then(|s| remap.state(s));
}

/// One layer of a behavior graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Blend weight in `0.0..=1.0`
    #[serde(default = "full_weight")]
    pub weight: f32,
    /// Root machine
    pub root: MachineId,
}

fn full_weight() -> f32 {
    1.0
}

/// Layered behavior graph with a shared parameter table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorGraph {
    /// Graph name
    pub name: String,
    /// Layers, evaluated in order
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Parameter table keyed by name
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    /// Node storage
    #[serde(default)]
    pub arena: GraphArena,
}

impl BehaviorGraph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a layer with a fresh root machine
    pub fn add_layer(&mut self, name: impl Into<String>, weight: f32) -> MachineId {
        let name = name.into();
        let root = self.arena.push_machine(StateMachine::new(name.clone()));
        self.layers.push(Layer { name, weight, root });
        root
    }

    /// Declare a parameter, replacing any existing declaration
    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.insert(parameter.name.clone(), parameter);
    }

    /// First layer, if any
    #[inline]
    #[must_use]
    pub fn first_layer(&self) -> Option<&Layer> {
        self.layers.first()
    }

    /// Root machine of the first layer, if the layer and machine exist
    #[inline]
    #[must_use]
    pub fn first_root(&self) -> Option<MachineId> {
        self.first_layer()
            .map(|l| l.root)
            .filter(|root| self.arena.machine(*root).is_some())
    }

    /// Layer by name
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

impl Fingerprint for BehaviorGraph {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Condition;
    use pretty_assertions::assert_eq;

    fn sample() -> (BehaviorGraph, MachineId, MachineId, StateId, StateId) {
        let mut graph = BehaviorGraph::new("Action");
        let root = graph.add_layer("Action", 1.0);
        let sub = graph.arena.add_child_machine(root, "Emotes").unwrap();
        let a = graph.arena.add_state(sub, "Prepare").unwrap();
        let b = graph.arena.add_state(sub, "Blend Out").unwrap();
        graph
            .arena
            .add_transition(a, Transition::to(b).with_condition(Condition::equals("VRCEmote", 1.0)))
            .unwrap();
        (graph, root, sub, a, b)
    }

    #[test]
    fn first_state_becomes_default() {
        let (graph, _, sub, a, _) = sample();
        assert_eq!(graph.arena.machine(sub).unwrap().default_state, Some(a));
    }

    #[test]
    fn descendants_are_preorder() {
        let mut graph = BehaviorGraph::new("g");
        let root = graph.add_layer("L", 1.0);
        let a = graph.arena.add_child_machine(root, "A").unwrap();
        let a1 = graph.arena.add_child_machine(a, "A1").unwrap();
        let b = graph.arena.add_child_machine(root, "B").unwrap();
        assert_eq!(graph.arena.descendants(root).unwrap(), vec![root, a, a1, b]);
    }

    #[test]
    fn descendants_tolerate_cycles() {
        let mut graph = BehaviorGraph::new("g");
        let root = graph.add_layer("L", 1.0);
        let child = graph.arena.add_child_machine(root, "Loop").unwrap();
        graph.arena.machine_mut(child).unwrap().machines.push(ChildMachine {
            machine: root,
            position: Position::default(),
        });
        assert_eq!(graph.arena.descendants(root).unwrap(), vec![root, child]);
    }

    #[test]
    fn unknown_machine_is_error() {
        let graph = BehaviorGraph::new("g");
        assert!(matches!(
            graph.arena.descendants(MachineId::new(7)),
            Err(ModelError::UnknownMachine(_))
        ));
    }

    #[test]
    fn graft_remaps_ids() {
        let (template, _, sub, a, b) = sample();
        let mut host = BehaviorGraph::new("Host");
        let host_root = host.add_layer("Base", 1.0);
        host.arena.add_state(host_root, "Idle").unwrap();

        let remap = host.arena.graft(&template.arena, sub).unwrap();
        let new_sub = remap.root().unwrap();
        let new_a = remap.state(a).unwrap();
        let new_b = remap.state(b).unwrap();

        assert_ne!(new_sub, sub);
        assert_eq!(remap.machine_count(), 1);
        assert_eq!(remap.state_count(), 2);
        let machine = host.arena.machine(new_sub).unwrap();
        assert_eq!(machine.name, "Emotes");
        assert_eq!(machine.default_state, Some(new_a));
        let moved = host.arena.state(new_a).unwrap();
        assert_eq!(moved.transitions[0].destination, Some(new_b));
    }

    #[test]
    fn graft_clears_outside_destinations() {
        let mut template = BehaviorGraph::new("t");
        let root = template.add_layer("L", 1.0);
        let outside = template.arena.add_state(root, "Outside").unwrap();
        let sub = template.arena.add_child_machine(root, "Sub").unwrap();
        let inside = template.arena.add_state(sub, "Inside").unwrap();
        template.arena.add_transition(inside, Transition::to(outside)).unwrap();

        let mut host = BehaviorGraph::new("h");
        let remap = host.arena.graft(&template.arena, sub).unwrap();
        let copied = host.arena.state(remap.state(inside).unwrap()).unwrap();
        assert_eq!(copied.transitions[0].destination, None);
        assert!(remap.state(outside).is_none());
    }

    #[test]
    fn for_each_transition_visits_all_lists() {
        let (mut graph, root, sub, a, _) = sample();
        graph
            .arena
            .machine_mut(root)
            .unwrap()
            .any_state_transitions
            .push(Transition::to(a));
        graph
            .arena
            .machine_mut(root)
            .unwrap()
            .machine_transitions
            .insert(sub, vec![Transition::to(a)]);

        let mut count = 0;
        graph.arena.for_each_transition_mut(root, |_| count += 1).unwrap();
        assert_eq!(count, 3);
        assert_eq!(graph.arena.transitions_under(root).unwrap().len(), 3);
    }

    #[test]
    fn clone_is_independent() {
        let (graph, _, _, a, _) = sample();
        let mut copy = graph.clone();
        copy.arena.state_mut(a).unwrap().name = "Changed".into();
        assert_eq!(graph.arena.state(a).unwrap().name, "Prepare");
        assert_ne!(graph.fingerprint().unwrap(), copy.fingerprint().unwrap());
    }

    #[test]
    fn json_round_trip_keeps_machine_transitions() {
        let (mut graph, root, sub, a, _) = sample();
        graph
            .arena
            .machine_mut(root)
            .unwrap()
            .machine_transitions
            .insert(sub, vec![Transition::to(a)]);
        let json = serde_json::to_string(&graph).unwrap();
        let back: BehaviorGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn first_root_requires_machine() {
        let mut graph = BehaviorGraph::new("g");
        assert!(graph.first_root().is_none());
        graph.layers.push(Layer {
            name: "Dangling".into(),
            weight: 1.0,
            root: MachineId::new(3),
        });
        assert!(graph.first_root().is_none());
    }
}
