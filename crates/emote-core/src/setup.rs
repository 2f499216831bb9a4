//! Setup assistant
//!
//! Guesses the fields a new slot template needs from the avatar as it is:
//! which states open and close the emote branches, which machine scopes
//! them, and where the emote menu lives.
//!
//! Guessing works on selector traffic. A state that fans out on
//! `selector == 1..=8` is a start candidate; a state many selector-guarded
//! transitions lead into is an end candidate. Sitting emotes use the
//! reserved range and sit-like state names, so both are left out.

use crate::config::BuildConfig;
use crate::descriptor::{AvatarDescriptor, LayerKind};
use crate::error::BuildError;
use emote_merge::auto_detect;
use emote_model::{BehaviorGraph, ConditionMode, MenuId, MenuStore, ModelError, StateId, Transition};
use emote_slots::{SelectorValue, SlotTemplate, SELECTOR_PARAMETER};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Guessed start and end state names
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StartEndGuess {
    /// State with the most standing-slot transitions out
    pub start: Option<String>,
    /// State with the most selector-guarded transitions in
    pub end: Option<String>,
}

/// Suggested fields for a new slot template
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetupSuggestion {
    /// Start state
    pub start_state: Option<String>,
    /// End state
    pub end_state: Option<String>,
    /// Merge scope, `None` when the whole layer is fine
    pub merge_scope: Option<String>,
    /// Detected emote menu
    pub target_menu: Option<MenuId>,
    /// Control-index path from the menu root to `target_menu`
    pub target_path: Option<Vec<usize>>,
}

impl SetupSuggestion {
    /// Copy every found field onto `template`
    pub fn apply_to(&self, template: &mut SlotTemplate) {
        if let Some(start) = &self.start_state {
            template.start_state.clone_from(start);
        }
        if let Some(end) = &self.end_state {
            template.end_state.clone_from(end);
        }
        template.merge_scope.clone_from(&self.merge_scope);
        if let Some(path) = &self.target_path {
            template.target_menu.path.clone_from(path);
        }
    }
}

#[derive(Debug, Default)]
struct Traffic {
    outgoing: usize,
    incoming: usize,
}

fn is_sit_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    [" sit", "sit ", "_sit", "sit_"].iter().any(|p| lower.contains(p))
}

/// Selector shape of a transition: `None` when it carries no selector
/// condition or targets the reserved range, else whether it names a
/// standing slot
fn selector_shape(transition: &Transition) -> Option<bool> {
    let mut standing = false;
    let mut any = false;
    for condition in transition.conditions_on(SELECTOR_PARAMETER) {
        any = true;
        if condition.mode != ConditionMode::Equals {
            continue;
        }
        match SelectorValue::classify(condition.rounded_threshold()) {
            SelectorValue::Standing(_) => standing = true,
            SelectorValue::Reserved(_) => return None,
            SelectorValue::Idle => {}
        }
    }
    any.then_some(standing)
}

fn count(
    graph: &BehaviorGraph,
    traffic: &mut IndexMap<StateId, Traffic>,
    from: Option<StateId>,
    transition: &Transition,
) -> Result<(), ModelError> {
    let Some(standing) = selector_shape(transition) else {
        return Ok(());
    };
    if let Some(from) = from {
        if standing && !is_sit_like(&graph.arena.try_state(from)?.name) {
            traffic.entry(from).or_default().outgoing += 1;
        }
    }
    if let Some(dest) = transition.destination {
        if !is_sit_like(&graph.arena.try_state(dest)?.name) {
            traffic.entry(dest).or_default().incoming += 1;
        }
    }
    Ok(())
}

/// Guess start and end states across every layer of `graph`
///
/// Ties keep the state encountered first.
///
/// # Errors
/// Returns error if the graph references ids outside its arena
pub fn detect_start_end(graph: &BehaviorGraph) -> Result<StartEndGuess, ModelError> {
    let mut traffic: IndexMap<StateId, Traffic> = IndexMap::new();
    for layer in &graph.layers {
        for machine_id in graph.arena.descendants(layer.root)? {
            let machine = graph.arena.try_machine(machine_id)?;
            for state_id in machine.state_ids() {
                traffic.entry(state_id).or_default();
                for transition in &graph.arena.try_state(state_id)?.transitions {
                    count(graph, &mut traffic, Some(state_id), transition)?;
                }
            }
            for transition in &machine.any_state_transitions {
                count(graph, &mut traffic, None, transition)?;
            }
        }
    }

    let mut best_start: Option<(StateId, usize)> = None;
    let mut best_end: Option<(StateId, usize)> = None;
    for (id, t) in &traffic {
        if is_sit_like(&graph.arena.try_state(*id)?.name) {
            continue;
        }
        if t.outgoing > best_start.map_or(0, |(_, n)| n) {
            best_start = Some((*id, t.outgoing));
        }
        if t.incoming > best_end.map_or(0, |(_, n)| n) {
            best_end = Some((*id, t.incoming));
        }
    }

    let name = |best: Option<(StateId, usize)>| -> Result<Option<String>, ModelError> {
        best.map(|(id, _)| graph.arena.try_state(id).map(|s| s.name.clone()))
            .transpose()
    };
    let guess = StartEndGuess {
        start: name(best_start)?,
        end: name(best_end)?,
    };
    debug!(start = ?guess.start, end = ?guess.end, "start and end detected");
    Ok(guess)
}

/// First machine, in pre-order over all layers, that directly holds both
/// states and has standing-slot traffic somewhere below it
///
/// # Errors
/// Returns error if the graph references ids outside its arena
pub fn detect_merge_scope(graph: &BehaviorGraph, start: &str, end: &str) -> Result<Option<String>, ModelError> {
    for layer in &graph.layers {
        for machine_id in graph.arena.descendants(layer.root)? {
            let machine = graph.arena.try_machine(machine_id)?;
            let mut has_start = false;
            let mut has_end = false;
            for state_id in machine.state_ids() {
                let name = graph.arena.try_state(state_id)?.name.as_str();
                has_start |= name == start;
                has_end |= name == end;
            }
            if !(has_start && has_end) {
                continue;
            }
            let routed = graph
                .arena
                .transitions_under(machine_id)?
                .into_iter()
                .any(|t| selector_shape(t) == Some(true));
            if routed {
                return Ok(Some(machine.name.clone()));
            }
        }
    }
    Ok(None)
}

/// Control-index path from `root` to `target`, breadth-first
///
/// `Some(vec![])` when `target` is the root itself.
#[must_use]
pub fn menu_path_to(store: &MenuStore, root: MenuId, target: MenuId) -> Option<Vec<usize>> {
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([(root, Vec::new())]);
    while let Some((id, path)) = queue.pop_front() {
        if id == target {
            return Some(path);
        }
        let Some(node) = store.get(id) else { continue };
        for (index, control) in node.controls.iter().enumerate() {
            if let Some(child) = control.submenu {
                if seen.insert(child) {
                    let mut next = path.clone();
                    next.push(index);
                    queue.push_back((child, next));
                }
            }
        }
    }
    None
}

/// Suggest template fields for the avatar described by `descriptor`
///
/// # Errors
/// Returns error if the action graph references ids outside its arena
pub fn suggest_setup(
    descriptor: &AvatarDescriptor,
    menus: &MenuStore,
    config: &BuildConfig,
) -> Result<SetupSuggestion, BuildError> {
    let mut suggestion = SetupSuggestion::default();
    let action_is_default = descriptor.layer(LayerKind::Action).is_some_and(|l| l.is_default);

    if action_is_default {
        suggestion.start_state = Some(config.default_start_state.clone());
        suggestion.end_state = Some(config.default_end_state.clone());
    } else if let Some(graph) = descriptor.graph(LayerKind::Action) {
        let guess = detect_start_end(graph)?;
        suggestion.start_state = guess.start;
        suggestion.end_state = guess.end;
        if let (Some(start), Some(end)) = (&suggestion.start_state, &suggestion.end_state) {
            suggestion.merge_scope =
                detect_merge_scope(graph, start, end)?.filter(|scope| *scope != config.default_action_scope);
        }
    }

    if let Some(root) = descriptor.menu_root {
        suggestion.target_menu = auto_detect(menus, root, config.menu_auto_detect_min_controls);
        suggestion.target_path = suggestion.target_menu.and_then(|target| menu_path_to(menus, root, target));
    }
    debug!(
        start = ?suggestion.start_state,
        end = ?suggestion.end_state,
        scope = ?suggestion.merge_scope,
        menu = ?suggestion.target_menu,
        "setup suggested"
    );
    Ok(suggestion)
}
