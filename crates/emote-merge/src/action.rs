//! Action branch merge
//!
//! Embeds a winner's action template as a child state machine next to the
//! host's start and end states, then rewires the start state's slot
//! transition into the template and the template's exit back to the end
//! state.
//!
//! Every lookup that can fail runs in [`ActionMerge::plan`] before the host
//! is touched, so a skipped slot leaves the host graph exactly as it was.

use crate::clone_cache::{CloneCache, CloneKey};
use crate::error::{MergeError, TemplateRole};
use crate::options::MergeOptions;
use crate::params::{merge_parameters, SelectorPolicy};
use crate::search::{common_parent, find_scope, find_state, template_entry_state};
use crate::selector::{force_write_defaults, is_slot_transition, rewrite_thresholds, slot_condition};
use emote_model::{
    AssetResolver, AuxCondition, BehaviorGraph, ChildMachine, MachineId, ModelError, StateId, TemplateId,
    Transition, TransitionSettings,
};
use emote_slots::{Slot, SlotTemplate, SELECTOR_PARAMETER};
use tracing::{debug, info, warn};

/// How the start state's slot transition was updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTransitionEdit {
    /// Replaced by one transition built from the template's settings payload
    Rebuilt {
        /// Previous slot transitions removed
        removed: usize,
    },
    /// Existing slot transitions now point at the template entry
    Redirected {
        /// Transitions redirected
        count: usize,
    },
}

/// Result of merging one action template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Template embedded into the host
    Merged {
        /// New child machine in the host
        machine: MachineId,
        /// Machine the child was attached to
        parent: MachineId,
        /// Host id of the template's entry state
        entry: StateId,
        /// Start-state rewiring
        edit: SlotTransitionEdit,
    },
    /// Clone for this key was already embedded earlier in the build
    AlreadyMerged,
}

/// Everything the merge needs, gathered before any mutation
struct ActionPlan<'r> {
    parent: MachineId,
    start: StateId,
    end: StateId,
    template_id: TemplateId,
    template: &'r BehaviorGraph,
    template_root: MachineId,
    entry: StateId,
    settings: Option<TransitionSettings>,
}

/// Action merge engine
#[derive(Debug, Clone, Copy)]
pub struct ActionMerge<'o> {
    options: &'o MergeOptions,
}

impl<'o> ActionMerge<'o> {
    /// Create engine
    #[inline]
    #[must_use]
    pub fn new(options: &'o MergeOptions) -> Self {
        Self { options }
    }

    /// Merge `winner`'s action template into `host`
    ///
    /// # Errors
    /// Returns the reason the slot was skipped; `host` is unchanged then
    pub fn merge(
        &self,
        host: &mut BehaviorGraph,
        winner: &SlotTemplate,
        resolver: &dyn AssetResolver,
        clones: &mut CloneCache,
    ) -> Result<ActionOutcome, MergeError> {
        let slot = winner.slot();
        let plan = self.plan(host, winner, resolver)?;
        let model = |e: ModelError| MergeError::model(slot, e);

        merge_parameters(
            &mut host.parameters,
            &plan.template.parameters,
            SelectorPolicy::Skip,
        );

        let key = CloneKey::action(plan.template_id.clone(), slot);
        let cloned = clones.clone_distinct(key, plan.template);
        if cloned.reused {
            debug!(slot = %slot, "action clone already merged");
            return Ok(ActionOutcome::AlreadyMerged);
        }
        let clone = cloned.graph;

        if winner.write_defaults_off {
            force_write_defaults(&mut clone.arena, plan.template_root, false).map_err(model)?;
        }
        let pinned = rewrite_thresholds(&mut clone.arena, plan.template_root, slot).map_err(model)?;
        debug!(slot = %slot, pinned, "pinned selector thresholds");

        let remap = host.arena.graft(&clone.arena, plan.template_root).map_err(model)?;
        let machine = remap.root().ok_or(MergeError::MissingEntryState { slot })?;
        let entry = remap
            .state(plan.entry)
            .ok_or(MergeError::MissingEntryState { slot })?;

        host.arena.try_machine_mut(machine).map_err(model)?.name = self.options.action_machine_name(slot);
        let parent = host.arena.try_machine_mut(plan.parent).map_err(model)?;
        let position = parent.parent_machine_position;
        parent.machines.push(ChildMachine { machine, position });

        let edit = match &plan.settings {
            Some(settings) => {
                let start = host.arena.try_state_mut(plan.start).map_err(model)?;
                let before = start.transitions.len();
                start.transitions.retain(|t| !is_slot_transition(t, slot));
                let removed = before - start.transitions.len();
                start.transitions.push(settings_transition(settings, entry, slot));
                SlotTransitionEdit::Rebuilt { removed }
            }
            None => {
                let start = host.arena.try_state_mut(plan.start).map_err(model)?;
                let mut count = 0;
                for t in start.transitions.iter_mut().filter(|t| is_slot_transition(t, slot)) {
                    t.destination = Some(entry);
                    count += 1;
                }
                if count == 0 {
                    warn!(slot = %slot, start = %winner.start_state, "start state has no transition for the slot");
                }
                SlotTransitionEdit::Redirected { count }
            }
        };

        host.arena
            .try_machine_mut(plan.parent)
            .map_err(model)?
            .machine_transitions
            .entry(machine)
            .or_default()
            .push(Transition::to(plan.end));

        info!(
            slot = %slot,
            machine = %self.options.action_machine_name(slot),
            states = remap.state_count(),
            "merged action template"
        );
        Ok(ActionOutcome::Merged {
            machine,
            parent: plan.parent,
            entry,
            edit,
        })
    }

    fn plan<'r>(
        &self,
        host: &BehaviorGraph,
        winner: &SlotTemplate,
        resolver: &'r dyn AssetResolver,
    ) -> Result<ActionPlan<'r>, MergeError> {
        let slot = winner.slot();
        let model = |e: ModelError| MergeError::model(slot, e);
        let arena = &host.arena;

        let root = host.first_root().ok_or(MergeError::MissingRootGraph { slot })?;

        let scope = match winner.scope() {
            Some(scope) => find_scope(arena, root, scope)
                .map_err(model)?
                .ok_or_else(|| MergeError::MissingScope {
                    slot,
                    scope: scope.to_string(),
                })?,
            None => root,
        };

        let start = find_state(arena, scope, &winner.start_state)
            .map_err(model)?
            .ok_or_else(|| MergeError::MissingState {
                slot,
                state: winner.start_state.clone(),
            })?;
        let end = find_state(arena, scope, &winner.end_state)
            .map_err(model)?
            .ok_or_else(|| MergeError::MissingState {
                slot,
                state: winner.end_state.clone(),
            })?;

        let parent = common_parent(arena, scope, start, end)
            .map_err(model)?
            .ok_or_else(|| MergeError::CrossScopeStates {
                slot,
                start: winner.start_state.clone(),
                end: winner.end_state.clone(),
            })?;

        let (template_id, template) = resolve_template(resolver, winner, slot)?;
        let template_root = template
            .first_root()
            .ok_or_else(|| MergeError::template(slot, TemplateRole::Action, "has no layer with a root state machine"))?;

        let marker = self.options.settings_state_name.as_str();
        let entry = template_entry_state(&template.arena, template_root, marker)
            .map_err(model)?
            .ok_or(MergeError::MissingEntryState { slot })?;

        let settings = find_settings(template, template_root, marker).map_err(model)?;

        Ok(ActionPlan {
            parent,
            start,
            end,
            template_id,
            template,
            template_root,
            entry,
            settings,
        })
    }
}

fn resolve_template<'r>(
    resolver: &'r dyn AssetResolver,
    winner: &SlotTemplate,
    slot: Slot,
) -> Result<(TemplateId, &'r BehaviorGraph), MergeError> {
    if !winner.action_template.is_set() {
        return Err(MergeError::template(slot, TemplateRole::Action, "is not set"));
    }
    resolver
        .resolve_graph(&winner.action_template)
        .map(|(id, graph)| (id.clone(), graph))
        .ok_or_else(|| {
            MergeError::template(
                slot,
                TemplateRole::Action,
                format!("'{}' does not resolve to a behavior graph", winner.action_template),
            )
        })
}

/// Settings payload on a direct state of the template root named `marker`
fn find_settings(
    template: &BehaviorGraph,
    root: MachineId,
    marker: &str,
) -> Result<Option<TransitionSettings>, ModelError> {
    for id in template.arena.try_machine(root)?.state_ids() {
        let state = template.arena.try_state(id)?;
        if state.name == marker {
            if let Some(settings) = &state.settings {
                return Ok(Some(settings.clone()));
            }
        }
    }
    Ok(None)
}

/// Slot entry transition described by a settings payload
#[must_use]
pub fn settings_transition(settings: &TransitionSettings, entry: StateId, slot: Slot) -> Transition {
    let mut conditions = vec![slot_condition(slot)];
    conditions.extend(
        settings
            .conditions
            .iter()
            .filter(|c| !c.parameter().is_empty() && c.parameter() != SELECTOR_PARAMETER)
            .map(AuxCondition::to_condition),
    );
    Transition {
        conditions,
        destination: Some(entry),
        exit_time: settings.effective_exit_time(),
        has_fixed_duration: settings.fixed_duration,
        duration: settings.duration,
        offset: settings.offset,
        interruption_source: settings.interruption_source,
        ordered_interruption: settings.ordered_interruption,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emote_model::{Comparison, ConditionMode, InterruptionSource};

    #[test]
    fn settings_transition_leads_with_slot_condition() {
        let settings = TransitionSettings {
            has_exit_time: true,
            exit_time: 0.5,
            duration: 0.25,
            interruption_source: InterruptionSource::Destination,
            conditions: vec![
                AuxCondition::Int {
                    parameter: SELECTOR_PARAMETER.into(),
                    comparison: Comparison::Equal,
                    value: 9,
                },
                AuxCondition::Bool {
                    parameter: String::new(),
                    value: true,
                },
                AuxCondition::Float {
                    parameter: "Blend".into(),
                    comparison: Comparison::Greater,
                    value: 0.5,
                },
            ],
            ..TransitionSettings::default()
        };

        let t = settings_transition(&settings, StateId::new(7), Slot::clamped(2));

        assert_eq!(t.destination, Some(StateId::new(7)));
        assert_eq!(t.exit_time, Some(0.5));
        assert_eq!(t.duration, 0.25);
        assert_eq!(t.interruption_source, InterruptionSource::Destination);
        assert_eq!(t.conditions.len(), 2);
        assert_eq!(t.conditions[0], slot_condition(Slot::clamped(2)));
        assert_eq!(t.conditions[1].parameter, "Blend");
        assert_eq!(t.conditions[1].mode, ConditionMode::Greater);
    }

    #[test]
    fn default_settings_timing() {
        let t = settings_transition(&TransitionSettings::default(), StateId::new(0), Slot::clamped(1));
        assert_eq!(t.exit_time, None);
        assert!(t.has_fixed_duration);
        assert_eq!(t.duration, 0.1);
        assert!(!t.ordered_interruption);
    }
}
