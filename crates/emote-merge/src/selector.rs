//! Selector-parameter rewriting
//!
//! Templates are authored against a placeholder slot value. After cloning,
//! every numeric selector comparison in the clone is pinned to the winning
//! slot, which detaches the clone from whatever value it was authored with.

use emote_model::{Condition, ConditionMode, GraphArena, MachineId, ModelError, Transition};
use emote_slots::{Slot, RESERVED_MIN, SELECTOR_PARAMETER};

/// `selector == slot`
#[inline]
#[must_use]
pub fn slot_condition(slot: Slot) -> Condition {
    Condition::equals(SELECTOR_PARAMETER, slot.as_threshold())
}

/// Whether a transition is the standing entry for `slot`
///
/// True when some condition reads `selector == slot` and no condition reads
/// `selector == v` with `v` in the reserved range.
#[must_use]
pub fn is_slot_transition(transition: &Transition, slot: Slot) -> bool {
    let mut matches_slot = false;
    for condition in transition.conditions_on(SELECTOR_PARAMETER) {
        if condition.mode != ConditionMode::Equals {
            continue;
        }
        let value = condition.rounded_threshold();
        if value >= RESERVED_MIN {
            return false;
        }
        if value == i32::from(slot.get()) {
            matches_slot = true;
        }
    }
    matches_slot
}

/// Pin numeric selector thresholds in one transition to `slot`
///
/// Returns the number of conditions changed.
pub fn pin_transition(transition: &mut Transition, slot: Slot) -> usize {
    let target = slot.as_threshold();
    let mut changed = 0;
    for condition in &mut transition.conditions {
        if condition.parameter == SELECTOR_PARAMETER
            && condition.mode.is_numeric()
            && (condition.threshold - target).abs() > f32::EPSILON
        {
            condition.threshold = target;
            changed += 1;
        }
    }
    changed
}

/// Pin every numeric selector threshold under `root` to `slot`
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn rewrite_thresholds(arena: &mut GraphArena, root: MachineId, slot: Slot) -> Result<usize, ModelError> {
    let mut changed = 0;
    arena.for_each_transition_mut(root, |t| changed += pin_transition(t, slot))?;
    Ok(changed)
}

/// Set the write-defaults flag of every state under `root`
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn force_write_defaults(arena: &mut GraphArena, root: MachineId, value: bool) -> Result<usize, ModelError> {
    let states = arena.states_under(root)?;
    for id in &states {
        arena.try_state_mut(*id)?.write_defaults = value;
    }
    Ok(states.len())
}
