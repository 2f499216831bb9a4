//! Scoped lookups inside a behavior graph
//!
//! All searches are pre-order over the arena: a machine's direct states
//! before its sub-machines, sub-machines in declared order.

use emote_model::{GraphArena, MachineId, ModelError, ScopePath, StateId};

/// Find a machine by bare name or slash path below `root`
///
/// A bare name matches the first machine in pre-order, `root` included. A
/// path is matched one child per segment starting below `root`; a leading
/// segment naming `root` itself is accepted and skipped. Unparseable input
/// matches nothing.
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn find_scope(arena: &GraphArena, root: MachineId, scope: &str) -> Result<Option<MachineId>, ModelError> {
    let Ok(path) = scope.parse::<ScopePath>() else {
        return Ok(None);
    };
    if path.is_bare_name() {
        return find_machine_by_name(arena, root, path.segments()[0].as_str());
    }
    find_machine_by_path(arena, root, &path)
}

/// First machine named `name` in pre-order, `root` included
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn find_machine_by_name(
    arena: &GraphArena,
    root: MachineId,
    name: &str,
) -> Result<Option<MachineId>, ModelError> {
    for id in arena.descendants(root)? {
        if arena.try_machine(id)?.name == name {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

/// Machine reached by following `path` one child per segment
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn find_machine_by_path(
    arena: &GraphArena,
    root: MachineId,
    path: &ScopePath,
) -> Result<Option<MachineId>, ModelError> {
    let segments = path.segments();
    let root_name = arena.try_machine(root)?.name.as_str();
    if path.first() == Some(root_name) {
        if let Some(found) = walk_children(arena, root, &segments[1..])? {
            return Ok(Some(found));
        }
    }
    walk_children(arena, root, segments)
}

fn walk_children(arena: &GraphArena, start: MachineId, segments: &[String]) -> Result<Option<MachineId>, ModelError> {
    let mut current = start;
    for segment in segments {
        let machine = arena.try_machine(current)?;
        let mut next = None;
        for child in machine.machine_ids() {
            if arena.try_machine(child)?.name == *segment {
                next = Some(child);
                break;
            }
        }
        match next {
            Some(child) => current = child,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// First state named `name` anywhere under `root`
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn find_state(arena: &GraphArena, root: MachineId, name: &str) -> Result<Option<StateId>, ModelError> {
    if name.is_empty() {
        return Ok(None);
    }
    for id in arena.states_under(root)? {
        if arena.try_state(id)?.name == name {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

/// Machine under `root` whose direct states include `state`
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn parent_of_state(arena: &GraphArena, root: MachineId, state: StateId) -> Result<Option<MachineId>, ModelError> {
    for id in arena.descendants(root)? {
        if arena.try_machine(id)?.contains_state(state) {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

/// Shared immediate parent of two states, if they have one
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn common_parent(
    arena: &GraphArena,
    root: MachineId,
    a: StateId,
    b: StateId,
) -> Result<Option<MachineId>, ModelError> {
    let pa = parent_of_state(arena, root, a)?;
    let pb = parent_of_state(arena, root, b)?;
    Ok(match (pa, pb) {
        (Some(x), Some(y)) if x == y => Some(x),
        _ => None,
    })
}

/// State to enter when a merged template starts
///
/// The default state unless it is the settings marker, then the first
/// non-marker direct state, then the first non-marker state anywhere below.
///
/// # Errors
/// Returns error if a reachable id is outside the arena
pub fn template_entry_state(
    arena: &GraphArena,
    root: MachineId,
    marker: &str,
) -> Result<Option<StateId>, ModelError> {
    let machine = arena.try_machine(root)?;
    let is_usable = |id: StateId| -> Result<bool, ModelError> { Ok(arena.try_state(id)?.name != marker) };

    if let Some(default) = machine.default_state {
        if machine.contains_state(default) && is_usable(default)? {
            return Ok(Some(default));
        }
    }
    for id in machine.state_ids() {
        if is_usable(id)? {
            return Ok(Some(id));
        }
    }
    for id in arena.states_under(root)? {
        if is_usable(id)? {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
