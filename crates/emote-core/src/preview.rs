//! Menu preview
//!
//! Shows what the menu patcher would do to one node without touching the
//! store.

use crate::config::BuildConfig;
use crate::descriptor::Avatar;
use emote_merge::{apply_winner, find_control_index, MenuPatcher, MergeError};
use emote_model::{AssetResolver, ControlKind, MenuId, MenuStore};
use emote_slots::{NodeId, Slot, SlotResolver, SlotTemplate};
use serde::{Deserialize, Serialize};

/// One control before and after patching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPreview {
    /// Position in the node
    pub index: usize,
    /// Name now
    pub before_name: String,
    /// Kind now
    pub before_kind: ControlKind,
    /// Name after patching
    pub after_name: String,
    /// Kind after patching
    pub after_kind: ControlKind,
    /// Slot of the template that ends up owning the control
    pub slot: Option<Slot>,
    /// Node of that template
    pub owner: Option<NodeId>,
    /// Whether patching changes the control at all
    pub changed: bool,
}

/// Preview of one menu node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPreview {
    /// Previewed node
    pub menu: MenuId,
    /// Node name
    pub name: String,
    /// One entry per control
    pub controls: Vec<ControlPreview>,
    /// Winners with no control in the node
    pub unmatched: Vec<Slot>,
}

impl MenuPreview {
    /// Controls that change
    pub fn changed(&self) -> impl Iterator<Item = &ControlPreview> {
        self.controls.iter().filter(|c| c.changed)
    }
}

/// Preview `winners` applied to `menu`
///
/// Winners are applied in reverse order so the earliest one owns a
/// contested control, as in the patcher.
///
/// # Errors
/// Returns [`MergeError::MissingMenuTree`] if `menu` is not in `store`
pub fn preview_menu(store: &MenuStore, menu: MenuId, winners: &[&SlotTemplate]) -> Result<MenuPreview, MergeError> {
    let node = store.get(menu).ok_or(MergeError::MissingMenuTree)?;
    let mut patched = node.clone();
    let mut owners: Vec<Option<&SlotTemplate>> = vec![None; patched.controls.len()];
    let mut unmatched = Vec::new();

    for winner in winners.iter().rev() {
        let slot = winner.slot();
        match find_control_index(&patched, slot) {
            Some(index) => {
                apply_winner(&mut patched.controls[index], winner);
                owners[index] = Some(winner);
            }
            None => unmatched.push(slot),
        }
    }
    unmatched.reverse();

    let controls = node
        .controls
        .iter()
        .zip(&patched.controls)
        .zip(&owners)
        .enumerate()
        .map(|(index, ((before, after), owner))| ControlPreview {
            index,
            before_name: before.name.clone(),
            before_kind: before.kind,
            after_name: after.name.clone(),
            after_kind: after.kind,
            slot: owner.map(SlotTemplate::slot),
            owner: owner.map(|t| t.node),
            changed: before != after,
        })
        .collect();

    Ok(MenuPreview {
        menu,
        name: node.name.clone(),
        controls,
        unmatched,
    })
}

/// Preview the menu node the template on `node` would patch
///
/// Every winner resolving to the same node is included. `Ok(None)` when no
/// winning template sits on `node` or its target cannot be found.
///
/// # Errors
/// Returns [`MergeError::MissingMenuTree`] if the avatar has no menu
pub fn preview_for_node(
    avatar: &Avatar,
    resolver: &dyn AssetResolver,
    config: &BuildConfig,
    node: NodeId,
) -> Result<Option<MenuPreview>, MergeError> {
    let resolution = SlotResolver::new().resolve(&avatar.hierarchy, &avatar.templates);
    let Some(winner) = resolution.winners.iter().find(|w| w.node == node) else {
        return Ok(None);
    };
    let options = config.merge_options();
    let groups = MenuPatcher::new(&options).group_targets(
        &avatar.menus,
        avatar.descriptor.menu_root,
        &resolution.winners,
        resolver,
    )?;
    let Some((menu, group)) = groups
        .groups
        .iter()
        .find(|(_, group)| group.iter().any(|w| std::ptr::eq(*w, *winner)))
    else {
        return Ok(None);
    };
    preview_menu(&avatar.menus, *menu, group).map(Some)
}
