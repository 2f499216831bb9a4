//! Copy-on-write menu patching
//!
//! The menu tree reachable from the descriptor's root is cloned as a whole,
//! every shared node exactly once, and slot edits land on the clones only.
//! The caller swaps its root reference to [`MenuPatch::root`]; the original
//! nodes are never written.

use crate::error::MergeError;
use crate::options::MergeOptions;
use emote_model::{AssetResolver, AssetSink, Control, Icon, MenuId, MenuNode, MenuStore, SavedAsset};
use emote_slots::{Slot, SlotTemplate, SELECTOR_PARAMETER};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// One control edited by the patcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedControl {
    /// Winning slot
    pub slot: Slot,
    /// Cloned menu node holding the control
    pub menu: MenuId,
    /// Control index in that node
    pub control: usize,
}

/// Result of a menu patch
#[derive(Debug)]
pub struct MenuPatch {
    /// Root of the patched tree; the original root when nothing was patched
    pub root: MenuId,
    /// Nodes created for the patched tree, in clone order
    pub created: Vec<MenuId>,
    /// Controls edited, in application order
    pub applied: Vec<AppliedControl>,
    /// Menu targets that were skipped
    pub skipped: Vec<MergeError>,
}

impl MenuPatch {
    /// Whether the root reference changes
    #[inline]
    #[must_use]
    pub fn is_cloned(&self) -> bool {
        !self.created.is_empty()
    }
}

/// Winners grouped by the original menu node they patch
#[derive(Debug, Default)]
pub struct TargetGroups<'w> {
    /// Target node to winners, both in resolver order
    pub groups: IndexMap<MenuId, Vec<&'w SlotTemplate>>,
    /// Winners whose target could not be found
    pub skipped: Vec<MergeError>,
}

/// Index of the control that represents `slot` in a menu node
///
/// The selector-bound control whose value equals the slot, falling back to
/// the control at position `slot - 1`.
#[must_use]
pub fn find_control_index(node: &MenuNode, slot: Slot) -> Option<usize> {
    let wanted = i32::from(slot.get());
    node.controls
        .iter()
        .position(|c| c.is_bound_to(SELECTOR_PARAMETER) && c.rounded_value() == wanted)
        .or_else(|| (slot.index() < node.controls.len()).then_some(slot.index()))
}

/// Apply a winner's overrides to its control
///
/// Name, icon and kind are replaced when the winner sets them; value and
/// parameter are always pinned to the slot.
pub fn apply_winner(control: &mut Control, winner: &SlotTemplate) {
    if !winner.display_name.is_empty() {
        control.name.clone_from(&winner.display_name);
    }
    if let Some(icon) = &winner.icon {
        control.icon = Some(icon.clone());
    }
    if let Some(kind) = winner.control_kind.to_control_kind() {
        control.kind = kind;
    }
    control.value = winner.slot().as_threshold();
    control.parameter = Some(SELECTOR_PARAMETER.to_string());
}

/// Follow a cached child-index path from `root`
///
/// An empty path is not a locator.
#[must_use]
pub fn resolve_path(store: &MenuStore, root: MenuId, path: &[usize]) -> Option<MenuId> {
    if path.is_empty() {
        return None;
    }
    let mut current = root;
    for index in path {
        current = store.get(current)?.controls.get(*index)?.submenu?;
        store.get(current)?;
    }
    Some(current)
}

/// First node, breadth-first from `root`, that looks like an emote menu
///
/// A node qualifies with at least `min_controls` button or toggle controls
/// bound to the selector.
#[must_use]
pub fn auto_detect(store: &MenuStore, root: MenuId, min_controls: usize) -> Option<MenuId> {
    store.reachable(root).into_iter().find(|id| {
        store.get(*id).is_some_and(|node| {
            node.controls
                .iter()
                .filter(|c| c.kind.is_selectable() && c.is_bound_to(SELECTOR_PARAMETER))
                .count()
                >= min_controls
        })
    })
}

/// Target lookup state for one tree
struct Targets<'s> {
    store: &'s MenuStore,
    root: MenuId,
    reachable: HashSet<MenuId>,
    detected: Option<Option<MenuId>>,
    min_controls: usize,
}

impl<'s> Targets<'s> {
    fn new(store: &'s MenuStore, root: MenuId, min_controls: usize) -> Self {
        Self {
            store,
            root,
            reachable: store.reachable(root).into_iter().collect(),
            detected: None,
            min_controls,
        }
    }

    fn resolve(&mut self, winner: &SlotTemplate, resolver: &dyn AssetResolver) -> Option<MenuId> {
        let slot = winner.slot();
        let target = &winner.target_menu;

        if let Some(id) = resolve_path(self.store, self.root, &target.path) {
            debug!(slot = %slot, menu = %id, "menu target from cached path");
            return Some(id);
        }
        if target.asset.is_set() {
            match resolver.resolve_menu(&target.asset) {
                Some(id) if self.reachable.contains(&id) => {
                    debug!(slot = %slot, menu = %id, "menu target from reference");
                    return Some(id);
                }
                _ => debug!(slot = %slot, reference = %target.asset, "menu reference not in tree"),
            }
        }

        let (store, root, min) = (self.store, self.root, self.min_controls);
        let detected = *self.detected.get_or_insert_with(|| auto_detect(store, root, min));
        if let Some(id) = detected {
            debug!(slot = %slot, menu = %id, "menu target auto-detected");
        }
        detected
    }
}

/// Menu tree patcher
#[derive(Debug, Clone, Copy)]
pub struct MenuPatcher<'o> {
    options: &'o MergeOptions,
}

impl<'o> MenuPatcher<'o> {
    /// Create patcher
    #[inline]
    #[must_use]
    pub fn new(options: &'o MergeOptions) -> Self {
        Self { options }
    }

    /// Resolve one winner's target node in the tree under `root`
    #[must_use]
    pub fn resolve_target(
        &self,
        store: &MenuStore,
        root: MenuId,
        winner: &SlotTemplate,
        resolver: &dyn AssetResolver,
    ) -> Option<MenuId> {
        Targets::new(store, root, self.options.auto_detect_min_controls).resolve(winner, resolver)
    }

    /// Group `winners` by their resolved target
    ///
    /// # Errors
    /// Returns [`MergeError::MissingMenuTree`] when `root` is absent
    pub fn group_targets<'w>(
        &self,
        store: &MenuStore,
        root: Option<MenuId>,
        winners: &[&'w SlotTemplate],
        resolver: &dyn AssetResolver,
    ) -> Result<TargetGroups<'w>, MergeError> {
        let root = live_root(store, root)?;
        let mut targets = Targets::new(store, root, self.options.auto_detect_min_controls);
        let mut grouped = TargetGroups::default();
        for winner in winners {
            match targets.resolve(winner, resolver) {
                Some(id) => grouped.groups.entry(id).or_default().push(*winner),
                None => {
                    let slot = winner.slot();
                    warn!(slot = %slot, "no target menu for slot");
                    grouped.skipped.push(MergeError::MenuAutoDetectFailed { slot });
                }
            }
        }
        Ok(grouped)
    }

    /// Clone the tree under `root` and apply every winner's menu edits
    ///
    /// `default_icon` is called at most once, and only when some group
    /// requests icon replacement on a node with a parent.
    ///
    /// # Errors
    /// Returns [`MergeError::MissingMenuTree`] when `root` is absent
    pub fn patch(
        &self,
        store: &mut MenuStore,
        root: Option<MenuId>,
        winners: &[&SlotTemplate],
        resolver: &dyn AssetResolver,
        default_icon: &mut dyn FnMut() -> Option<Icon>,
        sink: &mut dyn AssetSink,
    ) -> Result<MenuPatch, MergeError> {
        let TargetGroups { groups, skipped } = self.group_targets(store, root, winners, resolver)?;
        let root = live_root(store, root)?;
        let mut patch = MenuPatch {
            root,
            created: Vec::new(),
            applied: Vec::new(),
            skipped,
        };
        if groups.is_empty() {
            debug!("no menu targets, tree left as is");
            return Ok(patch);
        }

        let (identity, parents) = clone_tree(store, root);
        patch.root = identity.get(&root).copied().unwrap_or(root);
        patch.created = identity.values().copied().collect();

        let mut icon: Option<Option<Icon>> = None;
        for (target, group) in &groups {
            let Some(menu) = identity.get(target).copied() else {
                continue;
            };
            for winner in group.iter().rev() {
                let slot = winner.slot();
                let Some(node) = store.get_mut(menu) else {
                    continue;
                };
                match find_control_index(node, slot) {
                    Some(index) => {
                        apply_winner(&mut node.controls[index], winner);
                        debug!(slot = %slot, menu = %menu, control = index, "patched menu control");
                        patch.applied.push(AppliedControl {
                            slot,
                            menu,
                            control: index,
                        });
                    }
                    None => {
                        warn!(slot = %slot, menu = %menu, "menu has no control for slot");
                        patch.skipped.push(MergeError::MenuControlNotFound { slot, menu });
                    }
                }
            }

            if !group.iter().any(|w| w.replace_menu_icon) {
                continue;
            }
            let Some(links) = parents.get(&menu) else {
                continue;
            };
            let Some(shared) = icon.get_or_insert_with(&mut *default_icon).clone() else {
                continue;
            };
            for &(parent, index) in links {
                if let Some(control) = store.get_mut(parent).and_then(|n| n.controls.get_mut(index)) {
                    control.icon = Some(shared.clone());
                }
            }
            debug!(menu = %menu, links = links.len(), "replaced menu icon");
        }

        for id in &patch.created {
            if let Some(node) = store.get(*id) {
                sink.save(SavedAsset::Menu { id: *id, node });
            }
        }

        info!(
            nodes = patch.created.len(),
            applied = patch.applied.len(),
            skipped = patch.skipped.len(),
            "patched menu tree"
        );
        Ok(patch)
    }
}

fn live_root(store: &MenuStore, root: Option<MenuId>) -> Result<MenuId, MergeError> {
    root.filter(|r| store.get(*r).is_some())
        .ok_or(MergeError::MissingMenuTree)
}

/// Original-to-clone ids, and per clone every clone parent control leading to it
type ClonedTree = (IndexMap<MenuId, MenuId>, IndexMap<MenuId, Vec<(MenuId, usize)>>);

fn clone_tree(store: &mut MenuStore, root: MenuId) -> ClonedTree {
    let reachable = store.reachable(root);
    let mut identity = IndexMap::with_capacity(reachable.len());
    for old in &reachable {
        if let Some(node) = store.get(*old).cloned() {
            identity.insert(*old, store.push(node));
        }
    }

    let mut parents: IndexMap<MenuId, Vec<(MenuId, usize)>> = IndexMap::new();
    for new in identity.values().copied() {
        let Some(node) = store.get_mut(new) else {
            continue;
        };
        for (index, control) in node.controls.iter_mut().enumerate() {
            let Some(child) = control.submenu.and_then(|old| identity.get(&old).copied()) else {
                continue;
            };
            control.submenu = Some(child);
            parents.entry(child).or_default().push((new, index));
        }
    }
    (identity, parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emote_model::{AssetKind, AssetRef, ControlKind, Fingerprint, ResolvedAsset};
    use emote_slots::{EmoteControlKind, MenuTarget, NodeId};
    use pretty_assertions::assert_eq;

    struct NoAssets;

    impl AssetResolver for NoAssets {
        fn resolve(&self, _: &AssetRef, _: AssetKind) -> Option<ResolvedAsset<'_>> {
            None
        }
    }

    #[derive(Default)]
    struct Saved(Vec<MenuId>);

    impl AssetSink for Saved {
        fn save(&mut self, asset: SavedAsset<'_>) {
            if let SavedAsset::Menu { id, .. } = asset {
                self.0.push(id);
            }
        }
    }

    fn emote_menu(values: &[i32]) -> MenuNode {
        let mut node = MenuNode::new("Emotes");
        for v in values {
            #[allow(clippy::cast_precision_loss)]
            node.controls.push(Control::bound(
                format!("Emote {v}"),
                ControlKind::Button,
                SELECTOR_PARAMETER,
                *v as f32,
            ));
        }
        node
    }

    fn tree() -> (MenuStore, MenuId, MenuId) {
        let mut store = MenuStore::new();
        let emotes = store.push(emote_menu(&[1, 2, 3, 4]));
        let mut root = MenuNode::new("Root");
        root.controls.push(Control::submenu("Emotes", emotes));
        let root = store.push(root);
        (store, root, emotes)
    }

    fn winner(slot: u8, name: &str) -> SlotTemplate {
        SlotTemplate::new(NodeId::new(u64::from(slot)), i32::from(slot)).with_name(name)
    }

    fn no_icon() -> Option<Icon> {
        None
    }

    #[test]
    fn control_lookup_prefers_value_then_position() {
        let node = emote_menu(&[4, 3, 2, 1]);
        assert_eq!(find_control_index(&node, Slot::clamped(1)), Some(3));

        let mut unbound = MenuNode::new("Plain");
        unbound.controls.push(Control::bound("A", ControlKind::Button, "Other", 1.0));
        unbound.controls.push(Control::bound("B", ControlKind::Button, "Other", 2.0));
        assert_eq!(find_control_index(&unbound, Slot::clamped(2)), Some(1));
        assert_eq!(find_control_index(&unbound, Slot::clamped(3)), None);
    }

    #[test]
    fn path_lookup_walks_submenus() {
        let (store, root, emotes) = tree();
        assert_eq!(resolve_path(&store, root, &[0]), Some(emotes));
        assert_eq!(resolve_path(&store, root, &[1]), None);
        assert_eq!(resolve_path(&store, root, &[0, 0]), None);
        assert_eq!(resolve_path(&store, root, &[]), None);
    }

    #[test]
    fn auto_detect_needs_enough_selector_controls() {
        let (store, root, emotes) = tree();
        assert_eq!(auto_detect(&store, root, 4), Some(emotes));
        assert_eq!(auto_detect(&store, root, 5), None);
    }

    #[test]
    fn patch_leaves_original_untouched() {
        let (mut store, root, emotes) = tree();
        let before = store.get(emotes).unwrap().fingerprint().unwrap();
        let template = winner(3, "Wave").with_control_kind(EmoteControlKind::Toggle);
        let mut sink = Saved::default();

        let patch = MenuPatcher::new(&MergeOptions::default())
            .patch(&mut store, Some(root), &[&template], &NoAssets, &mut no_icon, &mut sink)
            .unwrap();

        assert_ne!(patch.root, root);
        assert_eq!(patch.created.len(), 2);
        assert_eq!(sink.0, patch.created);
        assert_eq!(store.get(emotes).unwrap().fingerprint().unwrap(), before);

        let cloned = store.get(patch.applied[0].menu).unwrap();
        assert_eq!(cloned.controls[2].name, "Wave");
        assert_eq!(cloned.controls[2].kind, ControlKind::Toggle);
        assert_eq!(cloned.controls[0].name, "Emote 1");
    }

    #[test]
    fn earlier_winner_applied_last() {
        let (mut store, root, _) = tree();
        let mut first = winner(2, "First");
        first.target_menu = MenuTarget {
            path: vec![0],
            ..MenuTarget::default()
        };
        let mut second = winner(2, "Second");
        second.target_menu = first.target_menu.clone();

        let patch = MenuPatcher::new(&MergeOptions::default())
            .patch(&mut store, Some(root), &[&first, &second], &NoAssets, &mut no_icon, &mut Saved::default())
            .unwrap();

        let menu = patch.applied[0].menu;
        assert_eq!(store.get(menu).unwrap().controls[1].name, "First");
    }

    #[test]
    fn icon_goes_on_parent_control_once() {
        let (mut store, root, _) = tree();
        let a = winner(1, "A");
        let b = winner(2, "B");
        let mut calls = 0;
        let mut icon = || {
            calls += 1;
            Some(Icon::new("emote-icon"))
        };

        let patch = MenuPatcher::new(&MergeOptions::default())
            .patch(&mut store, Some(root), &[&a, &b], &NoAssets, &mut icon, &mut Saved::default())
            .unwrap();

        assert_eq!(calls, 1);
        let new_root = store.get(patch.root).unwrap();
        assert_eq!(new_root.controls[0].icon, Some(Icon::new("emote-icon")));
        assert_eq!(store.get(root).unwrap().controls[0].icon, None);
    }

    #[test]
    fn missing_tree_is_an_error() {
        let mut store = MenuStore::new();
        let err = MenuPatcher::new(&MergeOptions::default())
            .patch(&mut store, None, &[], &NoAssets, &mut no_icon, &mut Saved::default())
            .unwrap_err();
        assert!(matches!(err, MergeError::MissingMenuTree));
    }

    #[test]
    fn no_targets_keeps_root() {
        let mut store = MenuStore::new();
        let root = store.push(MenuNode::new("Root"));
        let w = winner(1, "A");
        let patch = MenuPatcher::new(&MergeOptions::default())
            .patch(&mut store, Some(root), &[&w], &NoAssets, &mut no_icon, &mut Saved::default())
            .unwrap();
        assert_eq!(patch.root, root);
        assert!(!patch.is_cloned());
        assert!(matches!(patch.skipped[0], MergeError::MenuAutoDetectFailed { .. }));
        assert_eq!(store.len(), 1);
    }
}
