//! Functional tests for slot winner resolution.
//!
//! Core guarantees exercised here:
//! - At most one template wins each slot, whatever the input order.
//! - The winner of a contested slot is the earliest template in depth-first
//!   hierarchy order, not the earliest in the input list.
//! - Inactive templates never claim a slot, even if they sort first.
//! - Winners preserve hierarchy order so later stages see a stable sequence.

use emote_slots::{Hierarchy, NodeId, Slot, SlotResolver, SlotTemplate};
use proptest::prelude::*;
use std::collections::HashSet;

/// Helper: a flat avatar with `count` sibling nodes under the root.
fn flat_avatar(count: usize) -> (Hierarchy, Vec<NodeId>) {
    let mut tree = Hierarchy::new("Avatar");
    let root = tree.root().expect("root");
    let nodes = (0..count)
        .map(|i| tree.add_child(root, format!("Emote{i}")).expect("add child"))
        .collect();
    (tree, nodes)
}

/// Tenet: two templates on slot 3 yield exactly one contributor.
///
/// The second template in hierarchy order must be absent from the winner
/// list, and its loss must be visible in the dropped list so the host can
/// surface it instead of losing it silently.
#[test]
fn duplicate_slot_three_keeps_first_in_hierarchy() {
    let (tree, nodes) = flat_avatar(2);
    let templates = vec![
        SlotTemplate::new(nodes[1], 3).with_name("Second"),
        SlotTemplate::new(nodes[0], 3).with_name("First"),
    ];

    let resolution = SlotResolver::new().resolve(&tree, &templates);

    assert_eq!(resolution.winners.len(), 1);
    assert_eq!(resolution.winners[0].display_name, "First");
    assert_eq!(resolution.dropped.len(), 1);
    assert_eq!(resolution.dropped[0].template.display_name, "Second");
    assert_eq!(resolution.dropped[0].slot, Slot::clamped(3));
}

/// Tenet: nesting decides order before sibling position.
///
/// A template on a parent object sorts before templates on its children,
/// which sort before templates on the parent's later siblings.
#[test]
fn nested_templates_sort_depth_first() {
    let mut tree = Hierarchy::new("Avatar");
    let root = tree.root().expect("root");
    let group = tree.add_child(root, "Group").expect("group");
    let inner = tree.add_child(group, "Inner").expect("inner");
    let after = tree.add_child(root, "After").expect("after");

    let templates = vec![
        SlotTemplate::new(after, 2).with_name("After"),
        SlotTemplate::new(inner, 2).with_name("Inner"),
        SlotTemplate::new(group, 2).with_name("Group"),
    ];
    let resolution = SlotResolver::new().resolve(&tree, &templates);

    assert_eq!(resolution.winners[0].display_name, "Group");
    let dropped: Vec<_> = resolution
        .dropped
        .iter()
        .map(|d| d.template.display_name.as_str())
        .collect();
    assert_eq!(dropped, vec!["Inner", "After"]);
}

proptest! {
    /// Tenet: slot uniqueness holds for any assignment of slots.
    #[test]
    fn winners_never_share_a_slot(slots in prop::collection::vec(-3i32..14, 0..24)) {
        let (tree, nodes) = flat_avatar(slots.len());
        let templates: Vec<_> = slots
            .iter()
            .zip(&nodes)
            .map(|(slot, node)| SlotTemplate::new(*node, *slot))
            .collect();

        let resolution = SlotResolver::new().resolve(&tree, &templates);

        let mut seen = HashSet::new();
        for winner in &resolution.winners {
            prop_assert!(seen.insert(winner.slot()));
        }
        prop_assert!(resolution.winners.len() <= 8);
        prop_assert_eq!(resolution.winners.len() + resolution.dropped.len(), templates.len());
    }

    /// Tenet: resolution is independent of input order.
    #[test]
    fn input_order_does_not_change_winners(
        slots in prop::collection::vec(1i32..=8, 1..16),
        rotate in 0usize..16,
    ) {
        let (tree, nodes) = flat_avatar(slots.len());
        let templates: Vec<_> = slots
            .iter()
            .zip(&nodes)
            .map(|(slot, node)| SlotTemplate::new(*node, *slot))
            .collect();
        let mut shuffled = templates.clone();
        shuffled.rotate_left(rotate % templates.len());

        let resolver = SlotResolver::new();
        let a: Vec<NodeId> = resolver.resolve(&tree, &templates).winners.iter().map(|t| t.node).collect();
        let b: Vec<NodeId> = resolver.resolve(&tree, &shuffled).winners.iter().map(|t| t.node).collect();
        prop_assert_eq!(a, b);
    }

    /// Tenet: every winner is live.
    #[test]
    fn inactive_nodes_never_win(active in prop::collection::vec(any::<bool>(), 1..12)) {
        let (mut tree, nodes) = flat_avatar(active.len());
        for (node, on) in nodes.iter().zip(&active) {
            tree.set_active(*node, *on).expect("known node");
        }
        let templates: Vec<_> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| SlotTemplate::new(*node, i32::try_from(i % 8).unwrap_or(0) + 1))
            .collect();

        let resolution = SlotResolver::new().resolve(&tree, &templates);
        for winner in &resolution.winners {
            prop_assert!(tree.is_active_in_hierarchy(winner.node));
        }
    }
}
