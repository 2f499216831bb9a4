//! Slot winner resolution
//!
//! Each slot has a single writer per build. Live templates are ordered by
//! hierarchy position and the first template to claim a slot owns it; later
//! claims on the same slot are dropped.

use crate::hierarchy::{Hierarchy, NodeId};
use crate::slot::{Slot, SLOT_COUNT};
use crate::template::SlotTemplate;
use tracing::debug;

/// Template that lost its slot to an earlier one
#[derive(Debug, Clone, Copy)]
pub struct DroppedTemplate<'a> {
    /// Losing record
    pub template: &'a SlotTemplate,
    /// Contested slot
    pub slot: Slot,
    /// Node of the record that owns the slot
    pub winner: NodeId,
}

/// Outcome of resolving slot claims
#[derive(Debug, Clone, Default)]
pub struct Resolution<'a> {
    /// Winning records in hierarchy order, at most one per slot
    pub winners: Vec<&'a SlotTemplate>,
    /// Duplicate claims, in hierarchy order
    pub dropped: Vec<DroppedTemplate<'a>>,
}

impl<'a> Resolution<'a> {
    /// Winner for a slot
    #[must_use]
    pub fn winner_for(&self, slot: Slot) -> Option<&'a SlotTemplate> {
        self.winners.iter().copied().find(|t| t.slot() == slot)
    }

    /// Whether nothing won
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}

/// Orders templates and assigns slot winners
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotResolver;

impl SlotResolver {
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Live templates in hierarchy order
    ///
    /// A template is live when its node exists and is active in the
    /// hierarchy. The sort is stable, so records sharing a node keep their
    /// input order.
    #[must_use]
    pub fn ordered<'a>(&self, hierarchy: &Hierarchy, templates: &'a [SlotTemplate]) -> Vec<&'a SlotTemplate> {
        let mut live: Vec<&SlotTemplate> = templates
            .iter()
            .filter(|t| hierarchy.is_active_in_hierarchy(t.node))
            .collect();
        live.sort_by(|a, b| hierarchy.compare(a.node, b.node));
        live
    }

    /// Resolve winners
    #[must_use]
    pub fn resolve<'a>(&self, hierarchy: &Hierarchy, templates: &'a [SlotTemplate]) -> Resolution<'a> {
        let mut claimed: [Option<NodeId>; SLOT_COUNT as usize] = [None; SLOT_COUNT as usize];
        let mut resolution = Resolution::default();

        for template in self.ordered(hierarchy, templates) {
            let slot = template.slot();
            match claimed[slot.index()] {
                Some(winner) => {
                    debug!(slot = %slot, node = %template.node, winner = %winner, "slot already claimed");
                    resolution.dropped.push(DroppedTemplate {
                        template,
                        slot,
                        winner,
                    });
                }
                None => {
                    claimed[slot.index()] = Some(template.node);
                    resolution.winners.push(template);
                }
            }
        }

        resolution
    }
}
