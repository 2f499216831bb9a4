//! Advisory lints over a slot resolution
//!
//! Lints never block a build. They point at authoring choices that merge
//! cleanly but are likely not what the author meant.

use emote_model::TemplateId;
use emote_slots::{Hierarchy, NodeId, Resolution, Slot};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Lint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LintKind {
    /// Two winners append the same primary effect template
    SharedEffectTemplate,
    /// Effect winner's menu name differs from its node name
    NameMismatch,
    /// Template lost its slot to an earlier one
    DuplicateSlot,
}

impl Display for LintKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SharedEffectTemplate => "shared_effect_template",
            Self::NameMismatch => "name_mismatch",
            Self::DuplicateSlot => "duplicate_slot",
        };
        f.write_str(name)
    }
}

/// One advisory finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lint {
    /// Category
    pub kind: LintKind,
    /// Slot concerned
    pub slot: Slot,
    /// Template node concerned
    pub node: NodeId,
    /// Human-readable message
    pub message: String,
}

/// Run every lint over `resolution`
#[must_use]
pub fn lint(hierarchy: &Hierarchy, resolution: &Resolution<'_>) -> Vec<Lint> {
    let mut lints = shared_effect_templates(resolution);
    lints.extend(name_mismatches(hierarchy, resolution));
    lints.extend(duplicate_slots(resolution));
    lints
}

/// Winners after the first that reuse a primary effect template
#[must_use]
pub fn shared_effect_templates(resolution: &Resolution<'_>) -> Vec<Lint> {
    let mut first: IndexMap<TemplateId, Slot> = IndexMap::new();
    let mut lints = Vec::new();
    for winner in &resolution.winners {
        if !winner.use_effect_template || !winner.effect_template.is_set() {
            continue;
        }
        let id = TemplateId::from(&winner.effect_template);
        match first.get(&id) {
            Some(owner) => lints.push(Lint {
                kind: LintKind::SharedEffectTemplate,
                slot: winner.slot(),
                node: winner.node,
                message: format!(
                    "effect template {id} is also used by slot {owner}; each slot gets its own layer"
                ),
            }),
            None => {
                first.insert(id, winner.slot());
            }
        }
    }
    lints
}

/// Effect winners whose display name differs from their node name
#[must_use]
pub fn name_mismatches(hierarchy: &Hierarchy, resolution: &Resolution<'_>) -> Vec<Lint> {
    resolution
        .winners
        .iter()
        .filter(|w| w.use_effect_template)
        .filter_map(|w| {
            let node_name = hierarchy.name(w.node)?;
            (node_name != w.display_name).then(|| Lint {
                kind: LintKind::NameMismatch,
                slot: w.slot(),
                node: w.node,
                message: format!("menu name '{}' differs from object name '{node_name}'", w.display_name),
            })
        })
        .collect()
}

/// Templates dropped by slot resolution
#[must_use]
pub fn duplicate_slots(resolution: &Resolution<'_>) -> Vec<Lint> {
    resolution
        .dropped
        .iter()
        .map(|d| Lint {
            kind: LintKind::DuplicateSlot,
            slot: d.slot,
            node: d.template.node,
            message: format!("slot {} already taken by {}; this template contributes nothing", d.slot, d.winner),
        })
        .collect()
}
