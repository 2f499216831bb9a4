//! Error types for the merge engines
//!
//! Every variant describes one skipped unit of work: a template's action
//! branch, one effect variant, or one menu target. None of them abort a
//! pass; the orchestrator records them and moves on.

use emote_model::{MenuId, ModelError};
use emote_slots::{NodeId, Slot};
use std::fmt::{self, Display, Formatter};

/// Which template reference a failure concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateRole {
    /// Action branch template
    Action,
    /// Primary effect layer template
    Effect,
    /// Additional effect template, numbered from 1
    AdditionalEffect(u8),
}

impl TemplateRole {
    /// Clone variant index for this role
    #[inline]
    #[must_use]
    pub fn variant(self) -> u8 {
        match self {
            Self::Action | Self::Effect => 0,
            Self::AdditionalEffect(n) => n,
        }
    }
}

impl Display for TemplateRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action => f.write_str("action template"),
            Self::Effect => f.write_str("effect template"),
            Self::AdditionalEffect(n) => write!(f, "additional effect template Ex{n}"),
        }
    }
}

/// Per-unit merge failure
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Host graph has no first layer or root machine
    #[error("slot {slot}: host graph has no root state machine")]
    MissingRootGraph {
        /// Affected slot
        slot: Slot,
    },

    /// Merge scope not found under the host root
    #[error("slot {slot}: merge scope '{scope}' not found")]
    MissingScope {
        /// Affected slot
        slot: Slot,
        /// Scope as authored
        scope: String,
    },

    /// Start or end state not found in scope
    #[error("slot {slot}: state '{state}' not found in scope")]
    MissingState {
        /// Affected slot
        slot: Slot,
        /// State name as authored
        state: String,
    },

    /// Start and end states have different parent machines
    #[error("slot {slot}: states '{start}' and '{end}' are not in the same state machine")]
    CrossScopeStates {
        /// Affected slot
        slot: Slot,
        /// Start state name
        start: String,
        /// End state name
        end: String,
    },

    /// Template reference unset, unresolvable, wrong kind, or without a usable layer
    #[error("slot {slot}: {role} {detail}")]
    MissingOrWrongTypeTemplate {
        /// Affected slot
        slot: Slot,
        /// Which reference
        role: TemplateRole,
        /// What was wrong
        detail: String,
    },

    /// Additional templates enabled but nothing to merge
    #[error("slot {slot}: additional effect templates enabled but none set")]
    EmptyAdditionalTemplateList {
        /// Affected slot
        slot: Slot,
    },

    /// Additional templates set, but every one of them was skipped
    #[error("slot {slot}: additional effect templates enabled but none merged")]
    NoAdditionalTemplateMerged {
        /// Affected slot
        slot: Slot,
    },

    /// Template has no state to enter besides the settings marker
    #[error("slot {slot}: action template has no entry state")]
    MissingEntryState {
        /// Affected slot
        slot: Slot,
    },

    /// Descriptor has no menu tree
    #[error("descriptor has no menu tree")]
    MissingMenuTree,

    /// No target menu could be resolved or detected
    #[error("slot {slot}: target menu not found and auto-detect failed")]
    MenuAutoDetectFailed {
        /// Affected slot
        slot: Slot,
    },

    /// Target menu has no control for the slot
    #[error("slot {slot}: no control for the slot in {menu}")]
    MenuControlNotFound {
        /// Affected slot
        slot: Slot,
        /// Patched menu node
        menu: MenuId,
    },

    /// Template lost its slot to an earlier one
    #[error("slot {slot}: template on {node} dropped, slot owned by {winner}")]
    DuplicateSlotDropped {
        /// Contested slot
        slot: Slot,
        /// Losing template's node
        node: NodeId,
        /// Winning template's node
        winner: NodeId,
    },

    /// Graph or menu structure is inconsistent
    #[error("slot {slot}: {source}")]
    Model {
        /// Affected slot
        slot: Slot,
        /// Underlying model error
        #[source]
        source: ModelError,
    },
}

impl MergeError {
    /// Template failure with a detail message
    #[inline]
    #[must_use]
    pub fn template(slot: Slot, role: TemplateRole, detail: impl Into<String>) -> Self {
        Self::MissingOrWrongTypeTemplate {
            slot,
            role,
            detail: detail.into(),
        }
    }

    /// Wrap a model error for a slot
    #[inline]
    #[must_use]
    pub fn model(slot: Slot, source: ModelError) -> Self {
        Self::Model { slot, source }
    }

    /// Slot the failure concerns, if any
    #[must_use]
    pub fn slot(&self) -> Option<Slot> {
        match self {
            Self::MissingRootGraph { slot }
            | Self::MissingScope { slot, .. }
            | Self::MissingState { slot, .. }
            | Self::CrossScopeStates { slot, .. }
            | Self::MissingOrWrongTypeTemplate { slot, .. }
            | Self::EmptyAdditionalTemplateList { slot }
            | Self::NoAdditionalTemplateMerged { slot }
            | Self::MissingEntryState { slot }
            | Self::MenuAutoDetectFailed { slot }
            | Self::MenuControlNotFound { slot, .. }
            | Self::DuplicateSlotDropped { slot, .. }
            | Self::Model { slot, .. } => Some(*slot),
            Self::MissingMenuTree => None,
        }
    }

    /// Short machine-readable name
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingRootGraph { .. } => "missing_root_graph",
            Self::MissingScope { .. } => "missing_scope",
            Self::MissingState { .. } => "missing_state",
            Self::CrossScopeStates { .. } => "cross_scope_states",
            Self::MissingOrWrongTypeTemplate { .. } => "missing_or_wrong_type_template",
            Self::EmptyAdditionalTemplateList { .. } => "empty_additional_template_list",
            Self::NoAdditionalTemplateMerged { .. } => "no_additional_template_merged",
            Self::MissingEntryState { .. } => "missing_entry_state",
            Self::MissingMenuTree => "missing_menu_tree",
            Self::MenuAutoDetectFailed { .. } => "menu_auto_detect_failed",
            Self::MenuControlNotFound { .. } => "menu_control_not_found",
            Self::DuplicateSlotDropped { .. } => "duplicate_slot_dropped",
            Self::Model { .. } => "model",
        }
    }
}
