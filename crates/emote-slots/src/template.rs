//! Authored slot template records

use crate::hierarchy::NodeId;
use crate::slot::Slot;
use emote_model::{AssetRef, ControlKind, Icon};
use serde::{Deserialize, Serialize};

/// Control kind requested for a slot's menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmoteControlKind {
    /// Keep the existing control kind
    None,
    /// One-shot button
    Button,
    /// Held toggle
    #[default]
    Toggle,
}

impl EmoteControlKind {
    /// Menu control kind to apply, `None` to keep the existing one
    #[inline]
    #[must_use]
    pub fn to_control_kind(self) -> Option<ControlKind> {
        match self {
            Self::None => None,
            Self::Button => Some(ControlKind::Button),
            Self::Toggle => Some(ControlKind::Toggle),
        }
    }
}

/// Where a template's menu entry lives
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuTarget {
    /// Control indices from the menu root, each step following a sub-menu
    pub path: Vec<usize>,
    /// Persistent reference used when the path no longer resolves
    pub asset: AssetRef,
}

impl MenuTarget {
    /// Whether neither locator is set
    #[inline]
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.path.is_empty() && !self.asset.is_set()
    }
}

/// One template's claim on a slot
///
/// Records are authored data; the merge only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotTemplate {
    /// Hierarchy node carrying the record
    pub node: NodeId,
    /// Requested slot as authored, clamped by [`SlotTemplate::slot`]
    pub slot_index: i32,
    /// Menu entry name
    pub display_name: String,
    /// Menu entry icon
    pub icon: Option<Icon>,
    /// Menu entry kind
    pub control_kind: EmoteControlKind,
    /// Action branch template
    pub action_template: AssetRef,
    /// Primary effect layer template
    pub effect_template: AssetRef,
    /// Gate for `effect_template`
    pub use_effect_template: bool,
    /// Additional effect layer templates
    pub additional_effect_templates: Vec<AssetRef>,
    /// Gate for `additional_effect_templates`
    pub use_additional_effect_templates: bool,
    /// State whose slot transition enters the branch
    pub start_state: String,
    /// State the branch exits to
    pub end_state: String,
    /// Machine name or slash path restricting the state search
    pub merge_scope: Option<String>,
    /// Force write-defaults off on merged states
    pub write_defaults_off: bool,
    /// Put the shared icon on the control leading to the patched menu
    pub replace_menu_icon: bool,
    /// Menu entry location
    pub target_menu: MenuTarget,
}

impl Default for SlotTemplate {
    fn default() -> Self {
        Self {
            node: NodeId::new(0),
            slot_index: 1,
            display_name: "[ME]New Emote".to_string(),
            icon: None,
            control_kind: EmoteControlKind::Toggle,
            action_template: AssetRef::default(),
            effect_template: AssetRef::default(),
            use_effect_template: false,
            additional_effect_templates: Vec::new(),
            use_additional_effect_templates: false,
            start_state: String::new(),
            end_state: String::new(),
            merge_scope: None,
            write_defaults_off: true,
            replace_menu_icon: true,
            target_menu: MenuTarget::default(),
        }
    }
}

impl SlotTemplate {
    /// Template on `node` claiming `slot`
    #[inline]
    #[must_use]
    pub fn new(node: NodeId, slot: i32) -> Self {
        Self {
            node,
            slot_index: slot,
            ..Self::default()
        }
    }

    /// Set the display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the control kind
    #[inline]
    #[must_use]
    pub fn with_control_kind(mut self, kind: EmoteControlKind) -> Self {
        self.control_kind = kind;
        self
    }

    /// Set the icon
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the action template and its start/end states
    #[inline]
    #[must_use]
    pub fn with_action(mut self, template: AssetRef, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.action_template = template;
        self.start_state = start.into();
        self.end_state = end.into();
        self
    }

    /// Set the merge scope
    #[inline]
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.merge_scope = Some(scope.into());
        self
    }

    /// Enable the primary effect template
    #[inline]
    #[must_use]
    pub fn with_effect(mut self, template: AssetRef) -> Self {
        self.effect_template = template;
        self.use_effect_template = true;
        self
    }

    /// Enable additional effect templates
    #[inline]
    #[must_use]
    pub fn with_additional_effects(mut self, templates: Vec<AssetRef>) -> Self {
        self.additional_effect_templates = templates;
        self.use_additional_effect_templates = true;
        self
    }

    /// Set the menu target
    #[inline]
    #[must_use]
    pub fn with_target_menu(mut self, target: MenuTarget) -> Self {
        self.target_menu = target;
        self
    }

    /// Claimed slot, clamped into `1..=8`
    #[inline]
    #[must_use]
    pub fn slot(&self) -> Slot {
        Slot::clamped(self.slot_index)
    }

    /// Merge scope, ignoring blank strings
    #[inline]
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.merge_scope
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether an action template is referenced
    #[inline]
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.action_template.is_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_component() {
        let t = SlotTemplate::default();
        assert_eq!(t.display_name, "[ME]New Emote");
        assert_eq!(t.control_kind, EmoteControlKind::Toggle);
        assert!(t.write_defaults_off);
        assert!(t.replace_menu_icon);
        assert!(!t.has_action());
        assert!(t.target_menu.is_unset());
    }

    #[test]
    fn slot_is_clamped() {
        assert_eq!(SlotTemplate::new(NodeId::new(1), 0).slot().get(), 1);
        assert_eq!(SlotTemplate::new(NodeId::new(1), 42).slot().get(), 8);
    }

    #[test]
    fn blank_scope_is_none() {
        let t = SlotTemplate::default().with_scope("   ");
        assert_eq!(t.scope(), None);
        let t = SlotTemplate::default().with_scope(" Action/Emotes ");
        assert_eq!(t.scope(), Some("Action/Emotes"));
    }

    #[test]
    fn control_kind_mapping() {
        assert_eq!(EmoteControlKind::None.to_control_kind(), None);
        assert_eq!(EmoteControlKind::Button.to_control_kind(), Some(ControlKind::Button));
        assert_eq!(EmoteControlKind::Toggle.to_control_kind(), Some(ControlKind::Toggle));
    }

    #[test]
    fn sparse_json() {
        let t: SlotTemplate = serde_json::from_str(r#"{"node": 4, "slot_index": 3, "display_name": "Wave"}"#).unwrap();
        assert_eq!(t.slot().get(), 3);
        assert_eq!(t.display_name, "Wave");
        assert!(t.write_defaults_off);
    }
}
