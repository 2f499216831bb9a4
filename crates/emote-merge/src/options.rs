//! Naming and limits shared by the merge engines

use serde::{Deserialize, Serialize};

/// Upper bound on additional effect templates per slot
pub const MAX_ADDITIONAL_EFFECTS: usize = 2;

/// Knobs the engines read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Prefix of merged action machine names, followed by the slot
    pub action_machine_prefix: String,
    /// Prefix of merged effect layer names, followed by the slot
    pub effect_layer_prefix: String,
    /// Name of the template state carrying transition settings
    pub settings_state_name: String,
    /// Selector-bound controls needed for a menu to be auto-detected
    pub auto_detect_min_controls: usize,
    /// Additional effect templates considered per slot
    pub max_additional_effects: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            action_machine_prefix: "EmoteSlot_".to_string(),
            effect_layer_prefix: "EmoteFx_".to_string(),
            settings_state_name: "[ME] StartState Transition Settings".to_string(),
            auto_detect_min_controls: 4,
            max_additional_effects: MAX_ADDITIONAL_EFFECTS,
        }
    }
}

impl MergeOptions {
    /// Name of the merged action machine for `slot`
    #[inline]
    #[must_use]
    pub fn action_machine_name(&self, slot: impl std::fmt::Display) -> String {
        format!("{}{slot}", self.action_machine_prefix)
    }

    /// Name of a merged effect layer; `variant` 0 is the primary template
    #[inline]
    #[must_use]
    pub fn effect_layer_name(&self, slot: impl std::fmt::Display, variant: u8) -> String {
        if variant == 0 {
            format!("{}{slot}", self.effect_layer_prefix)
        } else {
            format!("{}{slot}_Ex{variant}", self.effect_layer_prefix)
        }
    }

    /// Additional-template limit clamped to the supported maximum
    #[inline]
    #[must_use]
    pub fn additional_limit(&self) -> usize {
        self.max_additional_effects.min(MAX_ADDITIONAL_EFFECTS)
    }
}
