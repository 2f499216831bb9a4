//! Build configuration

use crate::error::BuildError;
use emote_merge::{MergeOptions, MAX_ADDITIONAL_EFFECTS};
use emote_model::AssetRef;
use emote_slots::SELECTOR_PARAMETER;
use serde::{Deserialize, Serialize};

/// Configuration for one build pass
///
/// Loadable from TOML; every field has a default, so an empty document is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Prefix of merged action machine names
    pub action_machine_prefix: String,
    /// Prefix of merged effect layer names
    pub effect_layer_prefix: String,
    /// Template state carrying the transition settings payload
    pub settings_state_name: String,
    /// Icon put on the control leading to a patched menu
    pub default_menu_icon: Option<AssetRef>,
    /// Selector-bound controls needed for menu auto-detect
    pub menu_auto_detect_min_controls: usize,
    /// Additional effect templates considered per slot
    pub max_additional_effects: usize,
    /// Start state suggested for a default action layer
    pub default_start_state: String,
    /// End state suggested for a default action layer
    pub default_end_state: String,
    /// Scope name that needs no explicit merge scope
    pub default_action_scope: String,
}

impl BuildConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns error if the document does not parse or fails validation
    pub fn from_toml_str(s: &str) -> Result<Self, BuildError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Selector parameter name, fixed for every build
    #[inline]
    #[must_use]
    pub fn selector_parameter(&self) -> &'static str {
        SELECTOR_PARAMETER
    }

    /// With default menu icon
    #[inline]
    #[must_use]
    pub fn with_default_menu_icon(mut self, icon: AssetRef) -> Self {
        self.default_menu_icon = Some(icon);
        self
    }

    /// With action machine prefix
    #[inline]
    #[must_use]
    pub fn with_action_machine_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.action_machine_prefix = prefix.into();
        self
    }

    /// With effect layer prefix
    #[inline]
    #[must_use]
    pub fn with_effect_layer_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.effect_layer_prefix = prefix.into();
        self
    }

    /// With auto-detect threshold
    #[inline]
    #[must_use]
    pub fn with_auto_detect_min_controls(mut self, min: usize) -> Self {
        self.menu_auto_detect_min_controls = min;
        self
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns [`BuildError::InvalidConfig`] naming the first bad field
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.action_machine_prefix.trim().is_empty() {
            return Err(BuildError::config("action_machine_prefix is empty"));
        }
        if self.effect_layer_prefix.trim().is_empty() {
            return Err(BuildError::config("effect_layer_prefix is empty"));
        }
        if self.settings_state_name.trim().is_empty() {
            return Err(BuildError::config("settings_state_name is empty"));
        }
        if self.menu_auto_detect_min_controls == 0 {
            return Err(BuildError::config("menu_auto_detect_min_controls must be at least 1"));
        }
        Ok(())
    }

    /// Options handed to the merge engines
    #[must_use]
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            action_machine_prefix: self.action_machine_prefix.clone(),
            effect_layer_prefix: self.effect_layer_prefix.clone(),
            settings_state_name: self.settings_state_name.clone(),
            auto_detect_min_controls: self.menu_auto_detect_min_controls,
            max_additional_effects: self.max_additional_effects.min(MAX_ADDITIONAL_EFFECTS),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        let merge = MergeOptions::default();
        Self {
            action_machine_prefix: merge.action_machine_prefix,
            effect_layer_prefix: merge.effect_layer_prefix,
            settings_state_name: merge.settings_state_name,
            default_menu_icon: None,
            menu_auto_detect_min_controls: merge.auto_detect_min_controls,
            max_additional_effects: merge.max_additional_effects,
            default_start_state: "Prepare Standing".to_string(),
            default_end_state: "BlendOut Stand".to_string(),
            default_action_scope: "Action".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(BuildConfig::from_toml_str("").unwrap(), BuildConfig::default());
    }

    #[test]
    fn toml_overrides_and_clamps() {
        let config = BuildConfig::from_toml_str(
            r#"
            action_machine_prefix = "Slot_"
            max_additional_effects = 7

            [default_menu_icon]
            guid = "icon-guid"
            "#,
        )
        .unwrap();
        assert_eq!(config.action_machine_prefix, "Slot_");
        assert_eq!(config.default_menu_icon, Some(AssetRef::new("icon-guid")));
        let options = config.merge_options();
        assert_eq!(options.action_machine_name(2), "Slot_2");
        assert_eq!(options.max_additional_effects, 2);
    }

    #[test]
    fn validation_rejects_blank_names() {
        let err = BuildConfig::new().with_effect_layer_prefix(" ").validate().unwrap_err();
        assert!(err.is_config());
        assert!(BuildConfig::from_toml_str("menu_auto_detect_min_controls = 0").is_err());
        assert!(BuildConfig::from_toml_str("action_machine_prefix = 3").is_err());
    }

    #[test]
    fn selector_is_fixed() {
        assert_eq!(BuildConfig::new().selector_parameter(), "VRCEmote");
    }
}
