//! Serialized build input and output

use crate::config::BuildConfig;
use crate::descriptor::Avatar;
use crate::error::BuildError;
use crate::library::{AssetLibrary, SavedLog};
use crate::pass::build_avatar;
use crate::report::BuildReport;
use serde::{Deserialize, Serialize};

/// Everything one build reads
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildInput {
    /// Avatar to build
    pub avatar: Avatar,
    /// Templates, menu references and icons
    #[serde(default)]
    pub library: AssetLibrary,
}

impl BuildInput {
    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if the document is not a valid build input
    pub fn from_json(s: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Run the pass, consuming the input
    ///
    /// # Errors
    /// Returns error if `config` is invalid
    pub fn build(self, config: BuildConfig) -> Result<BuildOutput, BuildError> {
        let Self { mut avatar, library } = self;
        let mut saved = SavedLog::default();
        let report = build_avatar(&mut avatar, &library, &mut saved, config)?;
        Ok(BuildOutput { avatar, report, saved })
    }
}

/// Everything one build produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOutput {
    /// Avatar with patched graphs, menu store and menu root
    pub avatar: Avatar,
    /// What happened
    pub report: BuildReport,
    /// What was handed over for persistence
    pub saved: SavedLog,
}

impl BuildOutput {
    /// Render as pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json_pretty(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::AvatarDescriptor;
    use emote_slots::Hierarchy;

    #[test]
    fn minimal_json_input() {
        let avatar = Avatar::new(AvatarDescriptor::new("Bare"), Hierarchy::new("Bare"));
        let json = serde_json::to_string(&serde_json::json!({ "avatar": avatar })).unwrap();
        let input = BuildInput::from_json(&json).unwrap();
        assert!(input.library.is_empty());

        let output = input.build(BuildConfig::default()).unwrap();
        assert_eq!(output.report.avatar, "Bare");
        assert!(output.saved.graphs.is_empty());
        let round: BuildOutput = serde_json::from_str(&output.to_json_pretty().unwrap()).unwrap();
        assert_eq!(round, output);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(BuildInput::from_json("{"), Err(BuildError::Serialization(_))));
    }
}
