//! Error types for the build orchestrator
//!
//! Only conditions that stop a pass before it starts are errors here.
//! Per-template failures become [`crate::Diagnostic`]s in the report.

use emote_model::ModelError;

/// Pass-level error
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Configuration is unusable
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// Configuration file did not parse
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Build input or output did not (de)serialize
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Host structures are inconsistent
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl BuildError {
    /// Create configuration error
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Check if the error is caused by configuration
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::ConfigParse(_))
    }
}
