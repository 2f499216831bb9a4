//! Per-template transition override payload
//!
//! A template may carry a [`TransitionSettings`] record on its settings-marker
//! state. When present, the merge rebuilds the host's slot transition from it
//! instead of redirecting the existing one.

use crate::transition::{Condition, ConditionMode, InterruptionSource};
use serde::{Deserialize, Serialize};

/// Comparator for numeric auxiliary conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Comparison {
    /// Greater than
    Greater,
    /// Equal to
    #[default]
    Equal,
    /// Less than
    Less,
    /// Not equal to
    NotEqual,
}

impl Comparison {
    /// Matching transition condition mode
    #[inline]
    #[must_use]
    pub fn mode(self) -> ConditionMode {
        match self {
            Self::Greater => ConditionMode::Greater,
            Self::Equal => ConditionMode::Equals,
            Self::Less => ConditionMode::Less,
            Self::NotEqual => ConditionMode::NotEqual,
        }
    }
}

/// Extra guard applied to the rebuilt slot transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuxCondition {
    /// Bool parameter must equal `value`
    Bool {
        /// Parameter name
        parameter: String,
        /// Expected value
        value: bool,
    },
    /// Int parameter comparison
    Int {
        /// Parameter name
        parameter: String,
        /// Comparator
        #[serde(default)]
        comparison: Comparison,
        /// Right-hand side
        value: i32,
    },
    /// Float parameter comparison
    Float {
        /// Parameter name
        parameter: String,
        /// Comparator
        #[serde(default)]
        comparison: Comparison,
        /// Right-hand side
        value: f32,
    },
    /// Trigger parameter must be set
    Trigger {
        /// Parameter name
        parameter: String,
    },
}

impl AuxCondition {
    /// Parameter the guard reads
    #[inline]
    #[must_use]
    pub fn parameter(&self) -> &str {
        match self {
            Self::Bool { parameter, .. }
            | Self::Int { parameter, .. }
            | Self::Float { parameter, .. }
            | Self::Trigger { parameter } => parameter,
        }
    }

    /// Translate into a transition condition
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_condition(&self) -> Condition {
        match self {
            Self::Bool { parameter, value } => {
                let mode = if *value {
                    ConditionMode::If
                } else {
                    ConditionMode::IfNot
                };
                Condition::new(parameter.clone(), mode, 0.0)
            }
            Self::Int {
                parameter,
                comparison,
                value,
            } => Condition::new(parameter.clone(), comparison.mode(), *value as f32),
            Self::Float {
                parameter,
                comparison,
                value,
            } => Condition::new(parameter.clone(), comparison.mode(), *value),
            Self::Trigger { parameter } => Condition::new(parameter.clone(), ConditionMode::If, 0.0),
        }
    }
}

/// Timing and guard overrides for the slot entry transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Interruption source
    pub interruption_source: InterruptionSource,
    /// Whether exit time is used
    pub has_exit_time: bool,
    /// Exit time, used only when `has_exit_time`
    pub exit_time: f32,
    /// Blend duration
    pub duration: f32,
    /// Normalized destination offset
    pub offset: f32,
    /// Whether duration is in seconds
    pub fixed_duration: bool,
    /// Whether interruptions are evaluated in order
    pub ordered_interruption: bool,
    /// Additional guards
    pub conditions: Vec<AuxCondition>,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            interruption_source: InterruptionSource::None,
            has_exit_time: false,
            exit_time: 0.0,
            duration: 0.1,
            offset: 0.0,
            fixed_duration: true,
            ordered_interruption: false,
            conditions: Vec::new(),
        }
    }
}

impl TransitionSettings {
    /// Exit time as stored on a transition
    #[inline]
    #[must_use]
    pub fn effective_exit_time(&self) -> Option<f32> {
        self.has_exit_time.then_some(self.exit_time)
    }
}
