//! Transitions and their conditions

use crate::graph::StateId;
use serde::{Deserialize, Serialize};

/// Comparison applied by a [`Condition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionMode {
    /// Bool or trigger parameter is set
    If,
    /// Bool parameter is unset
    IfNot,
    /// Numeric parameter is greater than the threshold
    Greater,
    /// Numeric parameter is less than the threshold
    Less,
    /// Int parameter equals the threshold
    Equals,
    /// Int parameter differs from the threshold
    NotEqual,
}

impl ConditionMode {
    /// Whether this mode compares against a numeric threshold
    #[inline]
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Greater | Self::Less | Self::Equals | Self::NotEqual
        )
    }
}

/// Single transition guard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Parameter name
    pub parameter: String,
    /// Comparison mode
    pub mode: ConditionMode,
    /// Threshold for numeric modes, ignored otherwise
    pub threshold: f32,
}

impl Condition {
    /// Create condition
    #[inline]
    #[must_use]
    pub fn new(parameter: impl Into<String>, mode: ConditionMode, threshold: f32) -> Self {
        Self {
            parameter: parameter.into(),
            mode,
            threshold,
        }
    }

    /// `parameter == value`
    #[inline]
    #[must_use]
    pub fn equals(parameter: impl Into<String>, value: f32) -> Self {
        Self::new(parameter, ConditionMode::Equals, value)
    }

    /// `parameter` is set
    #[inline]
    #[must_use]
    pub fn is_true(parameter: impl Into<String>) -> Self {
        Self::new(parameter, ConditionMode::If, 0.0)
    }

    /// Threshold rounded to the nearest integer
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded_threshold(&self) -> i32 {
        self.threshold.round() as i32
    }
}

/// Which transitions may interrupt an active transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterruptionSource {
    /// Not interruptible
    #[default]
    None,
    /// Transitions from the source state
    Source,
    /// Transitions from the destination state
    Destination,
    /// Source first, then destination
    SourceThenDestination,
    /// Destination first, then source
    DestinationThenSource,
}

/// Edge between states
///
/// The same shape is used for state transitions, any-state transitions,
/// entry transitions and machine-exit transitions; the owning list decides
/// which kind it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Guards, all of which must hold
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Destination state, `None` for an exit transition
    #[serde(default)]
    pub destination: Option<StateId>,
    /// Normalized exit time, `None` when exit time is disabled
    #[serde(default)]
    pub exit_time: Option<f32>,
    /// Whether `duration` is in seconds rather than normalized time
    #[serde(default = "default_true")]
    pub has_fixed_duration: bool,
    /// Blend duration
    #[serde(default)]
    pub duration: f32,
    /// Normalized start offset in the destination
    #[serde(default)]
    pub offset: f32,
    /// Interruption source
    #[serde(default)]
    pub interruption_source: InterruptionSource,
    /// Whether interruptions are evaluated in list order
    #[serde(default = "default_true")]
    pub ordered_interruption: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            destination: None,
            exit_time: None,
            has_fixed_duration: true,
            duration: 0.0,
            offset: 0.0,
            interruption_source: InterruptionSource::None,
            ordered_interruption: true,
        }
    }
}

impl Transition {
    /// Transition to a state with default timing
    #[inline]
    #[must_use]
    pub fn to(destination: StateId) -> Self {
        Self {
            destination: Some(destination),
            ..Self::default()
        }
    }

    /// Add a condition
    #[inline]
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Conditions on a given parameter
    pub fn conditions_on<'a>(&'a self, parameter: &'a str) -> impl Iterator<Item = &'a Condition> + 'a {
        self.conditions
            .iter()
            .filter(move |c| c.parameter == parameter)
    }
}
