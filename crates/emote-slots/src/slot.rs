//! Slot numbers and the shared selector parameter
//!
//! The selector is one integer parameter shared by every template. Values
//! `1..=8` pick a standing slot; values from [`RESERVED_MIN`] up belong to a
//! disjoint context and never match a standing slot.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Name of the shared selector parameter
pub const SELECTOR_PARAMETER: &str = "VRCEmote";

/// Number of standing slots
pub const SLOT_COUNT: u8 = 8;

/// First selector value outside the standing range
pub const RESERVED_MIN: i32 = 9;

/// Standing slot, always in `1..=8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    /// Slot if `value` is in range
    #[inline]
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (1..=SLOT_COUNT).contains(&value).then_some(Self(value))
    }

    /// Slot with `value` clamped into `1..=8`
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(1, i32::from(SLOT_COUNT)) as u8)
    }

    /// Slot number
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position, `slot - 1`
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Slot number as a condition threshold or control value
    #[inline]
    #[must_use]
    pub fn as_threshold(self) -> f32 {
        f32::from(self.0)
    }

    /// Every standing slot in ascending order
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=SLOT_COUNT).map(Self)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("slot {value} outside 1..={SLOT_COUNT}"))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

/// Meaning of a selector value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorValue {
    /// Nothing selected (zero or negative)
    Idle,
    /// Standing slot
    Standing(Slot),
    /// Reserved context value
    Reserved(i32),
}

impl SelectorValue {
    /// Classify a raw selector value
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn classify(value: i32) -> Self {
        match value {
            v if v >= RESERVED_MIN => Self::Reserved(v),
            v if v >= 1 => Self::Standing(Slot(v as u8)),
            _ => Self::Idle,
        }
    }

    /// Standing slot, if any
    #[inline]
    #[must_use]
    pub fn standing(self) -> Option<Slot> {
        match self {
            Self::Standing(slot) => Some(slot),
            _ => None,
        }
    }
}
