//! Error types for the graph and menu model

use crate::graph::{MachineId, StateId};
use crate::hash::HashError;
use crate::menu::MenuId;
use crate::path::PathError;

/// Errors raised by model lookups and conversions
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Machine id outside the arena
    #[error("unknown state machine {0}")]
    UnknownMachine(MachineId),

    /// State id outside the arena
    #[error("unknown state {0}")]
    UnknownState(StateId),

    /// Menu id outside the store
    #[error("unknown menu node {0}")]
    UnknownMenu(MenuId),

    /// Malformed scope path
    #[error("invalid scope path: {0}")]
    Path(#[from] PathError),

    /// Fingerprint failure
    #[error("fingerprint failed: {0}")]
    Hash(#[from] HashError),
}
