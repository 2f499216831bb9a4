//! Error types for slot claims

use crate::hierarchy::NodeId;

/// Errors raised while editing the avatar hierarchy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    /// Node id not present in the hierarchy
    #[error("unknown hierarchy node {0}")]
    UnknownNode(NodeId),
}
