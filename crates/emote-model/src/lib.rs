//! Emote Model
//!
//! Typed data model for merging slot templates into avatar behavior graphs
//! and selector menus.
//!
//! # Core Concepts
//!
//! - [`BehaviorGraph`]: layered hierarchical state machines over a [`GraphArena`]
//! - [`Transition`] / [`Condition`]: guarded edges between states
//! - [`TransitionSettings`]: optional slot-transition override on a marker state
//! - [`MenuStore`] / [`MenuNode`] / [`Control`]: the selector menu tree
//! - [`AssetRef`] with [`AssetResolver`] and [`AssetSink`]: the host seam
//! - [`ContentHash`]: structural fingerprints for unchanged-ness checks
//!
//! # Example
//!
//! ```rust,ignore
//! use emote_model::{BehaviorGraph, Condition, Transition};
//!
//! let mut graph = BehaviorGraph::new("Action");
//! let root = graph.add_layer("Action", 1.0);
//! let idle = graph.arena.add_state(root, "Idle")?;
//! let wave = graph.arena.add_state(root, "Wave")?;
//! graph.arena.add_transition(idle, Transition::to(wave).with_condition(Condition::equals("VRCEmote", 1.0)))?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod asset;
mod error;
mod graph;
mod hash;
mod menu;
mod path;
mod settings;
mod transition;

pub use asset::{AssetKind, AssetRef, AssetResolver, AssetSink, ResolvedAsset, SavedAsset, TemplateId};
pub use error::ModelError;
pub use graph::{
    BehaviorGraph, ChildMachine, ChildState, GraphArena, IdRemap, Layer, MachineId, Parameter,
    ParameterKind, Position, State, StateId, StateMachine,
};
pub use hash::{ContentHash, Fingerprint, HashError};
pub use menu::{Control, ControlKind, Icon, MenuId, MenuNode, MenuStore};
pub use path::{PathError, ScopePath, SCOPE_SEPARATOR};
pub use settings::{AuxCondition, Comparison, TransitionSettings};
pub use transition::{Condition, ConditionMode, InterruptionSource, Transition};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn grafted_copy_fingerprints_like_source_subtree() {
        let mut template = BehaviorGraph::new("Template");
        let root = template.add_layer("Base", 1.0);
        let wave = template.arena.add_state(root, "Wave").unwrap();
        let out = template.arena.add_state(root, "Out").unwrap();
        template
            .arena
            .add_transition(wave, Transition::to(out).with_condition(Condition::equals("VRCEmote", 3.0)))
            .unwrap();

        let mut a = BehaviorGraph::new("Host");
        let mut b = BehaviorGraph::new("Host");
        a.arena.graft(&template.arena, root).unwrap();
        b.arena.graft(&template.arena, root).unwrap();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn menu_and_path_integration() {
        let path: ScopePath = "Action/Emotes".parse().unwrap();
        assert_eq!(path.len(), 2);

        let mut store = MenuStore::new();
        let id = store.push(MenuNode::new("Emotes"));
        let hash = store.get(id).unwrap().fingerprint().unwrap();
        assert_eq!(hash.short().len(), 16);
    }
}
