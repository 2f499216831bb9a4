//! Emote Merge
//!
//! Merge engines that fold slot templates into a host avatar's behavior
//! graphs and selector menu.
//!
//! # Core Concepts
//!
//! - [`ActionMerge`]: embeds an action template as a child state machine
//! - [`EffectMerge`]: appends effect templates as top-level layers
//! - [`MenuPatcher`]: copy-on-write patching of the menu tree
//! - [`CloneCache`]: one clone per (template, slot, variant) per build
//! - [`merge_parameters`]: host-wins union of parameter tables
//! - [`rewrite_thresholds`]: pins selector comparisons to the winning slot
//!
//! Each engine reports a skipped unit as a [`MergeError`] and leaves the host
//! as it was for that unit.
//!
//! # Example
//!
//! ```rust,ignore
//! use emote_merge::{ActionMerge, CloneCache, MergeOptions};
//!
//! let options = MergeOptions::default();
//! let mut clones = CloneCache::new();
//! let outcome = ActionMerge::new(&options).merge(&mut host, &winner, &assets, &mut clones)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod action;
mod clone_cache;
mod effect;
mod error;
mod menu;
mod options;
mod params;
mod search;
mod selector;

pub use action::{settings_transition, ActionMerge, ActionOutcome, SlotTransitionEdit};
pub use clone_cache::{CloneCache, CloneKey, Cloned};
pub use effect::{EffectMerge, EffectOutcome};
pub use error::{MergeError, TemplateRole};
pub use menu::{
    apply_winner, auto_detect, find_control_index, resolve_path, AppliedControl, MenuPatch, MenuPatcher, TargetGroups,
};
pub use options::{MergeOptions, MAX_ADDITIONAL_EFFECTS};
pub use params::{merge_parameters, SelectorPolicy};
pub use search::{
    common_parent, find_machine_by_name, find_machine_by_path, find_scope, find_state, parent_of_state,
    template_entry_state,
};
pub use selector::{force_write_defaults, is_slot_transition, pin_transition, rewrite_thresholds, slot_condition};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
