//! Emote Slots
//!
//! Slot claims for emote templates: the eight standing slots of the shared
//! selector parameter, the avatar hierarchy that orders templates, and the
//! resolver that gives each slot exactly one winner.
//!
//! # Example
//!
//! ```rust,ignore
//! use emote_slots::{Hierarchy, SlotResolver, SlotTemplate};
//!
//! let mut tree = Hierarchy::new("Avatar");
//! let node = tree.add_child(tree.root().unwrap(), "Wave")?;
//! let templates = vec![SlotTemplate::new(node, 3).with_name("Wave")];
//! let resolution = SlotResolver::new().resolve(&tree, &templates);
//! assert_eq!(resolution.winners.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod hierarchy;
mod resolver;
mod slot;
mod template;

pub use error::SlotError;
pub use hierarchy::{Hierarchy, HierarchyNode, NodeId};
pub use resolver::{DroppedTemplate, Resolution, SlotResolver};
pub use slot::{SelectorValue, Slot, RESERVED_MIN, SELECTOR_PARAMETER, SLOT_COUNT};
pub use template::{EmoteControlKind, MenuTarget, SlotTemplate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
