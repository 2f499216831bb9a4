//! Emote Core - build orchestrator
//!
//! Runs the emote slot pass over one avatar:
//! - Resolves one winning template per slot
//! - Merges action branches and effect layers into the host graphs
//! - Patches a fresh copy of the menu tree
//! - Reports every skipped unit as a diagnostic instead of failing
//!
//! Also hosts the setup assistant, the menu preview and advisory lints.
//!
//! # Example
//!
//! ```rust,ignore
//! use emote_core::{build_avatar, AssetLibrary, BuildConfig, SavedLog};
//!
//! let mut saved = SavedLog::default();
//! let report = build_avatar(&mut avatar, &library, &mut saved, BuildConfig::new())?;
//! for diagnostic in report.warnings() {
//!     println!("{}: {}", diagnostic.kind, diagnostic.message);
//! }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod bundle;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod library;
pub mod lint;
pub mod pass;
pub mod preview;
pub mod report;
pub mod setup;

// Re-exports for convenience
pub use bundle::{BuildInput, BuildOutput};
pub use config::BuildConfig;
pub use context::{BuildContext, BuildId, IconCache};
pub use descriptor::{Avatar, AvatarDescriptor, BaseLayer, LayerKind};
pub use error::BuildError;
pub use library::{AssetLibrary, SavedLog};
pub use lint::{lint, Lint, LintKind};
pub use pass::{build_avatar, run_animator_pass, run_menu_pass, run_pass};
pub use preview::{preview_for_node, preview_menu, ControlPreview, MenuPreview};
pub use report::{BuildReport, Diagnostic, Severity, WinnerSummary};
pub use setup::{detect_merge_scope, detect_start_end, menu_path_to, suggest_setup, SetupSuggestion, StartEndGuess};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a build
    pub use crate::{
        build_avatar, AssetLibrary, Avatar, AvatarDescriptor, BaseLayer, BuildConfig, BuildReport, LayerKind,
        SavedLog,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use emote_model::AssetRef;
    use emote_slots::{Hierarchy, SlotTemplate};
    use emote_test_utils::{action_template, host_action_graph, menu_tree, END, START};

    #[test]
    fn library_drives_a_full_pass() {
        let mut hierarchy = Hierarchy::new("Avatar");
        let root = hierarchy.root().unwrap();
        let node = hierarchy.add_child(root, "Wave").unwrap();
        let fixture = menu_tree(&[1, 2, 3, 4]);

        let descriptor = AvatarDescriptor::new("Avatar")
            .with_layer(BaseLayer::custom(LayerKind::Action, host_action_graph().graph))
            .with_menu_root(fixture.root);
        let mut avatar = Avatar::new(descriptor, hierarchy);
        avatar.menus = fixture.store;

        let mut library = AssetLibrary::new();
        let wave = AssetRef::new("wave");
        library.insert_graph(&wave, action_template("Wave", 1.0));
        avatar.add_template(SlotTemplate::new(node, 3).with_name("Wave").with_action(wave, START, END));

        let mut saved = SavedLog::default();
        let report = build_avatar(&mut avatar, &library, &mut saved, BuildConfig::new()).unwrap();

        assert!(!report.has_warnings(), "{:?}", report.diagnostics);
        assert_eq!(report.action_machines, vec!["EmoteSlot_3".to_string()]);
        assert_eq!(saved.graphs.len(), 1);
        assert_eq!(saved.menus.len(), report.menu_nodes_created);
        assert_ne!(avatar.descriptor.menu_root, Some(fixture.root));
    }
}
