//! Build report
//!
//! The report is the pass's only output channel for problems: every skipped
//! unit of work appears as a [`Diagnostic`], and advisory findings appear as
//! [`Lint`]s.

use crate::context::BuildId;
use crate::lint::Lint;
use emote_merge::MergeError;
use emote_model::MenuId;
use emote_slots::{NodeId, Slot};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational
    Info,
    /// Unit skipped
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// One skipped unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Slot concerned, if any
    pub slot: Option<Slot>,
    /// Machine-readable kind
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Warning from a merge failure
    #[must_use]
    pub fn warning(error: &MergeError) -> Self {
        Self {
            severity: Severity::Warning,
            slot: error.slot(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }

    /// Informational note
    #[must_use]
    pub fn info(slot: Option<Slot>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            slot,
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<&MergeError> for Diagnostic {
    fn from(error: &MergeError) -> Self {
        Self::warning(error)
    }
}

/// Winning template as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSummary {
    /// Claimed slot
    pub slot: Slot,
    /// Hierarchy node carrying the template
    pub node: NodeId,
    /// Menu entry name
    pub name: String,
}

/// Outcome of one build pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Build identity
    pub build: BuildId,
    /// Avatar name
    pub avatar: String,
    /// Winners in resolver order
    pub winners: Vec<WinnerSummary>,
    /// Names of merged action machines
    pub action_machines: Vec<String>,
    /// Names of appended effect layers
    pub effect_layers: Vec<String>,
    /// Menu root after the pass
    pub menu_root: Option<MenuId>,
    /// Menu nodes created by the pass
    pub menu_nodes_created: usize,
    /// Menu controls edited by the pass
    pub menu_controls_applied: usize,
    /// Template clones produced
    pub clones: usize,
    /// Skipped units
    pub diagnostics: Vec<Diagnostic>,
    /// Advisory findings
    pub lints: Vec<Lint>,
}

impl BuildReport {
    /// Empty report for `avatar`
    #[must_use]
    pub fn new(build: BuildId, avatar: impl Into<String>) -> Self {
        Self {
            build,
            avatar: avatar.into(),
            winners: Vec::new(),
            action_machines: Vec::new(),
            effect_layers: Vec::new(),
            menu_root: None,
            menu_nodes_created: 0,
            menu_controls_applied: 0,
            clones: 0,
            diagnostics: Vec::new(),
            lints: Vec::new(),
        }
    }

    /// Record a merge failure
    pub fn record(&mut self, error: &MergeError) {
        self.diagnostics.push(Diagnostic::warning(error));
    }

    /// Warnings only
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Whether anything was skipped
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Diagnostics for one slot
    pub fn for_slot(&self, slot: Slot) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.slot == Some(slot))
    }

    /// Diagnostic kinds in order, for compact assertions
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.kind.as_str()).collect()
    }
}
