//! The build pass
//!
//! Resolves slot winners, then runs the action, effect and menu engines over
//! the same winner list. Every failure is caught at the smallest unit and
//! recorded in the report; the pass itself always completes.

use crate::config::BuildConfig;
use crate::context::BuildContext;
use crate::descriptor::{Avatar, AvatarDescriptor, LayerKind};
use crate::error::BuildError;
use crate::lint::lint;
use crate::report::{BuildReport, WinnerSummary};
use emote_merge::{ActionMerge, ActionOutcome, EffectMerge, EffectOutcome, MenuPatcher, MergeError};
use emote_model::{AssetResolver, AssetSink, MenuStore, SavedAsset};
use emote_slots::{SlotResolver, SlotTemplate};
use tracing::{debug, info, info_span, warn};

/// Build `avatar` with a fresh context
///
/// # Errors
/// Returns [`BuildError::InvalidConfig`] if `config` fails validation; merge
/// failures never surface here
pub fn build_avatar(
    avatar: &mut Avatar,
    resolver: &dyn AssetResolver,
    sink: &mut dyn AssetSink,
    config: BuildConfig,
) -> Result<BuildReport, BuildError> {
    let mut ctx = BuildContext::new(config)?;
    Ok(run_pass(&mut ctx, avatar, resolver, sink))
}

/// Run one full pass over `avatar`
///
/// Host graphs and the menu store are edited in place on the avatar, which
/// the caller owns as the build's private copy. Templates are only read.
pub fn run_pass(
    ctx: &mut BuildContext,
    avatar: &mut Avatar,
    resolver: &dyn AssetResolver,
    sink: &mut dyn AssetSink,
) -> BuildReport {
    let span = info_span!("emote_build", build = %ctx.id, avatar = %avatar.descriptor.name);
    let _guard = span.enter();

    let Avatar {
        descriptor,
        hierarchy,
        templates,
        menus,
    } = avatar;

    let resolution = SlotResolver::new().resolve(hierarchy, templates.as_slice());
    let mut report = BuildReport::new(ctx.id, descriptor.name.clone());
    info!(
        winners = resolution.winners.len(),
        dropped = resolution.dropped.len(),
        "slots resolved"
    );

    for dropped in &resolution.dropped {
        let error = MergeError::DuplicateSlotDropped {
            slot: dropped.slot,
            node: dropped.template.node,
            winner: dropped.winner,
        };
        warn!(slot = %dropped.slot, node = %dropped.template.node, "duplicate slot claim dropped");
        report.record(&error);
    }
    report.winners = resolution
        .winners
        .iter()
        .map(|w| WinnerSummary {
            slot: w.slot(),
            node: w.node,
            name: w.display_name.clone(),
        })
        .collect();

    run_animator_pass(ctx, descriptor, &resolution.winners, resolver, sink, &mut report);
    run_menu_pass(ctx, descriptor, menus, &resolution.winners, resolver, sink, &mut report);

    report.lints = lint(hierarchy, &resolution);
    report.clones = ctx.clone_count();
    info!(
        actions = report.action_machines.len(),
        effects = report.effect_layers.len(),
        warnings = report.warnings().count(),
        "build finished"
    );
    report
}

/// Merge every winner's action and effect templates into the host graphs
///
/// A slot with no host graph, default or custom, skips every winner that needs it. Each
/// host graph that changed is handed to `sink` once.
pub fn run_animator_pass(
    ctx: &mut BuildContext,
    descriptor: &mut AvatarDescriptor,
    winners: &[&SlotTemplate],
    resolver: &dyn AssetResolver,
    sink: &mut dyn AssetSink,
    report: &mut BuildReport,
) {
    let actions: Vec<&SlotTemplate> = winners.iter().copied().filter(|w| w.has_action()).collect();
    if !actions.is_empty() {
        match descriptor.graph_mut(LayerKind::Action) {
            Some(host) => {
                let engine = ActionMerge::new(&ctx.options);
                let mut changed = false;
                for winner in actions {
                    match engine.merge(host, winner, resolver, &mut ctx.action_clones) {
                        Ok(ActionOutcome::Merged { .. }) => {
                            changed = true;
                            report
                                .action_machines
                                .push(ctx.options.action_machine_name(winner.slot()));
                        }
                        Ok(ActionOutcome::AlreadyMerged) => {
                            debug!(slot = %winner.slot(), "action clone already embedded");
                        }
                        Err(e) => {
                            warn!(slot = %winner.slot(), error = %e, "action merge skipped");
                            report.record(&e);
                        }
                    }
                }
                if changed {
                    sink.save(SavedAsset::Graph(host));
                }
            }
            None => {
                for winner in actions {
                    let e = MergeError::MissingRootGraph { slot: winner.slot() };
                    warn!(slot = %winner.slot(), "no action graph on descriptor");
                    report.record(&e);
                }
            }
        }
    }

    let effects: Vec<&SlotTemplate> = winners
        .iter()
        .copied()
        .filter(|w| w.use_effect_template || w.use_additional_effect_templates)
        .collect();
    if effects.is_empty() {
        return;
    }
    let Some(host) = descriptor.graph_mut(LayerKind::Fx) else {
        for winner in effects {
            let e = MergeError::MissingRootGraph { slot: winner.slot() };
            warn!(slot = %winner.slot(), "no effect graph on descriptor");
            report.record(&e);
        }
        return;
    };
    let engine = EffectMerge::new(&ctx.options);
    let mut changed = false;
    for winner in effects {
        for result in engine.merge(host, winner, resolver, &mut ctx.effect_clones) {
            match result {
                Ok(EffectOutcome::Appended { layer, .. }) => {
                    changed = true;
                    report.effect_layers.push(layer);
                }
                Ok(EffectOutcome::AlreadyMerged { role }) => {
                    debug!(slot = %winner.slot(), role = %role, "effect clone already appended");
                }
                Err(e) => {
                    warn!(slot = %winner.slot(), error = %e, "effect merge skipped");
                    report.record(&e);
                }
            }
        }
    }
    if changed {
        sink.save(SavedAsset::Graph(host));
    }
}

/// Patch the menu tree for `winners` and swap the descriptor's root
pub fn run_menu_pass(
    ctx: &mut BuildContext,
    descriptor: &mut AvatarDescriptor,
    menus: &mut MenuStore,
    winners: &[&SlotTemplate],
    resolver: &dyn AssetResolver,
    sink: &mut dyn AssetSink,
    report: &mut BuildReport,
) {
    report.menu_root = descriptor.menu_root;
    if winners.is_empty() {
        debug!("no winners, menu left as is");
        return;
    }

    let patcher = MenuPatcher::new(&ctx.options);
    let icons = &mut ctx.icons;
    let mut default_icon = || icons.get(resolver);
    match patcher.patch(menus, descriptor.menu_root, winners, resolver, &mut default_icon, sink) {
        Ok(patch) => {
            for skipped in &patch.skipped {
                report.record(skipped);
            }
            if patch.is_cloned() {
                info!(root = %patch.root, created = patch.created.len(), "menu tree patched");
            }
            descriptor.menu_root = Some(patch.root);
            report.menu_root = Some(patch.root);
            report.menu_nodes_created = patch.created.len();
            report.menu_controls_applied = patch.applied.len();
        }
        Err(e) => {
            warn!(error = %e, "menu patch skipped");
            report.record(&e);
        }
    }
}
