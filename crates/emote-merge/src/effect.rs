//! Effect layer merge
//!
//! Each enabled effect template of a winner becomes its own top-level layer
//! in the host effect graph. Variants are independent: a broken additional
//! template does not stop the primary one.

use crate::clone_cache::{CloneCache, CloneKey};
use crate::error::{MergeError, TemplateRole};
use crate::options::MergeOptions;
use crate::params::{merge_parameters, SelectorPolicy};
use crate::selector::{force_write_defaults, rewrite_thresholds};
use emote_model::{AssetRef, AssetResolver, BehaviorGraph, Layer, MachineId, ModelError};
use emote_slots::SlotTemplate;
use tracing::{debug, info, warn};

/// Result of merging one effect template variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    /// Layer appended to the host
    Appended {
        /// Which template
        role: TemplateRole,
        /// Name of the new layer
        layer: String,
        /// Root machine of the new layer
        root: MachineId,
    },
    /// Clone for this key was already appended earlier in the build
    AlreadyMerged {
        /// Which template
        role: TemplateRole,
    },
}

impl EffectOutcome {
    /// Template role this outcome is for
    #[inline]
    #[must_use]
    pub fn role(&self) -> TemplateRole {
        match self {
            Self::Appended { role, .. } | Self::AlreadyMerged { role } => *role,
        }
    }
}

/// Effect merge engine
#[derive(Debug, Clone, Copy)]
pub struct EffectMerge<'o> {
    options: &'o MergeOptions,
}

impl<'o> EffectMerge<'o> {
    /// Create engine
    #[inline]
    #[must_use]
    pub fn new(options: &'o MergeOptions) -> Self {
        Self { options }
    }

    /// Merge every enabled effect template of `winner`
    ///
    /// One entry per attempted variant, in primary-then-additional order.
    /// When additional templates are enabled and none of them merges, one
    /// summary error follows the per-variant ones. A winner with no enabled
    /// effect templates yields an empty list.
    pub fn merge(
        &self,
        host: &mut BehaviorGraph,
        winner: &SlotTemplate,
        resolver: &dyn AssetResolver,
        clones: &mut CloneCache,
    ) -> Vec<Result<EffectOutcome, MergeError>> {
        let slot = winner.slot();
        let mut results = Vec::new();

        if winner.use_effect_template {
            results.push(self.merge_variant(
                host,
                winner,
                TemplateRole::Effect,
                &winner.effect_template,
                resolver,
                clones,
            ));
        }

        if winner.use_additional_effect_templates {
            let mut attempted = 0;
            let mut merged = 0;
            for (index, reference) in winner
                .additional_effect_templates
                .iter()
                .take(self.options.additional_limit())
                .enumerate()
            {
                if !reference.is_set() {
                    debug!(slot = %slot, index, "additional effect template unset");
                    continue;
                }
                attempted += 1;
                #[allow(clippy::cast_possible_truncation)]
                let role = TemplateRole::AdditionalEffect(index as u8 + 1);
                let result = self.merge_variant(host, winner, role, reference, resolver, clones);
                if result.is_ok() {
                    merged += 1;
                }
                results.push(result);
            }
            if attempted == 0 {
                warn!(slot = %slot, "additional effect templates enabled but none set");
                results.push(Err(MergeError::EmptyAdditionalTemplateList { slot }));
            } else if merged == 0 {
                warn!(slot = %slot, attempted, "no additional effect template merged");
                results.push(Err(MergeError::NoAdditionalTemplateMerged { slot }));
            }
        }

        results
    }

    /// Merge one effect template as a new layer
    ///
    /// # Errors
    /// Returns the reason this variant was skipped; `host` is unchanged then
    pub fn merge_variant(
        &self,
        host: &mut BehaviorGraph,
        winner: &SlotTemplate,
        role: TemplateRole,
        reference: &AssetRef,
        resolver: &dyn AssetResolver,
        clones: &mut CloneCache,
    ) -> Result<EffectOutcome, MergeError> {
        let slot = winner.slot();
        let model = |e: ModelError| MergeError::model(slot, e);

        if !reference.is_set() {
            return Err(MergeError::template(slot, role, "is not set"));
        }
        let (template_id, template) = resolver.resolve_graph(reference).ok_or_else(|| {
            MergeError::template(slot, role, format!("'{reference}' does not resolve to a behavior graph"))
        })?;
        let template_root = template
            .first_root()
            .ok_or_else(|| MergeError::template(slot, role, "has no layer with a root state machine"))?;

        let added = merge_parameters(&mut host.parameters, &template.parameters, SelectorPolicy::Include);
        if !added.is_empty() {
            debug!(slot = %slot, %role, ?added, "merged effect parameters");
        }

        let name = self.options.effect_layer_name(slot, role.variant());
        let key = CloneKey::effect(template_id.clone(), slot, role.variant());
        let cloned = clones.clone_distinct(key, template);
        if cloned.reused {
            debug!(slot = %slot, %role, "effect clone already merged");
            return Ok(EffectOutcome::AlreadyMerged { role });
        }
        let clone = cloned.graph;

        if let Some(layer) = clone.layers.first_mut() {
            layer.weight = 1.0;
            layer.name.clone_from(&name);
        }
        if winner.write_defaults_off {
            force_write_defaults(&mut clone.arena, template_root, false).map_err(model)?;
        }
        rewrite_thresholds(&mut clone.arena, template_root, slot).map_err(model)?;

        let remap = host.arena.graft(&clone.arena, template_root).map_err(model)?;
        let root = remap
            .root()
            .ok_or_else(|| MergeError::template(slot, role, "has no layer with a root state machine"))?;
        host.arena.try_machine_mut(root).map_err(model)?.name.clone_from(&name);
        host.layers.push(Layer {
            name: name.clone(),
            weight: 1.0,
            root,
        });

        info!(slot = %slot, %role, layer = %name, states = remap.state_count(), "merged effect template");
        Ok(EffectOutcome::Appended { role, layer: name, root })
    }
}
