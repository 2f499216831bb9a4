//! Parameter table union

use emote_model::Parameter;
use emote_slots::SELECTOR_PARAMETER;
use indexmap::IndexMap;

/// How the selector parameter is treated during a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorPolicy {
    /// The host owns the selector; never copy it
    Skip,
    /// Copy the selector like any other parameter
    Include,
}

/// Add template declarations missing from the host table
///
/// Existing host entries always win. Returns the names added, in template
/// order.
pub fn merge_parameters(
    host: &mut IndexMap<String, Parameter>,
    template: &IndexMap<String, Parameter>,
    policy: SelectorPolicy,
) -> Vec<String> {
    let mut added = Vec::new();
    for (name, parameter) in template {
        if policy == SelectorPolicy::Skip && name == SELECTOR_PARAMETER {
            continue;
        }
        if host.contains_key(name) {
            continue;
        }
        host.insert(name.clone(), parameter.clone());
        added.push(name.clone());
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use emote_model::ParameterKind;
    use pretty_assertions::assert_eq;

    fn table(entries: &[(&str, ParameterKind)]) -> IndexMap<String, Parameter> {
        entries
            .iter()
            .map(|(name, kind)| ((*name).to_string(), Parameter::new(*name, *kind)))
            .collect()
    }

    #[test]
    fn host_wins_on_conflict() {
        let mut host = table(&[("Seated", ParameterKind::Bool)]);
        let template = table(&[("Seated", ParameterKind::Float), ("Wave", ParameterKind::Trigger)]);
        let added = merge_parameters(&mut host, &template, SelectorPolicy::Include);
        assert_eq!(added, vec!["Wave".to_string()]);
        assert_eq!(host["Seated"].kind, ParameterKind::Bool);
    }

    #[test]
    fn selector_policy() {
        let template = table(&[(SELECTOR_PARAMETER, ParameterKind::Int)]);

        let mut host = IndexMap::new();
        assert!(merge_parameters(&mut host, &template, SelectorPolicy::Skip).is_empty());
        assert!(host.is_empty());

        let added = merge_parameters(&mut host, &template, SelectorPolicy::Include);
        assert_eq!(added, vec![SELECTOR_PARAMETER.to_string()]);
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let mut host = IndexMap::new();
        let template = table(&[("A", ParameterKind::Bool), ("B", ParameterKind::Int)]);
        merge_parameters(&mut host, &template, SelectorPolicy::Skip);
        let before = host.clone();
        assert!(merge_parameters(&mut host, &template, SelectorPolicy::Skip).is_empty());
        assert_eq!(host, before);
    }
}
