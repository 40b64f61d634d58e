//! Reconstruction of non-deterministic actions.
//!
//! A deterministic grounder cannot handle actions with alternative effects, so each
//! N-outcome action `a[args]` reaches it pre-expanded:
//!
//! - N synthetic actions `fond_act__a_<k>of<N>[args]`, one per outcome,
//! - an abstract task `a[args]` with N synthetic methods `fond_act__...`, each choosing one
//!   outcome, optionally guarded by a `__method_precondition_fond_act__...` stub action.
//!
//! [`merge`] folds each family back into one action `a[args]` holding all N outcomes and
//! drops the scaffolding.

mod groups;
mod synthetic;

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::config::{IncompleteGroupPolicy, OutcomeOrder};
use crate::error::{Error, Result};
use crate::models::{Action, Domain, EffectOutcome};

pub use groups::{discover_groups, OutcomeGroup, Translator};
pub use synthetic::{
    is_precondition_stub, is_synthetic, SyntheticName, PRECONDITION_STUB_MARKER, SYNTHETIC_PREFIX,
};

/// Knobs of a merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub outcome_order: OutcomeOrder,
    pub incomplete_groups: IncompleteGroupPolicy,
}

/// What a merge pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Non-deterministic actions in the result.
    pub merged_actions: usize,
    /// Synthetic actions folded into them.
    pub folded_actions: usize,
    pub removed_tasks: usize,
    pub removed_methods: usize,
    pub removed_stubs: usize,
    /// Tasks whose group lacked some outcome methods.
    pub incomplete_groups: Vec<String>,
}

impl MergeReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Merge every synthetic action family of `domain` into one multi-outcome action.
///
/// All validation happens before the first mutation: on error `domain` is unchanged.
/// Merging an already merged domain is a no-op.
pub fn merge(domain: &mut Domain, options: &MergeOptions) -> Result<MergeReport> {
    let groups = discover_groups(&domain.methods)?;
    let translator = Translator::new(&groups);
    let folds = plan_folds(domain, &translator)?;
    debug!(
        "Found {} outcome groups covering {} synthetic actions",
        groups.len(),
        folds.len()
    );

    let mut report = MergeReport {
        folded_actions: folds.len(),
        ..MergeReport::default()
    };

    let merged = fold_outcomes(domain, folds, options.outcome_order);
    for (name, action) in merged {
        let complete = groups.get(&name).map_or(true, OutcomeGroup::is_complete);
        if !complete {
            report.incomplete_groups.push(name.clone());
            match options.incomplete_groups {
                IncompleteGroupPolicy::Prune => {
                    warn!(
                        "Dropping '{}': only {} of its outcomes survived grounding",
                        name,
                        action.effects.len()
                    );
                    report.removed_methods += remove_referencing_methods(domain, &name);
                    continue;
                }
                IncompleteGroupPolicy::Keep => {
                    warn!(
                        "Keeping '{}' with {} surviving outcomes",
                        name,
                        action.effects.len()
                    );
                }
            }
        }
        report.merged_actions += 1;
        domain.actions.insert(name, action);
    }

    prune_scaffolding(domain, &groups, &translator, &mut report);

    if report.is_noop() {
        debug!("No synthetic actions to merge");
    } else {
        info!(
            "Merged {} synthetic actions into {} non-deterministic actions; removed {} tasks, {} methods, {} precondition stubs",
            report.folded_actions,
            report.merged_actions,
            report.removed_tasks,
            report.removed_methods,
            report.removed_stubs
        );
    }
    Ok(report)
}

/// Translate every synthetic action and check the merge can be applied.
fn plan_folds(domain: &Domain, translator: &Translator) -> Result<Vec<(String, SyntheticName)>> {
    if let Some(action) = domain.actions.values().find(|action| action.effects.is_empty()) {
        return Err(Error::malformed(format!(
            "action '{}' has no effect outcome",
            action.name
        )));
    }

    let mut folds = domain
        .actions
        .keys()
        .filter(|name| is_synthetic(name))
        .map(|name| {
            translator
                .translate(name)
                .map(|outcome| (name.clone(), outcome.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    // Scan in declaration order; undeclared actions go last, by name.
    let declared: HashMap<&str, usize> = domain
        .tasks
        .primitive
        .iter()
        .enumerate()
        .map(|(position, name)| (name.as_str(), position))
        .collect();
    folds.sort_by_key(|(name, _)| declared.get(name.as_str()).copied().unwrap_or(usize::MAX));

    if let Some((_, outcome)) = folds
        .iter()
        .find(|(_, outcome)| domain.actions.contains_key(&outcome.base))
    {
        return Err(Error::malformed(format!(
            "non-deterministic action '{}' is also declared as a plain action",
            outcome.base
        )));
    }
    Ok(folds)
}

/// Move the outcomes of the synthetic actions into their base actions.
///
/// A base action takes its cost and preconditions from the first synthetic action declared.
fn fold_outcomes(
    domain: &mut Domain,
    folds: Vec<(String, SyntheticName)>,
    order: OutcomeOrder,
) -> BTreeMap<String, Action> {
    let mut pending: BTreeMap<String, (Action, Vec<(usize, EffectOutcome)>)> = BTreeMap::new();
    for (synthetic, outcome) in folds {
        let Some(action) = domain.actions.remove(&synthetic) else {
            continue;
        };
        let (_, outcomes) = pending.entry(outcome.base.clone()).or_insert_with(|| {
            (
                Action {
                    name: outcome.base.clone(),
                    cost: action.cost,
                    preconditions: action.preconditions.clone(),
                    effects: Vec::new(),
                },
                Vec::new(),
            )
        });
        outcomes.extend(action.effects.into_iter().map(|effect| (outcome.index, effect)));
    }

    pending
        .into_iter()
        .map(|(name, (mut action, mut outcomes))| {
            if order == OutcomeOrder::Index {
                outcomes.sort_by_key(|(index, _)| *index);
            }
            action.effects = outcomes.into_iter().map(|(_, effect)| effect).collect();
            (name, action)
        })
        .collect()
}

/// Remove the non-synthetic methods that use a dropped action. Synthetic methods are
/// removed with the rest of the scaffolding.
fn remove_referencing_methods(domain: &mut Domain, action: &str) -> usize {
    let before = domain.methods.len();
    domain
        .methods
        .retain(|name, method| is_synthetic(name) || !method.references(action));
    before - domain.methods.len()
}

fn prune_scaffolding(
    domain: &mut Domain,
    groups: &BTreeMap<String, OutcomeGroup>,
    translator: &Translator,
    report: &mut MergeReport,
) {
    let tasks_before = domain.tasks.abstract_tasks.len();
    domain
        .tasks
        .abstract_tasks
        .retain(|task| !groups.contains_key(task));
    report.removed_tasks = tasks_before - domain.tasks.abstract_tasks.len();

    let methods_before = domain.methods.len();
    domain.methods.retain(|name, _| !is_synthetic(name));
    report.removed_methods += methods_before - domain.methods.len();

    let actions_before = domain.actions.len();
    domain.actions.retain(|name, _| !is_precondition_stub(name));
    report.removed_stubs = actions_before - domain.actions.len();

    // Keep declaration order; a merged action takes the slot of its first outcome.
    let mut listed = HashSet::new();
    let primitive = std::mem::take(&mut domain.tasks.primitive);
    domain.tasks.primitive = primitive
        .into_iter()
        .map(|name| match translator.get(&name) {
            Some(outcome) => outcome.base.clone(),
            None => name,
        })
        .filter(|name| domain.actions.contains_key(name) && listed.insert(name.clone()))
        .collect();
}
