//! The JSON document handed to the search planner.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::models::{Action, ConditionalEffect, Domain, EffectList, EffectOutcome, Method};

/// A borrowed view of a [`Domain`] in the planner's input layout.
///
/// `tasks` lists the abstract tasks only; the planner derives primitive tasks from `actions`.
/// Sections the crate does not interpret appear at top level under their own names.
#[derive(Debug, Serialize)]
pub struct PlannerDocument<'a> {
    pub state_features: &'a [String],
    pub actions: BTreeMap<&'a str, ActionEntry<'a>>,
    pub methods: BTreeMap<&'a str, MethodEntry<'a>>,
    pub initial_state: &'a [String],
    pub goal: &'a [String],
    pub initial_abstract_task: &'a str,
    pub tasks: &'a [String],
    pub primitive_tasks: &'a [String],
    #[serde(flatten)]
    pub extra_sections: &'a BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ActionEntry<'a> {
    pub cost: u32,
    pub precond: &'a [String],
    pub effects: Vec<OutcomeEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OutcomeEntry<'a> {
    pub add_eff: EffectEntry<'a>,
    pub del_eff: EffectEntry<'a>,
}

#[derive(Debug, Serialize)]
pub struct EffectEntry<'a> {
    pub unconditional: &'a [String],
    pub conditional: &'a [ConditionalEffect],
}

#[derive(Debug, Serialize)]
pub struct MethodEntry<'a> {
    pub task: &'a str,
    pub subtasks: &'a [String],
    pub orderings: &'a [(usize, usize)],
}

impl<'a> PlannerDocument<'a> {
    /// Build the document. Unless `keep_conditional` is set, conditional effects are written
    /// as empty lists and the number withheld is logged.
    pub fn new(domain: &'a Domain, keep_conditional: bool) -> Self {
        if !keep_conditional {
            let withheld: usize = domain
                .actions
                .values()
                .flat_map(|action| action.effects.iter())
                .map(EffectOutcome::conditional_count)
                .sum();
            if withheld > 0 {
                warn!("Withholding {} conditional effects from the output", withheld);
            }
        }

        Self {
            state_features: &domain.state_features,
            actions: domain
                .actions
                .iter()
                .map(|(name, action)| (name.as_str(), ActionEntry::new(action, keep_conditional)))
                .collect(),
            methods: domain
                .methods
                .iter()
                .map(|(name, method)| (name.as_str(), MethodEntry::from(method)))
                .collect(),
            initial_state: &domain.initial_state,
            goal: &domain.goal,
            initial_abstract_task: &domain.initial_abstract_task,
            tasks: &domain.tasks.abstract_tasks,
            primitive_tasks: &domain.tasks.primitive,
            extra_sections: &domain.extra_sections,
        }
    }
}

impl<'a> ActionEntry<'a> {
    fn new(action: &'a Action, keep_conditional: bool) -> Self {
        Self {
            cost: action.cost,
            precond: &action.preconditions,
            effects: action
                .effects
                .iter()
                .map(|outcome| OutcomeEntry {
                    add_eff: EffectEntry::new(&outcome.add, keep_conditional),
                    del_eff: EffectEntry::new(&outcome.delete, keep_conditional),
                })
                .collect(),
        }
    }
}

impl<'a> EffectEntry<'a> {
    fn new(effects: &'a EffectList, keep_conditional: bool) -> Self {
        Self {
            unconditional: &effects.unconditional,
            conditional: if keep_conditional {
                effects.conditional.as_slice()
            } else {
                &[]
            },
        }
    }
}

impl<'a> From<&'a Method> for MethodEntry<'a> {
    fn from(method: &'a Method) -> Self {
        Self {
            task: &method.task,
            subtasks: &method.subtasks,
            orderings: &method.orderings,
        }
    }
}

/// Serialize `domain` as a pretty-printed planner document.
pub fn to_json_string(domain: &Domain, keep_conditional: bool) -> Result<String> {
    Ok(serde_json::to_string_pretty(&PlannerDocument::new(
        domain,
        keep_conditional,
    ))?)
}

/// Write `domain` as a pretty-printed planner document.
pub fn write_json<W: Write>(writer: W, domain: &Domain, keep_conditional: bool) -> Result<()> {
    serde_json::to_writer_pretty(writer, &PlannerDocument::new(domain, keep_conditional))?;
    Ok(())
}
