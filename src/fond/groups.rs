use std::collections::{BTreeMap, HashMap};

use super::synthetic::{is_synthetic, SyntheticName};
use crate::error::{Error, Result};
use crate::models::Method;

/// The synthetic methods encoding one non-deterministic action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeGroup {
    /// The abstract task hosting the synthetic methods. Its name is the merged action's name.
    pub task: String,
    /// Outcome count named by the synthetic subtasks.
    pub count: usize,
    /// Synthetic methods decomposing `task`.
    pub methods: Vec<String>,
}

impl OutcomeGroup {
    /// Whether every encoded outcome still has its method. The grounder drops the methods of
    /// outcomes it proves unreachable.
    pub fn is_complete(&self) -> bool {
        self.methods.len() == self.count
    }

    pub fn outcome_names(&self) -> impl Iterator<Item = SyntheticName> + '_ {
        (1..=self.count).map(move |index| SyntheticName::new(self.task.clone(), index, self.count))
    }
}

/// Group the synthetic methods by the task they decompose.
pub fn discover_groups(methods: &BTreeMap<String, Method>) -> Result<BTreeMap<String, OutcomeGroup>> {
    let mut groups: BTreeMap<String, OutcomeGroup> = BTreeMap::new();
    for method in methods.values().filter(|method| is_synthetic(&method.name)) {
        let outcome = method
            .subtasks
            .iter()
            .find_map(|subtask| SyntheticName::parse(subtask))
            .ok_or_else(|| {
                Error::malformed(format!(
                    "synthetic method '{}' has no synthetic subtask",
                    method.name
                ))
            })?;

        let group = groups
            .entry(method.task.clone())
            .or_insert_with(|| OutcomeGroup {
                task: method.task.clone(),
                count: outcome.count,
                methods: Vec::new(),
            });
        if group.count != outcome.count {
            return Err(Error::AmbiguousGrouping {
                task: method.task.clone(),
                first: group.count,
                second: outcome.count,
            });
        }
        group.methods.push(method.name.clone());
    }
    Ok(groups)
}

/// Synthetic action name → the outcome it encodes, for every discovered group.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    outcomes: HashMap<String, SyntheticName>,
}

impl Translator {
    pub fn new(groups: &BTreeMap<String, OutcomeGroup>) -> Self {
        let outcomes = groups
            .values()
            .flat_map(|group| group.outcome_names())
            .map(|outcome| (outcome.render(), outcome))
            .collect();
        Self { outcomes }
    }

    pub fn get(&self, action: &str) -> Option<&SyntheticName> {
        self.outcomes.get(action)
    }

    pub fn translate(&self, action: &str) -> Result<&SyntheticName> {
        self.get(action).ok_or_else(|| {
            Error::malformed(format!(
                "synthetic action '{}' belongs to no synthetic method group",
                action
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, task: &str, subtasks: &[&str]) -> (String, Method) {
        (
            name.to_string(),
            Method {
                name: name.to_string(),
                task: task.to_string(),
                subtasks: subtasks.iter().map(|s| s.to_string()).collect(),
                orderings: vec![],
            },
        )
    }

    #[test]
    fn test_groups_by_task() {
        let methods = BTreeMap::from([
            method("fond_act__m_0", "pick_up[b1]", &["fond_act__pick_up_1of2[b1]"]),
            method("fond_act__m_1", "pick_up[b1]", &["fond_act__pick_up_2of2[b1]"]),
            method("m_get_2", "get[b1]", &["pick_up[b1]"]),
        ]);
        let groups = discover_groups(&methods).unwrap();
        assert_eq!(groups.len(), 1);
        let group = &groups["pick_up[b1]"];
        assert_eq!(group.count, 2);
        assert!(group.is_complete());

        let translator = Translator::new(&groups);
        assert_eq!(translator.len(), 2);
        assert_eq!(
            translator.translate("fond_act__pick_up_2of2[b1]").unwrap(),
            &SyntheticName::new("pick_up[b1]", 2, 2)
        );
        assert!(translator.translate("fond_act__pick_up_3of3[b1]").is_err());
    }

    #[test]
    fn test_conflicting_counts() {
        let methods = BTreeMap::from([
            method("fond_act__m_0", "pick_up[b1]", &["fond_act__pick_up_1of2[b1]"]),
            method("fond_act__m_1", "pick_up[b1]", &["fond_act__pick_up_3of3[b1]"]),
        ]);
        assert!(matches!(
            discover_groups(&methods),
            Err(Error::AmbiguousGrouping { first: 2, second: 3, .. })
        ));
    }

    #[test]
    fn test_synthetic_method_without_outcome() {
        let methods = BTreeMap::from([method("fond_act__m_0", "pick_up[b1]", &["noop[]"])]);
        assert!(matches!(discover_groups(&methods), Err(Error::MalformedInput(_))));
    }
}
