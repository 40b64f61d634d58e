use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Action, Method, TaskLists};

/// A fully named, self-contained planning domain.
///
/// # Lifecycle
/// Built once from grounder output, then rewritten in place by the non-determinism merger.
/// Nothing references a `Domain` entity from outside; all links between entities are names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub state_features: Vec<String>,
    pub tasks: TaskLists,
    pub actions: BTreeMap<String, Action>,
    pub methods: BTreeMap<String, Method>,
    pub initial_state: Vec<String>,
    pub initial_abstract_task: String,
    /// Goal section lines, unresolved.
    pub goal: Vec<String>,
    /// Grounder sections this crate does not interpret (mutex groups, invariants, ...).
    pub extra_sections: BTreeMap<String, Vec<String>>,
}

impl Domain {
    pub fn is_abstract(&self, name: &str) -> bool {
        self.tasks.abstract_tasks.iter().any(|task| task == name)
    }

    /// Methods decomposing `task`, in name order.
    pub fn methods_for<'a>(&'a self, task: &'a str) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.values().filter(move |method| method.task == task)
    }

    /// Subtask names that resolve to neither an action nor an abstract task.
    pub fn unresolved_subtasks(&self) -> Vec<(&str, &str)> {
        self.methods
            .values()
            .flat_map(|method| {
                method
                    .subtasks
                    .iter()
                    .map(move |subtask| (method.name.as_str(), subtask.as_str()))
            })
            .filter(|(_, subtask)| !self.actions.contains_key(*subtask) && !self.is_abstract(subtask))
            .collect()
    }
}
