use serde::{Deserialize, Serialize};

/// A decomposition of an abstract task into a task network.
///
/// `orderings` holds `(predecessor, successor)` positions into `subtasks`. The constraints
/// define a partial order; subtasks with no constraint between them may run in either order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// The abstract task this method decomposes.
    pub task: String,
    /// Primitive or abstract task names.
    pub subtasks: Vec<String>,
    pub orderings: Vec<(usize, usize)>,
}

impl Method {
    pub fn references(&self, task: &str) -> bool {
        self.subtasks.iter().any(|subtask| subtask == task)
    }
}
