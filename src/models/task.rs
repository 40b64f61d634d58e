use serde::{Deserialize, Serialize};

/// A task declared by the grounder.
///
/// The kind is never inferred from the name: the grounder lists the primitive tasks first, one
/// per action and in action order, and every task after them is abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Position in the task section.
    pub index: usize,
    pub name: String,
    pub kind: TaskKind,
}

/// Whether a task is executed directly or decomposed by methods.
///
/// - `Primitive`: Backed by an action
/// - `Abstract`: Backed by one or more methods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Primitive,
    Abstract,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Abstract => "abstract",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "primitive" => Some(Self::Primitive),
            "abstract" => Some(Self::Abstract),
            _ => None,
        }
    }
}

/// The final task classification of a domain, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLists {
    pub primitive: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_tasks: Vec<String>,
}

impl TaskLists {
    /// Split an index-ordered task table into primitive and abstract names.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut lists = Self::default();
        for task in tasks {
            match task.kind {
                TaskKind::Primitive => lists.primitive.push(task.name.clone()),
                TaskKind::Abstract => lists.abstract_tasks.push(task.name.clone()),
            }
        }
        lists
    }
}
