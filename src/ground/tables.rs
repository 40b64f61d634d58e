//! Index → name tables for state features and tasks.

use crate::error::{Error, Result};
use crate::models::{StateFeature, Task, TaskKind, TaskLists};

/// Width of the prefix in front of every task name (`"0 "` / `"1 "`).
pub const TASK_NAME_PREFIX_WIDTH: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    features: Vec<StateFeature>,
}

impl FeatureTable {
    pub fn from_lines(lines: Vec<String>) -> Self {
        let features = lines
            .into_iter()
            .enumerate()
            .map(|(index, name)| StateFeature { index, name })
            .collect();
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn name(&self, index: usize) -> Result<&str> {
        self.features
            .get(index)
            .map(|feature| feature.name.as_str())
            .ok_or_else(|| {
                Error::malformed(format!(
                    "state feature index {} out of range (0..{})",
                    index,
                    self.features.len()
                ))
            })
    }

    pub fn names(&self, indices: &[usize]) -> Result<Vec<String>> {
        indices
            .iter()
            .map(|&index| self.name(index).map(str::to_string))
            .collect()
    }

    pub fn into_names(self) -> Vec<String> {
        self.features.into_iter().map(|feature| feature.name).collect()
    }
}

/// Every declared task, primitive ones first.
#[derive(Debug, Clone, Default)]
pub struct TaskTable {
    tasks: Vec<Task>,
}

impl TaskTable {
    /// Build the table from the task section.
    ///
    /// `primitive_count` is the number of action records; the first that many tasks are
    /// the primitive ones.
    pub fn from_lines(lines: Vec<String>, primitive_count: usize) -> Result<Self> {
        if primitive_count > lines.len() {
            return Err(Error::malformed(format!(
                "{} actions declared but only {} tasks",
                primitive_count,
                lines.len()
            )));
        }

        let mut tasks = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let name = strip_task_prefix(line).ok_or_else(|| {
                Error::malformed(format!("task line {} is too short: '{}'", index, line))
            })?;
            let kind = if index < primitive_count {
                TaskKind::Primitive
            } else {
                TaskKind::Abstract
            };
            tasks.push(Task {
                index,
                name: name.to_string(),
                kind,
            });
        }

        Ok(Self { tasks })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn name(&self, index: usize) -> Result<&str> {
        self.get(index).map(|task| task.name.as_str()).ok_or_else(|| {
            Error::malformed(format!(
                "task index {} out of range (0..{})",
                index,
                self.tasks.len()
            ))
        })
    }

    pub fn names(&self, indices: &[usize]) -> Result<Vec<String>> {
        indices
            .iter()
            .map(|&index| self.name(index).map(str::to_string))
            .collect()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn lists(&self) -> TaskLists {
        TaskLists::from_tasks(&self.tasks)
    }
}

fn strip_task_prefix(line: &str) -> Option<&str> {
    line.char_indices()
        .nth(TASK_NAME_PREFIX_WIDTH)
        .map(|(offset, _)| &line[offset..])
}
