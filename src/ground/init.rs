use super::{parse_index_list, parse_single, FeatureTable, TaskTable};
use crate::error::{Error, Result};

/// The resolved start of a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialState {
    pub facts: Vec<String>,
    /// Name of the abstract task the initial task network consists of.
    pub task: String,
}

pub fn resolve_init(
    state_lines: &[String],
    task_lines: &[String],
    features: &FeatureTable,
    tasks: &TaskTable,
) -> Result<InitialState> {
    let state_line = first_line(state_lines, "initial_state")?;
    let task_line = first_line(task_lines, "initial_abstract_task")?;

    let facts = features.names(&parse_index_list(state_line, "initial state")?)?;
    let task = tasks
        .name(parse_single(task_line, "initial abstract task")?)?
        .to_string();
    Ok(InitialState { facts, task })
}

fn first_line<'a>(lines: &'a [String], section: &str) -> Result<&'a str> {
    lines
        .first()
        .map(String::as_str)
        .ok_or_else(|| Error::malformed(format!("section '{}' is empty", section)))
}
