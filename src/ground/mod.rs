//! Deserialization of grounder output into a named [`Domain`].
//!
//! The grounder writes a sequence of `;;`-delimited sections whose data lines are mostly
//! whitespace-separated integers referencing positions in earlier sections:
//!
//! ```text
//! ;; #state_features
//! 2
//! +holding[b1]
//! +on-table[b1]
//! ;; #tasks (primitive and abstract)
//! 2
//! 0 pick_up[b1]
//! 1 get[b1]
//! ;; #actions
//! 1
//! 1
//! 1 -1
//! 0 0 -1
//! 0 1 -1
//! ...
//! ```
//!
//! Every index is resolved to a name here, so nothing after this module deals with positions.

mod actions;
mod effects;
mod init;
mod methods;
mod sections;
mod tables;

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Domain;

pub use actions::build_actions;
pub use effects::decode_effects;
pub use init::{resolve_init, InitialState};
pub use methods::build_methods;
pub use sections::{normalize_header, Sections, SECTION_DELIMITER};
pub use tables::{FeatureTable, TaskTable, TASK_NAME_PREFIX_WIDTH};

/// Lines per action record: cost, preconditions, add effects, delete effects.
pub const ACTION_RECORD_LINES: usize = 4;
/// Lines per method record: name, task, subtasks, orderings.
pub const METHOD_RECORD_LINES: usize = 4;

/// Terminates every index line.
const SENTINEL: i64 = -1;

/// Header aliases of the task declaration section.
const TASK_SECTIONS: [&str; 2] = ["tasks__primitive_and_abstract", "tasks"];

/// Parse grounder output into a domain. Synthetic non-deterministic actions are left as they
/// are; see [`crate::fond::merge`].
pub fn parse(text: &str) -> Result<Domain> {
    let mut sections = Sections::split(text);

    let features = FeatureTable::from_lines(sections.take("state_features")?);
    let raw_actions = sections.take("actions")?;
    let primitive_count = record_count(&raw_actions, ACTION_RECORD_LINES, "actions")?;
    let tasks = TaskTable::from_lines(sections.take_any(&TASK_SECTIONS)?, primitive_count)?;
    debug!(
        "Resolved {} state features and {} tasks ({} primitive)",
        features.len(),
        tasks.len(),
        primitive_count
    );

    let actions = build_actions(&raw_actions, &features, &tasks)?;
    let methods = build_methods(&sections.take("methods")?, &tasks)?;
    let init = resolve_init(
        &sections.take("initial_state")?,
        &sections.take("initial_abstract_task")?,
        &features,
        &tasks,
    )?;
    let goal = sections.take("goal")?;
    debug!(
        "Built {} actions and {} methods, initial task '{}'",
        actions.len(),
        methods.len(),
        init.task
    );

    Ok(Domain {
        tasks: tasks.lists(),
        state_features: features.into_names(),
        actions,
        methods,
        initial_state: init.facts,
        initial_abstract_task: init.task,
        goal,
        extra_sections: sections.into_remaining(),
    })
}

/// Read and parse a grounder output file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Domain> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&text)
}

/// Number of fixed-size records in a section.
fn record_count(lines: &[String], record_lines: usize, section: &str) -> Result<usize> {
    if lines.len() % record_lines != 0 {
        return Err(Error::malformed(format!(
            "section '{}' has {} lines, not a multiple of {}",
            section,
            lines.len(),
            record_lines
        )));
    }
    Ok(lines.len() / record_lines)
}

fn parse_integers(line: &str, what: &str) -> Result<Vec<i64>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| {
                Error::malformed(format!("{}: '{}' is not an integer", what, token))
            })
        })
        .collect()
}

fn to_index(value: i64, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::malformed(format!("{}: negative index {}", what, value)))
}

/// Parse a `-1` terminated list of non-negative indices.
fn parse_index_list(line: &str, what: &str) -> Result<Vec<usize>> {
    let mut values = parse_integers(line, what)?;
    if values.pop() != Some(SENTINEL) {
        return Err(Error::malformed(format!(
            "{}: line '{}' is not terminated by {}",
            what, line, SENTINEL
        )));
    }
    values.into_iter().map(|value| to_index(value, what)).collect()
}

/// Parse a line holding exactly one non-negative integer.
fn parse_single(line: &str, what: &str) -> Result<usize> {
    match parse_integers(line, what)?.as_slice() {
        [value] => to_index(*value, what),
        _ => Err(Error::malformed(format!(
            "{}: expected a single integer, got '{}'",
            what, line
        ))),
    }
}
