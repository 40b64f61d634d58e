use std::collections::BTreeMap;

use super::{parse_index_list, parse_single, TaskTable, METHOD_RECORD_LINES};
use crate::error::{Error, Result};
use crate::models::Method;

/// Build one method per four-line record: name, task index, subtask indices, ordering pairs.
///
/// Grounded method names repeat across records, so the record number is appended to each.
pub fn build_methods(lines: &[String], tasks: &TaskTable) -> Result<BTreeMap<String, Method>> {
    let mut methods = BTreeMap::new();
    for (i, record) in lines.chunks(METHOD_RECORD_LINES).enumerate() {
        let [name, task, subtasks, orderings] = record else {
            return Err(Error::malformed(format!(
                "method record {} has {} lines",
                i,
                record.len()
            )));
        };

        let name = format!("{}_{}", name.trim(), i);
        let subtasks = tasks.names(&parse_index_list(subtasks, "method subtasks")?)?;
        let orderings = parse_orderings(orderings, subtasks.len(), &name)?;
        let method = Method {
            name: name.clone(),
            task: tasks.name(parse_single(task, "method task")?)?.to_string(),
            subtasks,
            orderings,
        };
        methods.insert(name, method);
    }
    Ok(methods)
}

/// Read `(predecessor, successor)` position pairs and check them against the subtask count.
fn parse_orderings(line: &str, subtask_count: usize, method: &str) -> Result<Vec<(usize, usize)>> {
    let positions = parse_index_list(line, "method orderings")?;
    if positions.len() % 2 != 0 {
        return Err(Error::malformed(format!(
            "method '{}' has an odd number of ordering positions ({})",
            method,
            positions.len()
        )));
    }
    if let Some(position) = positions.iter().find(|&&p| p >= subtask_count) {
        return Err(Error::malformed(format!(
            "method '{}' orders position {} but has {} subtasks",
            method, position, subtask_count
        )));
    }
    Ok(positions
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> TaskTable {
        TaskTable::from_lines(
            ["0 drive[a,b]", "0 walk[b,c]", "1 travel[a,c]"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            2,
        )
        .unwrap()
    }

    fn record(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builds_partial_order() {
        let methods = build_methods(
            &record(&["m_travel[a,c]", "2", "0 1 -1", "0 1 -1"]),
            &tasks(),
        )
        .unwrap();
        let method = &methods["m_travel[a,c]_0"];
        assert_eq!(method.task, "travel[a,c]");
        assert_eq!(method.subtasks, vec!["drive[a,b]", "walk[b,c]"]);
        assert_eq!(method.orderings, vec![(0, 1)]);
    }

    #[test]
    fn test_same_name_records_stay_distinct() {
        let methods = build_methods(
            &record(&[
                "m_travel", "2", "0 -1", "-1", //
                "m_travel", "2", "1 -1", "-1",
            ]),
            &tasks(),
        )
        .unwrap();
        assert_eq!(methods.len(), 2);
        assert!(methods.contains_key("m_travel_0"));
        assert!(methods.contains_key("m_travel_1"));
    }

    #[test]
    fn test_odd_ordering_line() {
        let result = build_methods(&record(&["m", "2", "0 1 -1", "0 1 0 -1"]), &tasks());
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_ordering_outside_subtasks() {
        let result = build_methods(&record(&["m", "2", "0 -1", "0 1 -1"]), &tasks());
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_task_index_out_of_range() {
        let result = build_methods(&record(&["m", "2", "0 5 -1", "-1"]), &tasks());
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }
}
