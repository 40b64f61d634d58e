//! ASCII rendering of a domain's decomposition hierarchy.

use std::collections::HashSet;

use crate::models::Domain;

const ACTION: char = '●';
const NONDETERMINISTIC: char = '◆';
const ABSTRACT: char = '○';
const METHOD: char = '◇';
const UNRESOLVED: char = '✗';

/// One line of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub symbol: char,
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(symbol: char, label: impl Into<String>) -> Self {
        Self {
            symbol,
            label: label.into(),
            children: Vec::new(),
        }
    }
}

/// Build the decomposition tree below the initial abstract task.
///
/// Abstract tasks alternate with the methods decomposing them. An abstract task is expanded
/// once; later occurrences, and tasks deeper than `max_depth`, are shown collapsed.
pub fn decomposition_tree(domain: &Domain, max_depth: usize) -> TreeNode {
    let mut expanded = HashSet::new();
    expand_task(domain, &domain.initial_abstract_task, 0, max_depth, &mut expanded)
}

fn expand_task(
    domain: &Domain,
    task: &str,
    depth: usize,
    max_depth: usize,
    expanded: &mut HashSet<String>,
) -> TreeNode {
    if let Some(action) = domain.actions.get(task) {
        return if action.is_deterministic() {
            TreeNode::leaf(ACTION, task)
        } else {
            TreeNode::leaf(
                NONDETERMINISTIC,
                format!("{} ({} outcomes)", task, action.effects.len()),
            )
        };
    }
    if !domain.is_abstract(task) {
        return TreeNode::leaf(UNRESOLVED, task);
    }
    if depth >= max_depth {
        return TreeNode::leaf(ABSTRACT, format!("{} (...)", task));
    }
    if !expanded.insert(task.to_string()) {
        return TreeNode::leaf(ABSTRACT, format!("{} (see above)", task));
    }

    let children = domain
        .methods_for(task)
        .map(|method| TreeNode {
            symbol: METHOD,
            label: method.name.clone(),
            children: method
                .subtasks
                .iter()
                .map(|subtask| expand_task(domain, subtask, depth + 1, max_depth, expanded))
                .collect(),
        })
        .collect();
    TreeNode {
        symbol: ABSTRACT,
        label: task.to_string(),
        children,
    }
}

/// Render trees as ASCII art with symbols.
///
/// Example output:
/// ```text
/// deliver[p1]
/// └── ◇ m_deliver_4
///     ├── ● load[p1]
///     ├── ◆ drive[a,b] (2 outcomes)
///     └── ○ unload_all[b]
///         └── ◇ m_unload_5
///             └── ● unload[p1]
/// ```
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut output = String::new();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last, true);
    }
    output
}

/// Render the decomposition tree of `domain`.
pub fn render_decomposition(domain: &Domain, max_depth: usize) -> String {
    render_tree(&[decomposition_tree(domain, max_depth)])
}

fn render_node(output: &mut String, node: &TreeNode, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&node.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push(node.symbol);
        output.push(' ');
        output.push_str(&node.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, EffectOutcome, Method, TaskLists};

    fn action(name: &str, outcomes: usize) -> (String, Action) {
        (
            name.to_string(),
            Action {
                name: name.to_string(),
                cost: 1,
                preconditions: vec![],
                effects: vec![EffectOutcome::default(); outcomes],
            },
        )
    }

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

    fn domain() -> Domain {
        Domain {
            tasks: TaskLists {
                primitive: vec!["load[p1]".into(), "drive[a,b]".into()],
                abstract_tasks: vec!["deliver[p1]".into(), "move[a,b]".into()],
            },
            actions: [action("load[p1]", 1), action("drive[a,b]", 2)].into(),
            methods: [
                method("m_deliver_0", "deliver[p1]", &["load[p1]", "move[a,b]", "move[a,b]"]),
                method("m_move_1", "move[a,b]", &["drive[a,b]", "fly[a,b]"]),
            ]
            .into(),
            initial_abstract_task: "deliver[p1]".into(),
            ..Domain::default()
        }
    }

    #[test]
    fn test_single_root() {
        let tree = vec![TreeNode::leaf(ABSTRACT, "deliver[p1]")];
        assert_eq!(render_tree(&tree), "deliver[p1]\n");
    }

    #[test]
    fn test_decomposition() {
        let output = render_decomposition(&domain(), 8);
        let expected = "deliver[p1]\n└── ◇ m_deliver_0\n    ├── ● load[p1]\n    ├── ○ move[a,b]\n    │   └── ◇ m_move_1\n    │       ├── ◆ drive[a,b] (2 outcomes)\n    │       └── ✗ fly[a,b]\n    └── ○ move[a,b] (see above)\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_depth_limit() {
        let output = render_decomposition(&domain(), 1);
        let expected =
            "deliver[p1]\n└── ◇ m_deliver_0\n    ├── ● load[p1]\n    ├── ○ move[a,b] (...)\n    └── ○ move[a,b] (...)\n";
        assert_eq!(output, expected);
    }
}
