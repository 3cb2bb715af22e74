//! Validation of the task list and its prerequisite graph.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use super::error::CompileError;
use crate::task::Task;

/// Checks every task on its own and the prerequisite relation as a whole.
///
/// Prerequisites are edges `prerequisite → dependent` of a DAG; an edge that
/// would close a cycle (including a task listing itself) is rejected.
///
/// # Errors
///
/// The first structural problem found, in task order.
pub(crate) fn check_tasks(tasks: &[Task]) -> Result<(), CompileError> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut node_by_name: HashMap<&str, NodeIndex> = HashMap::new();

    for task in tasks {
        let name = task.name();
        if name.is_empty() {
            return Err(CompileError::EmptyTaskName);
        }
        if task.span() == 0 {
            return Err(CompileError::ZeroSpan(name.to_owned()));
        }
        if task.limit() == 0 {
            return Err(CompileError::ZeroLimit(name.to_owned()));
        }
        if node_by_name.contains_key(name) {
            return Err(CompileError::DuplicateTask(name.to_owned()));
        }
        let node = graph.add_node(name);
        node_by_name.insert(name, node);
    }

    for task in tasks {
        let to = node_by_name[task.name()];
        for prerequisite in task.prerequisites() {
            let from = *node_by_name.get(prerequisite.as_str()).ok_or_else(|| {
                CompileError::UnknownPrerequisite {
                    task: task.name().to_owned(),
                    prerequisite: prerequisite.clone(),
                }
            })?;

            // Edge from→to closes a cycle iff to already reaches from.
            if has_path_connecting(&graph, to, from, None) {
                return Err(CompileError::CyclicPrerequisites(task.name().to_owned()));
            }
            graph.update_edge(from, to, ());
        }
    }

    Ok(())
}
