//! Dependency ordering of nodes.

use std::collections::HashMap;

use crate::domain::Node;
use crate::error::TemplateError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Sort nodes so that every node's dependencies precede it.
///
/// `nodes` pairs each node with the names it depends on. The sort is a
/// depth-first walk in input order, so unrelated nodes keep their declared
/// relative order.
///
/// # Errors
///
/// Returns [`TemplateError::MissingDependency`] when a dependency names no
/// node, and [`TemplateError::CircularDependency`] when the graph has a cycle.
pub fn deploy_order(nodes: Vec<(Node, Vec<String>)>) -> Result<Vec<Node>, TemplateError> {
    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, (node, _))| (node.name().to_string(), i))
        .collect();

    for (node, deps) in &nodes {
        if let Some(missing) = deps.iter().find(|dep| !index.contains_key(dep.as_str())) {
            return Err(TemplateError::MissingDependency {
                node: node.name().to_string(),
                dependency: missing.clone(),
            });
        }
    }

    let mut marks: Vec<Option<Mark>> = vec![None; nodes.len()];
    let mut sorted = Vec::with_capacity(nodes.len());

    fn visit(
        i: usize,
        nodes: &[(Node, Vec<String>)],
        index: &HashMap<String, usize>,
        marks: &mut [Option<Mark>],
        sorted: &mut Vec<usize>,
    ) -> Result<(), TemplateError> {
        match marks[i] {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(TemplateError::CircularDependency {
                    node: nodes[i].0.name().to_string(),
                })
            }
            None => {}
        }

        marks[i] = Some(Mark::Visiting);
        for dep in &nodes[i].1 {
            visit(index[dep.as_str()], nodes, index, marks, sorted)?;
        }
        marks[i] = Some(Mark::Done);
        sorted.push(i);
        Ok(())
    }

    for i in 0..nodes.len() {
        visit(i, &nodes, &index, &mut marks, &mut sorted)?;
    }

    let mut slots: Vec<Option<Node>> = nodes.into_iter().map(|(node, _)| Some(node)).collect();
    Ok(sorted
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}
