//! Regrouping graph elements by graph id.

use hashbrown::HashSet;

use crate::engine::ExecutionEngine;
use crate::model::{GradoopId, GraphElement};

/// One `(graph id, element)` pair per graph the element belongs to.
///
/// Elements without any membership produce no pairs.
pub fn expand_graph_ids<X, E>(engine: &X, elements: Vec<E>) -> Vec<(GradoopId, E)>
where
    X: ExecutionEngine,
    E: GraphElement,
{
    engine.flat_map(elements, |e| {
        e.graph_ids()
            .iter()
            .map(|id| (*id, e.clone()))
            .collect::<Vec<_>>()
    })
}

/// Collect the elements paired with each graph id into one set.
///
/// Every distinct incoming graph id yields exactly one non-empty set.
/// Elements are collapsed by identity, so the same element paired twice
/// with one graph id appears once.
pub fn graph_element_sets<X, E>(engine: &X, pairs: Vec<(GradoopId, E)>) -> Vec<(GradoopId, HashSet<E>)>
where
    X: ExecutionEngine,
    E: GraphElement + Eq + std::hash::Hash,
{
    let pair_count = pairs.len();
    let sets = engine.group_reduce(
        pairs,
        |(graph_id, _)| *graph_id,
        |graph_id, group| (graph_id, group.into_iter().map(|(_, e)| e).collect::<HashSet<E>>()),
    );
    tracing::debug!(pairs = pair_count, graphs = sets.len(), "graph element sets");
    sets
}
