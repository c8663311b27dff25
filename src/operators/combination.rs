//! Combination: union of two graphs.

use crate::engine::ExecutionEngine;
use crate::graph::LogicalGraph;
use crate::model::Element;
use crate::Result;

use super::BinaryGraphToGraphOperator;

/// Union of the vertex and edge sets of two graphs, deduplicated by id.
///
/// The result gets a fresh graph head, which every surviving element
/// joins. When both inputs hold an element with the same id, exactly one
/// copy survives; which one is up to the engine (`LocalEngine` keeps the
/// first graph's copy). Dangling edges are kept as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Combination;

impl BinaryGraphToGraphOperator for Combination {
    fn execute(&self, first: &LogicalGraph, second: &LogicalGraph) -> Result<LogicalGraph> {
        let config = first.config();
        let engine = config.engine();

        let vertices = engine.distinct_by(engine.union(first.vertices(), second.vertices()), |v| v.id());
        let edges = engine.distinct_by(engine.union(first.edges(), second.edges()), |e| e.id());

        tracing::debug!(
            first_vertices = first.vertex_count(),
            second_vertices = second.vertex_count(),
            vertices = vertices.len(),
            edges = edges.len(),
            "combination"
        );

        Ok(LogicalGraph::from_elements(config.clone(), vertices, edges))
    }

    fn name(&self) -> &'static str {
        "Combination"
    }
}
