//! Aggregation: compute values over a graph's elements and store them on
//! a copy of its head.

use std::fmt;

use crate::engine::ExecutionEngine;
use crate::graph::LogicalGraph;
use crate::model::{Edge, Element, Properties, PropertyValue, Vertex, DEFAULT_GRAPH_LABEL};
use crate::Result;

use super::UnaryGraphToGraphOperator;

/// A fold over vertices and/or edges.
///
/// Each element contributes an optional increment; increments are merged
/// pairwise with `combine`. A graph with no increments gets
/// `default_value`.
pub trait AggregateFunction: fmt::Debug + Send + Sync {
    /// Head property the result is written to.
    fn aggregate_property_key(&self) -> &str;

    fn vertex_increment(&self, _vertex: &Vertex) -> Option<PropertyValue> {
        None
    }

    fn edge_increment(&self, _edge: &Edge) -> Option<PropertyValue> {
        None
    }

    fn combine(&self, left: PropertyValue, right: PropertyValue) -> Result<PropertyValue>;

    fn default_value(&self) -> PropertyValue;
}

fn add_longs(left: PropertyValue, right: PropertyValue) -> Result<PropertyValue> {
    Ok(PropertyValue::Long(left.get_long()? + right.get_long()?))
}

/// Number of vertices, as a Long under `vertexCount`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexCount;

impl VertexCount {
    pub const PROPERTY_KEY: &'static str = "vertexCount";
}

impl AggregateFunction for VertexCount {
    fn aggregate_property_key(&self) -> &str {
        Self::PROPERTY_KEY
    }

    fn vertex_increment(&self, _vertex: &Vertex) -> Option<PropertyValue> {
        Some(PropertyValue::Long(1))
    }

    fn combine(&self, left: PropertyValue, right: PropertyValue) -> Result<PropertyValue> {
        add_longs(left, right)
    }

    fn default_value(&self) -> PropertyValue {
        PropertyValue::Long(0)
    }
}

/// Number of edges, as a Long under `edgeCount`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCount;

impl EdgeCount {
    pub const PROPERTY_KEY: &'static str = "edgeCount";
}

impl AggregateFunction for EdgeCount {
    fn aggregate_property_key(&self) -> &str {
        Self::PROPERTY_KEY
    }

    fn edge_increment(&self, _edge: &Edge) -> Option<PropertyValue> {
        Some(PropertyValue::Long(1))
    }

    fn combine(&self, left: PropertyValue, right: PropertyValue) -> Result<PropertyValue> {
        add_longs(left, right)
    }

    fn default_value(&self) -> PropertyValue {
        PropertyValue::Long(0)
    }
}

// ============================================================================
// Operator
// ============================================================================

/// Runs a list of aggregate functions and writes each result to a copy of
/// the graph head. Vertices and edges pass through unchanged.
///
/// A graph without a head (the empty graph) gets a fresh one.
#[derive(Debug, Default)]
pub struct Aggregation {
    functions: Vec<Box<dyn AggregateFunction>>,
}

impl Aggregation {
    pub fn new(functions: Vec<Box<dyn AggregateFunction>>) -> Self {
        Self { functions }
    }

    pub fn with(mut self, function: impl AggregateFunction + 'static) -> Self {
        self.functions.push(Box::new(function));
        self
    }

    fn evaluate<X: ExecutionEngine>(
        &self,
        engine: &X,
        function: &dyn AggregateFunction,
        vertices: &[Vertex],
        edges: &[Edge],
    ) -> Result<PropertyValue> {
        let mut increments: Vec<PropertyValue> =
            engine.flat_map(vertices.to_vec(), |v| function.vertex_increment(&v));
        increments.extend(engine.flat_map(edges.to_vec(), |e| function.edge_increment(&e)));

        let mut values = increments.into_iter();
        let Some(first) = values.next() else {
            return Ok(function.default_value());
        };
        values.try_fold(first, |acc, next| function.combine(acc, next))
    }
}

impl UnaryGraphToGraphOperator for Aggregation {
    fn execute(&self, graph: &LogicalGraph) -> Result<LogicalGraph> {
        let config = graph.config();
        let vertices = graph.vertices();
        let edges = graph.edges();

        let mut head = match graph.graph_head() {
            Some(head) => head,
            None => config.factory().create_graph_head(DEFAULT_GRAPH_LABEL, Properties::new()),
        };

        for function in &self.functions {
            let value = self.evaluate(config.engine(), function.as_ref(), &vertices, &edges)?;
            tracing::debug!(key = function.aggregate_property_key(), %value, "aggregated");
            head.set_property(function.aggregate_property_key(), value);
        }

        Ok(LogicalGraph::from_head_and_elements(config.clone(), head, vertices, edges))
    }

    fn name(&self) -> &'static str {
        "Aggregation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EpgmConfig;
    use crate::testing::social_network;
    use crate::Error;

    #[test]
    fn test_counts_written_to_head_copy() {
        let s = social_network();
        let graph = LogicalGraph::from_elements(EpgmConfig::local(), s.vertices, s.edges);
        let before = graph.graph_head().unwrap();

        let aggregated = graph
            .call_for_graph(&Aggregation::default().with(VertexCount).with(EdgeCount))
            .unwrap();
        let head = aggregated.graph_head().unwrap();

        assert_eq!(head.id(), before.id());
        assert_eq!(head.property_value("vertexCount"), Some(&PropertyValue::Long(3)));
        assert_eq!(head.property_value("edgeCount"), Some(&PropertyValue::Long(2)));
        assert!(before.property_value("vertexCount").is_none());
        assert_eq!(aggregated.vertex_count(), 3);
    }

    #[test]
    fn test_empty_graph_gets_defaults() {
        let graph = LogicalGraph::empty(EpgmConfig::local());
        let aggregated = graph
            .aggregate(vec![Box::new(VertexCount), Box::new(EdgeCount)])
            .unwrap();
        let head = aggregated.graph_head().unwrap();
        assert_eq!(head.property_value("vertexCount"), Some(&PropertyValue::Long(0)));
        assert_eq!(head.property_value("edgeCount"), Some(&PropertyValue::Long(0)));
    }

    #[derive(Debug)]
    struct BrokenSum;

    impl AggregateFunction for BrokenSum {
        fn aggregate_property_key(&self) -> &str {
            "broken"
        }

        fn vertex_increment(&self, vertex: &Vertex) -> Option<PropertyValue> {
            Some(PropertyValue::from(vertex.label()))
        }

        fn combine(&self, left: PropertyValue, right: PropertyValue) -> Result<PropertyValue> {
            add_longs(left, right)
        }

        fn default_value(&self) -> PropertyValue {
            PropertyValue::Long(0)
        }
    }

    #[test]
    fn test_combine_errors_propagate() {
        let s = social_network();
        let graph = LogicalGraph::from_elements(EpgmConfig::local(), s.vertices, vec![]);
        let err = graph.aggregate(vec![Box::new(BrokenSum)]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
