//! Graph density.

use crate::graph::LogicalGraph;
use crate::model::{Element, PropertyValue};
use crate::Result;

use super::{Aggregation, EdgeCount, UnaryGraphToGraphOperator, VertexCount};

/// Writes `|E| / (|V| * (|V| - 1))` to the head under `density`.
///
/// Directed semantics. Graphs with fewer than two vertices have no
/// possible edges and get density `0.0`. The head also keeps the
/// `vertexCount` and `edgeCount` values the density was computed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphDensity;

impl GraphDensity {
    pub const PROPERTY_KEY: &'static str = "density";

    pub fn density(vertex_count: i64, edge_count: i64) -> f64 {
        if vertex_count <= 1 {
            return 0.0;
        }
        let v = vertex_count as f64;
        edge_count as f64 / (v * (v - 1.0))
    }
}

impl UnaryGraphToGraphOperator for GraphDensity {
    fn execute(&self, graph: &LogicalGraph) -> Result<LogicalGraph> {
        let counted = Aggregation::default()
            .with(VertexCount)
            .with(EdgeCount)
            .execute(graph)?;

        let mut head = match counted.graph_head() {
            Some(head) => head,
            None => return Ok(counted),
        };
        let vertex_count = read_count(&head, VertexCount::PROPERTY_KEY)?;
        let edge_count = read_count(&head, EdgeCount::PROPERTY_KEY)?;
        let density = Self::density(vertex_count, edge_count);

        tracing::debug!(vertex_count, edge_count, density, "graph density");
        head.set_property(Self::PROPERTY_KEY, density);

        Ok(LogicalGraph::from_head_and_elements(
            counted.config().clone(),
            head,
            counted.vertices(),
            counted.edges(),
        ))
    }

    fn name(&self) -> &'static str {
        "GraphDensity"
    }
}

fn read_count<E: Element>(head: &E, key: &str) -> Result<i64> {
    head.property_value(key)
        .cloned()
        .unwrap_or(PropertyValue::Null)
        .get_long()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EpgmConfig;
    use crate::model::Properties;
    use crate::testing::social_network;

    fn density_of(graph: &LogicalGraph) -> f64 {
        graph
            .density()
            .unwrap()
            .graph_head()
            .unwrap()
            .property_value(GraphDensity::PROPERTY_KEY)
            .unwrap()
            .get_double()
            .unwrap()
    }

    #[test]
    fn test_formula() {
        assert_eq!(GraphDensity::density(3, 2), 2.0 / 6.0);
        assert_eq!(GraphDensity::density(2, 2), 1.0);
        assert_eq!(GraphDensity::density(1, 5), 0.0);
        assert_eq!(GraphDensity::density(0, 0), 0.0);
    }

    #[test]
    fn test_social_graph_density() {
        let s = social_network();
        let graph = LogicalGraph::from_elements(EpgmConfig::local(), s.vertices, s.edges);
        assert!((density_of(&graph) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_vertex_sentinel() {
        let s = social_network();
        let graph = LogicalGraph::from_elements(EpgmConfig::local(), vec![s.vertices[0].clone()], vec![]);
        assert_eq!(density_of(&graph), 0.0);
    }

    #[test]
    fn test_empty_graph_sentinel() {
        let graph = LogicalGraph::empty(EpgmConfig::local());
        assert_eq!(density_of(&graph), 0.0);
    }

    #[test]
    fn test_elements_pass_through() {
        let s = social_network();
        let graph = LogicalGraph::from_elements(EpgmConfig::local(), s.vertices, s.edges);
        let annotated = graph.density().unwrap();
        assert_eq!(annotated.vertices(), graph.vertices());
        assert_eq!(annotated.edges(), graph.edges());
        assert!(graph.graph_head().unwrap().properties() == &Properties::new());
    }
}
