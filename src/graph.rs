//! # Logical graphs and graph collections
//!
//! Both are thin handles: a shared, immutable [`Layout`] plus the
//! [`EpgmConfig`] operators use to build results. Cloning is cheap.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::config::EpgmConfig;
use crate::engine::ExecutionEngine;
use crate::layout::Layout;
use crate::model::{
    Edge, Element, GradoopId, GraphElement, GraphHead, Properties, Vertex, DEFAULT_GRAPH_LABEL,
};
use crate::operators::{
    expand_graph_ids, graph_element_sets, AggregateFunction, Aggregation,
    BinaryGraphToGraphOperator, Combination, GraphDensity, UnaryGraphToGraphOperator,
};
use crate::Result;

// ============================================================================
// LogicalGraph
// ============================================================================

/// One graph head with its vertices and edges.
///
/// The head is optional only for the empty graph.
#[derive(Debug, Clone)]
pub struct LogicalGraph {
    config: EpgmConfig,
    layout: Arc<dyn Layout>,
}

impl LogicalGraph {
    pub fn from_layout(config: EpgmConfig, layout: Arc<dyn Layout>) -> Self {
        Self { config, layout }
    }

    pub fn empty(config: EpgmConfig) -> Self {
        let layout = config.layout_kind().build(Vec::new(), Vec::new(), Vec::new());
        Self { config, layout }
    }

    /// New graph over the given elements.
    ///
    /// Creates a fresh head with the default label and adds its id to the
    /// graph-id set of every vertex and edge.
    pub fn from_elements(config: EpgmConfig, vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        let head = config
            .factory()
            .create_graph_head(DEFAULT_GRAPH_LABEL, Properties::new());
        let id = head.id();
        let engine = config.engine();
        let vertices = engine.map(vertices, move |mut v| {
            v.add_to_graph(id);
            v
        });
        let edges = engine.map(edges, move |mut e| {
            e.add_to_graph(id);
            e
        });
        Self::from_head_and_elements(config, head, vertices, edges)
    }

    /// Graph over an existing head. Memberships are left as they are.
    pub fn from_head_and_elements(
        config: EpgmConfig,
        head: GraphHead,
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
    ) -> Self {
        let layout = config.layout_kind().build(vec![head], vertices, edges);
        Self { config, layout }
    }

    pub fn config(&self) -> &EpgmConfig {
        &self.config
    }

    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    pub fn graph_head(&self) -> Option<GraphHead> {
        self.layout.graph_heads().into_iter().next()
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.layout.vertices()
    }

    pub fn vertices_by_label(&self, label: &str) -> Vec<Vertex> {
        self.layout.vertices_by_label(label)
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.layout.edges()
    }

    pub fn edges_by_label(&self, label: &str) -> Vec<Edge> {
        self.layout.edges_by_label(label)
    }

    pub fn vertex_count(&self) -> usize {
        self.layout.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.layout.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0 && self.edge_count() == 0
    }

    // ========================================================================
    // Operators
    // ========================================================================

    pub fn call_for_graph<O: UnaryGraphToGraphOperator + ?Sized>(&self, operator: &O) -> Result<LogicalGraph> {
        operator.execute(self)
    }

    pub fn call_for_binary_graph<O: BinaryGraphToGraphOperator + ?Sized>(
        &self,
        operator: &O,
        other: &LogicalGraph,
    ) -> Result<LogicalGraph> {
        operator.execute(self, other)
    }

    /// Union of both graphs' vertices and edges, deduplicated by id.
    pub fn combine(&self, other: &LogicalGraph) -> Result<LogicalGraph> {
        self.call_for_binary_graph(&Combination, other)
    }

    /// Annotate a copy of the head with the graph's density.
    pub fn density(&self) -> Result<LogicalGraph> {
        self.call_for_graph(&GraphDensity)
    }

    pub fn aggregate(&self, functions: Vec<Box<dyn AggregateFunction>>) -> Result<LogicalGraph> {
        self.call_for_graph(&Aggregation::new(functions))
    }
}

// ============================================================================
// GraphCollection
// ============================================================================

/// Several graph heads sharing one vertex/edge pool.
///
/// Membership is read from each element's graph-id set.
#[derive(Debug, Clone)]
pub struct GraphCollection {
    config: EpgmConfig,
    layout: Arc<dyn Layout>,
}

impl GraphCollection {
    pub fn from_layout(config: EpgmConfig, layout: Arc<dyn Layout>) -> Self {
        Self { config, layout }
    }

    pub fn from_elements(
        config: EpgmConfig,
        graph_heads: Vec<GraphHead>,
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
    ) -> Self {
        let layout = config.layout_kind().build(graph_heads, vertices, edges);
        Self { config, layout }
    }

    pub fn config(&self) -> &EpgmConfig {
        &self.config
    }

    pub fn layout(&self) -> &Arc<dyn Layout> {
        &self.layout
    }

    pub fn graph_heads(&self) -> Vec<GraphHead> {
        self.layout.graph_heads()
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.layout.vertices()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.layout.edges()
    }

    pub fn graph_count(&self) -> usize {
        self.layout.graph_heads().len()
    }

    /// The logical graph with head `id`, or `None` if no such head exists.
    pub fn graph(&self, id: GradoopId) -> Option<LogicalGraph> {
        let head = self.graph_heads().into_iter().find(|h| h.id() == id)?;
        let engine = self.config.engine();
        let vertices = engine.filter(self.vertices(), move |v| v.is_in_graph(&id));
        let edges = engine.filter(self.edges(), move |e| e.is_in_graph(&id));
        Some(LogicalGraph::from_head_and_elements(self.config.clone(), head, vertices, edges))
    }

    /// Split the collection into one logical graph per head, in head order.
    ///
    /// Elements are regrouped by graph id in one pass. Memberships that
    /// name no head in this collection are ignored.
    pub fn graphs(&self) -> Vec<LogicalGraph> {
        let engine = self.config.engine();

        let mut vertex_sets: HashMap<GradoopId, Vec<Vertex>> = graph_element_sets(
            engine,
            expand_graph_ids(engine, self.vertices()),
        )
        .into_iter()
        .map(|(id, set)| (id, sorted_by_id(set)))
        .collect();

        let mut edge_sets: HashMap<GradoopId, Vec<Edge>> = graph_element_sets(
            engine,
            expand_graph_ids(engine, self.edges()),
        )
        .into_iter()
        .map(|(id, set)| (id, sorted_by_id(set)))
        .collect();

        let graphs: Vec<LogicalGraph> = self
            .graph_heads()
            .into_iter()
            .map(|head| {
                let vertices = vertex_sets.remove(&head.id()).unwrap_or_default();
                let edges = edge_sets.remove(&head.id()).unwrap_or_default();
                LogicalGraph::from_head_and_elements(self.config.clone(), head, vertices, edges)
            })
            .collect();

        if !vertex_sets.is_empty() || !edge_sets.is_empty() {
            tracing::debug!(
                orphan_graph_ids = vertex_sets.len() + edge_sets.len(),
                "memberships without a graph head ignored"
            );
        }
        graphs
    }
}

fn sorted_by_id<E: Element>(set: impl IntoIterator<Item = E>) -> Vec<E> {
    let mut elements: Vec<E> = set.into_iter().collect();
    elements.sort_by_key(|e| e.id());
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutKind;
    use crate::testing::{social_network, validate_element_collections};

    #[test]
    fn test_from_elements_adds_membership() {
        let s = social_network();
        let graph = LogicalGraph::from_elements(EpgmConfig::local(), s.vertices.clone(), s.edges.clone());
        let head = graph.graph_head().unwrap();
        assert_eq!(head.label(), DEFAULT_GRAPH_LABEL);
        assert!(graph.vertices().iter().all(|v| v.is_in_graph(&head.id())));
        assert!(graph.edges().iter().all(|e| e.is_in_graph(&head.id())));
        assert_eq!(graph.vertices()[0].graph_count(), s.vertices[0].graph_count() + 1);
    }

    #[test]
    fn test_empty_graph_has_no_head() {
        let graph = LogicalGraph::empty(EpgmConfig::local());
        assert!(graph.graph_head().is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_collection_graph_by_id() {
        let s = social_network();
        let collection = GraphCollection::from_elements(
            EpgmConfig::local(),
            s.graph_heads.clone(),
            s.vertices.clone(),
            s.edges.clone(),
        );
        let g1 = collection.graph(s.graph_heads[1].id()).unwrap();
        assert_eq!(g1.vertex_count(), 2);
        assert_eq!(g1.edge_count(), 1);
        assert!(collection.graph(s.factory.new_id()).is_none());
    }

    #[test]
    fn test_collection_split_matches_lookup() {
        let s = social_network();
        for kind in [LayoutKind::Gve, LayoutKind::Indexed] {
            let collection = GraphCollection::from_elements(
                EpgmConfig::local().with_layout(kind),
                s.graph_heads.clone(),
                s.vertices.clone(),
                s.edges.clone(),
            );
            let graphs = collection.graphs();
            assert_eq!(graphs.len(), 2);
            for graph in &graphs {
                let id = graph.graph_head().unwrap().id();
                let looked_up = collection.graph(id).unwrap();
                validate_element_collections(&graph.vertices(), &looked_up.vertices()).unwrap();
                validate_element_collections(&graph.edges(), &looked_up.edges()).unwrap();
            }
        }
    }

    #[test]
    fn test_head_without_elements_yields_empty_graph() {
        let s = social_network();
        let lonely = s.factory.create_graph_head("Empty", Properties::new());
        let collection = GraphCollection::from_elements(
            EpgmConfig::local(),
            vec![lonely.clone()],
            s.vertices,
            s.edges,
        );
        let graphs = collection.graphs();
        assert_eq!(graphs.len(), 1);
        assert!(graphs[0].is_empty());
        assert_eq!(graphs[0].graph_head(), Some(lonely));
    }
}
