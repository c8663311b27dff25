//! Element construction.
//!
//! Loaders and operators build elements through an `ElementFactory`. The
//! factory owns the id generator, so there is no process-global id state.

use std::sync::Arc;

use super::{Edge, GradoopId, GradoopIdSet, GraphHead, IdGenerator, Properties, Vertex};

/// Label of graph heads that operators create on their own.
pub const DEFAULT_GRAPH_LABEL: &str = "";

/// Creates graph heads, vertices and edges.
///
/// `create_*` draws a fresh id; `init_*` takes the id from the caller
/// (used when loading existing data). Cloning shares the generator.
#[derive(Debug, Clone, Default)]
pub struct ElementFactory {
    ids: Arc<IdGenerator>,
}

impl ElementFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(ids: Arc<IdGenerator>) -> Self {
        Self { ids }
    }

    pub fn id_generator(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    pub fn new_id(&self) -> GradoopId {
        self.ids.next_id()
    }

    // ========================================================================
    // Graph heads
    // ========================================================================

    pub fn create_graph_head(&self, label: impl Into<String>, properties: Properties) -> GraphHead {
        self.init_graph_head(self.new_id(), label, properties)
    }

    pub fn init_graph_head(&self, id: GradoopId, label: impl Into<String>, properties: Properties) -> GraphHead {
        GraphHead::new(id, label, properties)
    }

    // ========================================================================
    // Vertices
    // ========================================================================

    pub fn create_vertex(&self, label: impl Into<String>, properties: Properties) -> Vertex {
        self.init_vertex(self.new_id(), label, properties, GradoopIdSet::new())
    }

    pub fn create_vertex_in(
        &self,
        label: impl Into<String>,
        properties: Properties,
        graph_ids: GradoopIdSet,
    ) -> Vertex {
        self.init_vertex(self.new_id(), label, properties, graph_ids)
    }

    pub fn init_vertex(
        &self,
        id: GradoopId,
        label: impl Into<String>,
        properties: Properties,
        graph_ids: GradoopIdSet,
    ) -> Vertex {
        Vertex::new(id, label, properties, graph_ids)
    }

    // ========================================================================
    // Edges
    // ========================================================================

    pub fn create_edge(
        &self,
        label: impl Into<String>,
        source_id: GradoopId,
        target_id: GradoopId,
        properties: Properties,
    ) -> Edge {
        self.init_edge(self.new_id(), label, source_id, target_id, properties, GradoopIdSet::new())
    }

    pub fn create_edge_in(
        &self,
        label: impl Into<String>,
        source_id: GradoopId,
        target_id: GradoopId,
        properties: Properties,
        graph_ids: GradoopIdSet,
    ) -> Edge {
        self.init_edge(self.new_id(), label, source_id, target_id, properties, graph_ids)
    }

    pub fn init_edge(
        &self,
        id: GradoopId,
        label: impl Into<String>,
        source_id: GradoopId,
        target_id: GradoopId,
        properties: Properties,
        graph_ids: GradoopIdSet,
    ) -> Edge {
        Edge::new(id, label, source_id, target_id, properties, graph_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, GraphElement};

    #[test]
    fn test_created_elements_get_fresh_ids() {
        let factory = ElementFactory::new();
        let a = factory.create_vertex("Person", Properties::new());
        let b = factory.create_vertex("Person", Properties::new());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.graph_count(), 0);
    }

    #[test]
    fn test_init_keeps_given_id() {
        let factory = ElementFactory::new();
        let id = factory.new_id();
        let e = factory.init_edge(id, "knows", id, id, Properties::new(), GradoopIdSet::new());
        assert_eq!(e.id(), id);
        assert_eq!(e.source_id(), id);
    }

    #[test]
    fn test_clones_share_the_generator() {
        let factory = ElementFactory::new();
        let clone = factory.clone();
        assert!(Arc::ptr_eq(factory.id_generator(), clone.id_generator()));
    }
}
