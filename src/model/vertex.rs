//! Vertex in the property graph.

use serde::{Deserialize, Serialize};

use super::element::impl_identity;
use super::{Element, GradoopId, GradoopIdSet, GraphElement, Properties, PropertyValue};

/// A vertex and the set of graphs it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    id: GradoopId,
    label: String,
    properties: Properties,
    graph_ids: GradoopIdSet,
}

impl Vertex {
    pub fn new(
        id: GradoopId,
        label: impl Into<String>,
        properties: Properties,
        graph_ids: GradoopIdSet,
    ) -> Self {
        Self { id, label: label.into(), properties, graph_ids }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn in_graph(mut self, graph_id: GradoopId) -> Self {
        self.graph_ids.add(graph_id);
        self
    }
}

impl Element for Vertex {
    fn id(&self) -> GradoopId { self.id }
    fn label(&self) -> &str { &self.label }
    fn properties(&self) -> &Properties { &self.properties }
    fn properties_mut(&mut self) -> &mut Properties { &mut self.properties }
}

impl GraphElement for Vertex {
    fn graph_ids(&self) -> &GradoopIdSet { &self.graph_ids }
    fn graph_ids_mut(&mut self) -> &mut GradoopIdSet { &mut self.graph_ids }
}

impl_identity!(Vertex);
