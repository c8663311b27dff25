//! Edge (directed) in the property graph.

use serde::{Deserialize, Serialize};

use super::element::impl_identity;
use super::{Element, GradoopId, GradoopIdSet, GraphElement, Properties, PropertyValue};

/// A directed edge between two vertex ids.
///
/// Source and target are fixed at construction. They may name vertices
/// that are absent from the surrounding collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    id: GradoopId,
    label: String,
    source_id: GradoopId,
    target_id: GradoopId,
    properties: Properties,
    graph_ids: GradoopIdSet,
}

impl Edge {
    pub fn new(
        id: GradoopId,
        label: impl Into<String>,
        source_id: GradoopId,
        target_id: GradoopId,
        properties: Properties,
        graph_ids: GradoopIdSet,
    ) -> Self {
        Self { id, label: label.into(), source_id, target_id, properties, graph_ids }
    }

    pub fn source_id(&self) -> GradoopId {
        self.source_id
    }

    pub fn target_id(&self) -> GradoopId {
        self.target_id
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn in_graph(mut self, graph_id: GradoopId) -> Self {
        self.graph_ids.add(graph_id);
        self
    }

    /// The "other" end of the edge from the given vertex.
    pub fn other_end(&self, from: GradoopId) -> Option<GradoopId> {
        if from == self.source_id { Some(self.target_id) }
        else if from == self.target_id { Some(self.source_id) }
        else { None }
    }
}

impl Element for Edge {
    fn id(&self) -> GradoopId { self.id }
    fn label(&self) -> &str { &self.label }
    fn properties(&self) -> &Properties { &self.properties }
    fn properties_mut(&mut self) -> &mut Properties { &mut self.properties }
}

impl GraphElement for Edge {
    fn graph_ids(&self) -> &GradoopIdSet { &self.graph_ids }
    fn graph_ids_mut(&mut self) -> &mut GradoopIdSet { &mut self.graph_ids }
}

impl_identity!(Edge);
