//! Graph head: the metadata element of one logical graph.

use serde::{Deserialize, Serialize};

use super::element::impl_identity;
use super::{Element, GradoopId, Properties, PropertyValue};

/// Label and properties of a logical graph. Owns no vertex or edge lists;
/// elements point at their graphs through their graph-id sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphHead {
    id: GradoopId,
    label: String,
    properties: Properties,
}

impl GraphHead {
    pub fn new(id: GradoopId, label: impl Into<String>, properties: Properties) -> Self {
        Self { id, label: label.into(), properties }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.set(key, value);
        self
    }
}

impl Element for GraphHead {
    fn id(&self) -> GradoopId { self.id }
    fn label(&self) -> &str { &self.label }
    fn properties(&self) -> &Properties { &self.properties }
    fn properties_mut(&mut self) -> &mut Properties { &mut self.properties }
}

impl_identity!(GraphHead);
