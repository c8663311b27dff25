//! Behaviour shared by graph heads, vertices and edges.

use std::fmt;

use super::{GradoopId, GradoopIdSet, Properties, PropertyValue};

/// An identified, labelled, property-bearing entity.
///
/// `PartialEq`/`Hash` on implementors compare identifiers only: two
/// elements are the same element iff their ids match. Use
/// [`Element::content_eq`] to compare label and properties as well.
pub trait Element: Clone + fmt::Debug + Send + Sync {
    fn id(&self) -> GradoopId;

    fn label(&self) -> &str;

    fn properties(&self) -> &Properties;

    fn properties_mut(&mut self) -> &mut Properties;

    /// Property keys in key order.
    fn property_keys(&self) -> impl Iterator<Item = &str> {
        self.properties().keys()
    }

    /// The stored value, or `None` if the key is absent.
    fn property_value(&self, key: &str) -> Option<&PropertyValue> {
        self.properties().get(key)
    }

    /// Upsert a property.
    fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties_mut().set(key, value);
    }

    fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties_mut().remove(key)
    }

    fn has_property(&self, key: &str) -> bool {
        self.properties().contains_key(key)
    }

    fn property_count(&self) -> usize {
        self.properties().len()
    }

    /// Same id, same label, same properties.
    fn content_eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.label() == other.label() && self.properties() == other.properties()
    }
}

/// An element that can be a member of logical graphs.
///
/// Membership is stored on the element, never on the graph head.
pub trait GraphElement: Element {
    fn graph_ids(&self) -> &GradoopIdSet;

    fn graph_ids_mut(&mut self) -> &mut GradoopIdSet;

    /// Idempotent.
    fn add_to_graph(&mut self, graph_id: GradoopId) {
        self.graph_ids_mut().add(graph_id);
    }

    fn remove_from_graph(&mut self, graph_id: &GradoopId) {
        self.graph_ids_mut().remove(graph_id);
    }

    fn reset_graph_ids(&mut self) {
        self.graph_ids_mut().clear();
    }

    fn graph_count(&self) -> usize {
        self.graph_ids().len()
    }

    fn is_in_graph(&self, graph_id: &GradoopId) -> bool {
        self.graph_ids().contains(graph_id)
    }
}

/// Identity by id for an element type.
macro_rules! impl_identity {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    };
}

pub(crate) use impl_identity;
