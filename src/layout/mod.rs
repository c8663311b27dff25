//! # Layouts
//!
//! A layout bundles the three collections a graph or graph collection is
//! made of: graph heads, vertices and edges.
//!
//! | Layout | Module | Description |
//! |--------|--------|-------------|
//! | `GveLayout` | `gve` | Three flat collections |
//! | `IndexedGveLayout` | `indexed` | Each collection split by label |
//!
//! Both are interchangeable to every operator: indexing only changes how
//! `*_by_label` lookups are served, never what a layout contains.

pub mod gve;
pub mod indexed;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{Edge, GraphHead, Vertex};

pub use gve::GveLayout;
pub use indexed::IndexedGveLayout;

/// Read access to the collections of a graph or graph collection.
///
/// Accessors hand out owned collections, ready to feed into an
/// `ExecutionEngine`.
pub trait Layout: fmt::Debug + Send + Sync {
    fn is_gve_layout(&self) -> bool;

    fn is_indexed_gve_layout(&self) -> bool;

    fn graph_heads(&self) -> Vec<GraphHead>;

    fn graph_heads_by_label(&self, label: &str) -> Vec<GraphHead>;

    fn vertices(&self) -> Vec<Vertex>;

    fn vertices_by_label(&self, label: &str) -> Vec<Vertex>;

    fn edges(&self) -> Vec<Edge>;

    fn edges_by_label(&self, label: &str) -> Vec<Edge>;

    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Flat copy of this layout.
    fn to_gve(&self) -> GveLayout {
        GveLayout::new(self.graph_heads(), self.vertices(), self.edges())
    }
}

/// Which layout operators build their results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Gve,
    Indexed,
}

impl LayoutKind {
    pub fn build(
        self,
        graph_heads: Vec<GraphHead>,
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
    ) -> Arc<dyn Layout> {
        match self {
            LayoutKind::Gve => Arc::new(GveLayout::new(graph_heads, vertices, edges)),
            LayoutKind::Indexed => Arc::new(IndexedGveLayout::new(graph_heads, vertices, edges)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;
    use crate::testing::social_network;
    use hashbrown::HashMap;
    use pretty_assertions::assert_eq;

    fn by_id<E: Element>(elements: Vec<E>) -> HashMap<crate::GradoopId, E> {
        elements.into_iter().map(|e| (e.id(), e)).collect()
    }

    #[test]
    fn test_layout_kinds_report_themselves() {
        let s = social_network();
        let flat = LayoutKind::Gve.build(s.graph_heads.clone(), s.vertices.clone(), s.edges.clone());
        let indexed = LayoutKind::Indexed.build(s.graph_heads, s.vertices, s.edges);
        assert!(flat.is_gve_layout() && !flat.is_indexed_gve_layout());
        assert!(indexed.is_indexed_gve_layout() && !indexed.is_gve_layout());
    }

    #[test]
    fn test_layout_kinds_are_interchangeable() {
        let s = social_network();
        let flat = LayoutKind::Gve.build(s.graph_heads.clone(), s.vertices.clone(), s.edges.clone());
        let indexed = LayoutKind::Indexed.build(s.graph_heads, s.vertices, s.edges);

        assert_eq!(flat.vertex_count(), indexed.vertex_count());
        assert_eq!(flat.edge_count(), indexed.edge_count());
        for label in ["Person", "Forum", "Community", "memberOf", "missing"] {
            assert_eq!(
                by_id(flat.vertices_by_label(label)).len(),
                by_id(indexed.vertices_by_label(label)).len(),
                "label {label}"
            );
            assert_eq!(flat.edges_by_label(label).len(), indexed.edges_by_label(label).len());
            assert_eq!(flat.graph_heads_by_label(label).len(), indexed.graph_heads_by_label(label).len());
        }
    }

    #[test]
    fn test_layout_kind_from_json() {
        let kind: LayoutKind = serde_json::from_str("\"indexed\"").unwrap();
        assert_eq!(kind, LayoutKind::Indexed);
        assert_eq!(LayoutKind::default(), LayoutKind::Gve);
    }
}
