//! Label-indexed layout.
//!
//! Each collection is stored as label → sub-collection. Partitions are
//! disjoint and together hold every element; the empty label is an
//! ordinary partition.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Edge, Element, GraphHead, Vertex};
use crate::{Error, Result};

use super::{GveLayout, Layout};

/// Label → elements carrying that label.
pub type Index<E> = BTreeMap<String, Vec<E>>;

#[derive(Debug, Clone, Default)]
pub struct IndexedGveLayout {
    graph_heads: Index<GraphHead>,
    vertices: Index<Vertex>,
    edges: Index<Edge>,
}

impl IndexedGveLayout {
    /// Index flat collections by label.
    pub fn new(graph_heads: Vec<GraphHead>, vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        let layout = Self {
            graph_heads: index_by_label(graph_heads),
            vertices: index_by_label(vertices),
            edges: index_by_label(edges),
        };
        tracing::debug!(
            graph_head_labels = layout.graph_heads.len(),
            vertex_labels = layout.vertices.len(),
            edge_labels = layout.edges.len(),
            "indexed layout built"
        );
        layout
    }

    pub fn from_gve(layout: &GveLayout) -> Self {
        Self::new(layout.graph_heads(), layout.vertices(), layout.edges())
    }

    /// Wrap collections that are already split by label.
    ///
    /// Fails with `Error::Validation` if an element sits under a label
    /// other than its own.
    pub fn from_indexed(
        graph_heads: Index<GraphHead>,
        vertices: Index<Vertex>,
        edges: Index<Edge>,
    ) -> Result<Self> {
        check_partitions(&graph_heads)?;
        check_partitions(&vertices)?;
        check_partitions(&edges)?;
        Ok(Self { graph_heads, vertices, edges })
    }

    pub fn graph_head_labels(&self) -> impl Iterator<Item = &str> {
        self.graph_heads.keys().map(String::as_str)
    }

    pub fn vertex_labels(&self) -> impl Iterator<Item = &str> {
        self.vertices.keys().map(String::as_str)
    }

    pub fn edge_labels(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Every label used by any collection.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.graph_head_labels()
            .chain(self.vertex_labels())
            .chain(self.edge_labels())
            .collect()
    }
}

fn index_by_label<E: Element>(elements: Vec<E>) -> Index<E> {
    let mut index: Index<E> = BTreeMap::new();
    for e in elements {
        index.entry(e.label().to_owned()).or_default().push(e);
    }
    index
}

fn check_partitions<E: Element>(index: &Index<E>) -> Result<()> {
    for (label, partition) in index {
        if let Some(stray) = partition.iter().find(|e| e.label() != label.as_str()) {
            return Err(Error::Validation(format!(
                "element {} with label '{}' indexed under '{label}'",
                stray.id(),
                stray.label()
            )));
        }
    }
    Ok(())
}

fn flatten<E: Clone>(index: &Index<E>) -> Vec<E> {
    index.values().flatten().cloned().collect()
}

fn partition<E: Clone>(index: &Index<E>, label: &str) -> Vec<E> {
    index.get(label).cloned().unwrap_or_default()
}

impl Layout for IndexedGveLayout {
    fn is_gve_layout(&self) -> bool {
        false
    }

    fn is_indexed_gve_layout(&self) -> bool {
        true
    }

    fn graph_heads(&self) -> Vec<GraphHead> {
        flatten(&self.graph_heads)
    }

    fn graph_heads_by_label(&self, label: &str) -> Vec<GraphHead> {
        partition(&self.graph_heads, label)
    }

    fn vertices(&self) -> Vec<Vertex> {
        flatten(&self.vertices)
    }

    fn vertices_by_label(&self, label: &str) -> Vec<Vertex> {
        partition(&self.vertices, label)
    }

    fn edges(&self) -> Vec<Edge> {
        flatten(&self.edges)
    }

    fn edges_by_label(&self, label: &str) -> Vec<Edge> {
        partition(&self.edges, label)
    }

    fn vertex_count(&self) -> usize {
        self.vertices.values().map(Vec::len).sum()
    }

    fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}
