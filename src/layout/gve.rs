//! Flat graph-head / vertex / edge layout.

use crate::model::{Edge, Element, GraphHead, Vertex};

use super::Layout;

#[derive(Debug, Clone, Default)]
pub struct GveLayout {
    graph_heads: Vec<GraphHead>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl GveLayout {
    pub fn new(graph_heads: Vec<GraphHead>, vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self { graph_heads, vertices, edges }
    }

    pub fn into_parts(self) -> (Vec<GraphHead>, Vec<Vertex>, Vec<Edge>) {
        (self.graph_heads, self.vertices, self.edges)
    }
}

fn with_label<E: Element>(elements: &[E], label: &str) -> Vec<E> {
    elements.iter().filter(|e| e.label() == label).cloned().collect()
}

impl Layout for GveLayout {
    fn is_gve_layout(&self) -> bool {
        true
    }

    fn is_indexed_gve_layout(&self) -> bool {
        false
    }

    fn graph_heads(&self) -> Vec<GraphHead> {
        self.graph_heads.clone()
    }

    fn graph_heads_by_label(&self, label: &str) -> Vec<GraphHead> {
        with_label(&self.graph_heads, label)
    }

    fn vertices(&self) -> Vec<Vertex> {
        self.vertices.clone()
    }

    fn vertices_by_label(&self, label: &str) -> Vec<Vertex> {
        with_label(&self.vertices, label)
    }

    fn edges(&self) -> Vec<Edge> {
        self.edges.clone()
    }

    fn edges_by_label(&self, label: &str) -> Vec<Edge> {
        with_label(&self.edges, label)
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn to_gve(&self) -> GveLayout {
        self.clone()
    }
}
