//! End-to-end tests for layouts, graph collections and regrouping.

use std::collections::BTreeMap;

use epgm_rs::operators::{expand_graph_ids, graph_element_sets};
use epgm_rs::testing::{
    social_network, validate_element_collections, validate_graph_element_collections,
    validate_id_equality,
};
use epgm_rs::{
    Element, EpgmConfig, GraphCollection, GraphElement, GveLayout, IndexedGveLayout, Layout,
    LayoutKind, LocalEngine,
};
use pretty_assertions::assert_eq;

// ============================================================================
// 1. Indexed and flat layouts hold the same elements
// ============================================================================

#[test]
fn test_indexed_flat_equivalence() {
    let s = social_network();
    let flat = GveLayout::new(s.graph_heads.clone(), s.vertices.clone(), s.edges.clone());
    let indexed = IndexedGveLayout::from_gve(&flat);

    assert!(flat.is_gve_layout());
    assert!(indexed.is_indexed_gve_layout());

    let back = indexed.to_gve();
    validate_element_collections(&flat.graph_heads(), &back.graph_heads()).unwrap();
    validate_graph_element_collections(&flat.vertices(), &back.vertices()).unwrap();
    validate_graph_element_collections(&flat.edges(), &back.edges()).unwrap();
}

#[test]
fn test_label_partitions() {
    let s = social_network();
    let indexed = IndexedGveLayout::new(s.graph_heads, s.vertices, s.edges);

    let labels: Vec<&str> = indexed.labels().into_iter().collect();
    assert_eq!(labels, vec!["Club", "Community", "Forum", "Person", "memberOf", "moderates"]);

    let sizes: BTreeMap<&str, usize> = indexed
        .vertex_labels()
        .map(|l| (l, indexed.vertices_by_label(l).len()))
        .collect();
    assert_eq!(sizes, BTreeMap::from([("Forum", 1), ("Person", 2)]));
    assert_eq!(indexed.edges_by_label("memberOf").len(), 1);
    assert!(indexed.edges_by_label("knows").is_empty());
}

// ============================================================================
// 2. Regrouping by graph id
// ============================================================================

#[test]
fn test_graph_element_sets_completeness() {
    let s = social_network();
    let engine = LocalEngine;

    let pairs = expand_graph_ids(&engine, s.edges.clone());
    let memberships: usize = s.edges.iter().map(|e| e.graph_count()).sum();
    assert_eq!(pairs.len(), memberships);

    let sets = graph_element_sets(&engine, pairs);
    let graph_ids: Vec<_> = sets.iter().map(|(id, _)| *id).collect();
    validate_id_equality(graph_ids, s.graph_heads.iter().map(|h| h.id())).unwrap();
    assert_eq!(sets.iter().map(|(_, set)| set.len()).sum::<usize>(), memberships);
}

// ============================================================================
// 3. Graph collections split back into their graphs
// ============================================================================

#[test]
fn test_collection_split() {
    for kind in [LayoutKind::Gve, LayoutKind::Indexed] {
        let s = social_network();
        let collection = GraphCollection::from_elements(
            EpgmConfig::local().with_layout(kind),
            s.graph_heads.clone(),
            s.vertices.clone(),
            s.edges.clone(),
        );
        assert_eq!(collection.graph_count(), 2);

        let graphs = collection.graphs();
        let sizes: Vec<(usize, usize)> =
            graphs.iter().map(|g| (g.vertex_count(), g.edge_count())).collect();
        assert_eq!(sizes, vec![(3, 2), (2, 1)]);

        for (graph, head) in graphs.iter().zip(&s.graph_heads) {
            assert_eq!(graph.graph_head().unwrap().id(), head.id());
            assert!(graph.vertices().iter().all(|v| v.is_in_graph(&head.id())));
            assert_eq!(graph.layout().is_indexed_gve_layout(), kind == LayoutKind::Indexed);
        }
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_collection_split_on_parallel_engine() {
    let s = social_network();
    let local = GraphCollection::from_elements(
        EpgmConfig::local(),
        s.graph_heads.clone(),
        s.vertices.clone(),
        s.edges.clone(),
    );
    let parallel = GraphCollection::from_elements(
        EpgmConfig::parallel(4),
        s.graph_heads,
        s.vertices,
        s.edges,
    );
    for (a, b) in local.graphs().iter().zip(parallel.graphs().iter()) {
        validate_graph_element_collections(&a.vertices(), &b.vertices()).unwrap();
        validate_graph_element_collections(&a.edges(), &b.edges()).unwrap();
    }
}
