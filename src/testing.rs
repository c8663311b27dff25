//! Fixtures and validators for tests of code built on this crate.
//!
//! Validators return `Error::Validation` describing the first mismatch
//! instead of panicking, so they work in both `#[test]` functions and
//! conformance checks.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::model::{
    Edge, Element, ElementFactory, GradoopId, GraphElement, GraphHead, Properties, PropertyValue,
    Vertex,
};
use crate::{Error, Result};

// ============================================================================
// Supported properties
// ============================================================================

/// One value of every variant under keys `key0`..`keyf`.
///
/// `key9` (map), `keya` (list) and `keyf` (set) hold every scalar
/// variant.
pub fn supported_properties() -> BTreeMap<String, PropertyValue> {
    let date = NaiveDate::from_ymd_opt(2017, 6, 21).unwrap_or_default();
    let time = NaiveTime::from_hms_nano_opt(13, 37, 42, 123_456_789).unwrap_or_default();

    let scalars: Vec<(&str, PropertyValue)> = vec![
        ("key0", PropertyValue::Null),
        ("key1", PropertyValue::Boolean(true)),
        ("key2", PropertyValue::Integer(23)),
        ("key3", PropertyValue::Long(23)),
        ("key4", PropertyValue::Float(2.3)),
        ("key5", PropertyValue::Double(2.3)),
        ("key6", PropertyValue::from("23")),
        ("key7", PropertyValue::BigDecimal(Decimal::from(23))),
        ("key8", PropertyValue::GradoopId(GradoopId::from_bytes([
            0x59, 0x4a, 0x6b, 0x2c, 0x01, 0x02, 0x03, 0x04, 0x05, 0x00, 0x00, 0x17,
        ]))),
        ("keyb", PropertyValue::Date(date)),
        ("keyc", PropertyValue::Time(time)),
        ("keyd", PropertyValue::DateTime(NaiveDateTime::new(date, time))),
        ("keye", PropertyValue::Short(23)),
    ];

    let map: BTreeMap<PropertyValue, PropertyValue> = scalars
        .iter()
        .map(|(k, v)| (PropertyValue::from(*k), v.clone()))
        .collect();
    let list: Vec<PropertyValue> = scalars.iter().map(|(_, v)| v.clone()).collect();
    let set: BTreeSet<PropertyValue> = list.iter().cloned().collect();

    let mut all: BTreeMap<String, PropertyValue> =
        scalars.into_iter().map(|(k, v)| (k.to_owned(), v)).collect();
    all.insert("key9".into(), PropertyValue::Map(map));
    all.insert("keya".into(), PropertyValue::List(list));
    all.insert("keyf".into(), PropertyValue::Set(set));
    all
}

// ============================================================================
// Social network
// ============================================================================

/// A small collection of two graphs.
///
/// ```text
/// g0:Community  { v0, v1, v2, e0, e1 }
/// g1:Club       { v1, v2, e1 }
///
/// v0:Person{name:Alice} -e0:memberOf-> v2:Forum{title:Rust}
/// v1:Person{name:Bob}   -e1:moderates-> v2
/// ```
///
/// Collections are in the order listed (`vertices[0]` is v0).
#[derive(Debug, Clone)]
pub struct SocialNetwork {
    pub factory: ElementFactory,
    pub graph_heads: Vec<GraphHead>,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

pub fn social_network() -> SocialNetwork {
    let factory = ElementFactory::new();

    let g0 = factory.create_graph_head("Community", Properties::new().with("interest", "Rust"));
    let g1 = factory.create_graph_head("Club", Properties::new().with("since", 2017i32));

    let v0 = factory
        .create_vertex("Person", Properties::new().with("name", "Alice").with("age", 31i32))
        .in_graph(g0.id());
    let v1 = factory
        .create_vertex("Person", Properties::new().with("name", "Bob").with("age", 27i32))
        .in_graph(g0.id())
        .in_graph(g1.id());
    let v2 = factory
        .create_vertex("Forum", Properties::new().with("title", "Rust"))
        .in_graph(g0.id())
        .in_graph(g1.id());

    let e0 = factory
        .create_edge("memberOf", v0.id(), v2.id(), Properties::new())
        .in_graph(g0.id());
    let e1 = factory
        .create_edge("moderates", v1.id(), v2.id(), Properties::new().with("since", 2019i32))
        .in_graph(g0.id())
        .in_graph(g1.id());

    SocialNetwork {
        factory,
        graph_heads: vec![g0, g1],
        vertices: vec![v0, v1, v2],
        edges: vec![e0, e1],
    }
}

// ============================================================================
// Validators
// ============================================================================

fn fail(message: String) -> Result<()> {
    Err(Error::Validation(message))
}

/// Both collections hold the same ids, ignoring order.
pub fn validate_id_equality(
    first: impl IntoIterator<Item = GradoopId>,
    second: impl IntoIterator<Item = GradoopId>,
) -> Result<()> {
    let mut first: Vec<GradoopId> = first.into_iter().collect();
    let mut second: Vec<GradoopId> = second.into_iter().collect();
    first.sort();
    second.sort();
    if first.len() != second.len() {
        return fail(format!("id collections of different size: {} and {}", first.len(), second.len()));
    }
    match first.iter().zip(&second).find(|(a, b)| a != b) {
        Some((a, b)) => fail(format!("id mismatch: {a} and {b}")),
        None => Ok(()),
    }
}

/// No id occurs in both collections.
pub fn validate_id_inequality(
    first: impl IntoIterator<Item = GradoopId>,
    second: impl IntoIterator<Item = GradoopId>,
) -> Result<()> {
    let first: BTreeSet<GradoopId> = first.into_iter().collect();
    match second.into_iter().find(|id| first.contains(id)) {
        Some(id) => fail(format!("id {id} in both collections")),
        None => Ok(()),
    }
}

/// Same id, same label, same properties.
pub fn validate_elements<E: Element>(first: &E, second: &E) -> Result<()> {
    if first.id() != second.id() {
        return fail(format!("id mismatch: {} and {}", first.id(), second.id()));
    }
    if first.label() != second.label() {
        return fail(format!("label mismatch on {}: '{}' and '{}'", first.id(), first.label(), second.label()));
    }
    let mut keys = first.property_keys().chain(second.property_keys()).collect::<Vec<_>>();
    keys.sort_unstable();
    keys.dedup();
    for key in keys {
        let (a, b) = (first.property_value(key), second.property_value(key));
        if a != b {
            return fail(format!("property '{key}' mismatch on {}: {a:?} and {b:?}", first.id()));
        }
    }
    Ok(())
}

/// Same graph memberships.
pub fn validate_graph_elements<E: GraphElement>(first: &E, second: &E) -> Result<()> {
    if first.graph_ids() != second.graph_ids() {
        return fail(format!(
            "graph containment mismatch on {}: {:?} and {:?}",
            first.id(),
            first.graph_ids(),
            second.graph_ids()
        ));
    }
    Ok(())
}

fn paired_by_id<'a, E: Element>(first: &'a [E], second: &'a [E]) -> Result<Vec<(&'a E, &'a E)>> {
    if first.len() != second.len() {
        return Err(Error::Validation(format!(
            "collections of different size: {} and {}",
            first.len(),
            second.len()
        )));
    }
    let mut first: Vec<&E> = first.iter().collect();
    let mut second: Vec<&E> = second.iter().collect();
    first.sort_by_key(|e| e.id());
    second.sort_by_key(|e| e.id());
    Ok(first.into_iter().zip(second).collect())
}

/// Pairwise [`validate_elements`] after sorting both sides by id.
pub fn validate_element_collections<E: Element>(first: &[E], second: &[E]) -> Result<()> {
    for (a, b) in paired_by_id(first, second)? {
        validate_elements(a, b)?;
    }
    Ok(())
}

/// Pairwise [`validate_elements`] and [`validate_graph_elements`] after
/// sorting both sides by id.
pub fn validate_graph_element_collections<E: GraphElement>(first: &[E], second: &[E]) -> Result<()> {
    for (a, b) in paired_by_id(first, second)? {
        validate_elements(a, b)?;
        validate_graph_elements(a, b)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_properties_cover_every_variant() {
        let props = supported_properties();
        assert_eq!(props.len(), 16);
        let tags: BTreeSet<u8> = props.values().map(PropertyValue::type_tag).collect();
        assert_eq!(tags, (0u8..16).collect::<BTreeSet<u8>>());
        assert_eq!(props["keya"].get_list().unwrap().len(), 13);
        assert_eq!(props["keyf"].get_set().unwrap().len(), 13);
    }

    #[test]
    fn test_social_network_shape() {
        let s = social_network();
        assert_eq!((s.graph_heads.len(), s.vertices.len(), s.edges.len()), (2, 3, 2));
        assert_eq!(s.edges[0].source_id(), s.vertices[0].id());
        assert_eq!(s.edges[1].target_id(), s.vertices[2].id());
    }

    #[test]
    fn test_id_validators() {
        let s = social_network();
        let ids: Vec<GradoopId> = s.vertices.iter().map(|v| v.id()).collect();
        let mut reversed = ids.clone();
        reversed.reverse();
        validate_id_equality(ids.clone(), reversed).unwrap();
        assert!(validate_id_equality(ids.clone(), ids[..2].to_vec()).is_err());

        let edge_ids = s.edges.iter().map(|e| e.id());
        validate_id_inequality(ids.clone(), edge_ids).unwrap();
        assert!(validate_id_inequality(ids.clone(), ids).is_err());
    }

    #[test]
    fn test_element_validators() {
        let s = social_network();
        validate_graph_element_collections(&s.vertices, &s.vertices).unwrap();

        let changed = s.vertices[0].clone().with_property("age", 32i32);
        assert!(validate_elements(&s.vertices[0], &changed).is_err());

        let moved = s.vertices[0].clone().in_graph(s.graph_heads[1].id());
        validate_elements(&s.vertices[0], &moved).unwrap();
        assert!(validate_graph_elements(&s.vertices[0], &moved).is_err());

        assert!(validate_element_collections(&s.vertices, &s.vertices[..2]).is_err());
    }
}
