//! # Extended Property Graph Model
//!
//! The data types every operator consumes and produces: identifiers,
//! property values with their binary encoding, and the element hierarchy
//! (graph head, vertex, edge).
//!
//! Design rule: pure data. No engine, no layout, no I/O.

pub mod id;
pub mod value;
pub mod encoding;
pub mod properties;
pub mod element;
pub mod graph_head;
pub mod vertex;
pub mod edge;
pub mod factory;

pub use id::{GradoopId, GradoopIdSet, IdGenerator};
pub use value::PropertyValue;
pub use properties::Properties;
pub use element::{Element, GraphElement};
pub use graph_head::GraphHead;
pub use vertex::Vertex;
pub use edge::Edge;
pub use factory::{ElementFactory, DEFAULT_GRAPH_LABEL};
