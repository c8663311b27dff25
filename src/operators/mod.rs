//! # Graph algebra
//!
//! Operators are pure: they read their input graphs and build new ones,
//! running every bulk step on the input's `ExecutionEngine`.
//!
//! | Operator | Kind | Result |
//! |----------|------|--------|
//! | `Combination` | binary | union of both graphs, deduplicated by id |
//! | `Aggregation` | unary | head annotated with aggregate values |
//! | `GraphDensity` | unary | head annotated with `density` |

pub mod aggregation;
pub mod combination;
pub mod density;
pub mod grouping;

use crate::graph::LogicalGraph;
use crate::Result;

pub use aggregation::{AggregateFunction, Aggregation, EdgeCount, VertexCount};
pub use combination::Combination;
pub use density::GraphDensity;
pub use grouping::{expand_graph_ids, graph_element_sets};

/// Logical graph → logical graph.
pub trait UnaryGraphToGraphOperator {
    fn execute(&self, graph: &LogicalGraph) -> Result<LogicalGraph>;

    fn name(&self) -> &'static str;
}

/// (logical graph, logical graph) → logical graph.
pub trait BinaryGraphToGraphOperator {
    fn execute(&self, first: &LogicalGraph, second: &LogicalGraph) -> Result<LogicalGraph>;

    fn name(&self) -> &'static str;
}
