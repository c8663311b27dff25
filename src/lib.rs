//! # epgm-rs: Extended Property Graph Model
//!
//! Graphs whose heads, vertices and edges all carry a label and an open
//! map of typed properties, where one vertex or edge may belong to many
//! logical graphs at once (graph collections).
//!
//! ## Design Principles
//!
//! 1. **Closed value type**: `PropertyValue` is a sum type with one canonical
//!    binary encoding. Every operator and every transport respects it.
//! 2. **Inverted membership**: vertices and edges store the ids of the graphs
//!    they belong to. Graph heads never own element lists.
//! 3. **Pure operators**: Combination, GraphDensity, regrouping and indexing
//!    are side-effect-free functions from layouts to layouts.
//! 4. **Engine-agnostic**: bulk primitives (map, group, distinct, join) live
//!    behind `ExecutionEngine`, so the same operator runs locally or on a
//!    partitioned pool.
//!
//! ## Quick Start
//!
//! ```rust
//! use epgm_rs::{Element, EpgmConfig, LogicalGraph, Properties};
//!
//! # fn example() -> epgm_rs::Result<()> {
//! let config = EpgmConfig::local();
//! let factory = config.factory();
//!
//! let alice = factory.create_vertex("Person", Properties::new());
//! let bob = factory.create_vertex("Person", Properties::new());
//! let knows = factory.create_edge("knows", alice.id(), bob.id(), Properties::new());
//!
//! let graph = LogicalGraph::from_elements(config, vec![alice, bob], vec![knows]);
//! let annotated = graph.density()?;
//! assert!(annotated.graph_head().is_some());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Execution Engines
//!
//! | Engine | Feature | Description |
//! |--------|---------|-------------|
//! | Local | (always) | Sequential reference engine |
//! | Parallel | `parallel` | rayon-backed, hash-partitioned shuffles |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod engine;
pub mod layout;
pub mod graph;
pub mod operators;
pub mod config;
pub mod testing;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    GradoopId, GradoopIdSet, IdGenerator,
    PropertyValue, Properties,
    Element, GraphElement, GraphHead, Vertex, Edge,
    ElementFactory,
};

// ============================================================================
// Re-exports: Graphs, layouts, engines
// ============================================================================

pub use graph::{LogicalGraph, GraphCollection};
pub use layout::{Layout, GveLayout, IndexedGveLayout, LayoutKind};
pub use engine::{ExecutionEngine, Engine, LocalEngine};
#[cfg(feature = "parallel")]
pub use engine::ParallelEngine;
pub use config::{EpgmConfig, EngineConfig};

// ============================================================================
// Re-exports: Operators
// ============================================================================

pub use operators::{
    UnaryGraphToGraphOperator, BinaryGraphToGraphOperator,
    Combination, GraphDensity, Aggregation, AggregateFunction,
    VertexCount, EdgeCount,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported property type: {0}")]
    UnsupportedType(String),

    #[error("Malformed encoding at byte {offset}: {message}")]
    MalformedEncoding { offset: usize, message: String },

    #[error("Type error: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Error::MalformedEncoding { offset, message: message.into() }
    }

    pub(crate) fn type_mismatch(expected: &str, got: &str) -> Self {
        Error::TypeMismatch { expected: expected.into(), got: got.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
