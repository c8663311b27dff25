//! # Configuration
//!
//! Every graph and graph collection carries an [`EpgmConfig`]: the
//! element factory that creates new ids, the engine operators run on, and
//! the layout results are built in.
//!
//! ```json
//! { "engine": { "kind": "parallel", "partitions": 8 }, "layout": "indexed" }
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, ExecutionEngine, LocalEngine};
use crate::layout::LayoutKind;
use crate::model::ElementFactory;
use crate::{Error, Result};

// ============================================================================
// Engine configuration
// ============================================================================

/// Which execution engine to run on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineConfig {
    /// Sequential, on the calling thread.
    #[default]
    Local,

    /// rayon pool with `partitions` shuffle buckets.
    Parallel { partitions: usize },
}

impl EngineConfig {
    pub fn build(&self) -> Result<Engine> {
        match self {
            EngineConfig::Local => Ok(Engine::Local(LocalEngine)),
            EngineConfig::Parallel { partitions: 0 } => {
                Err(Error::Config("parallel engine needs at least one partition".into()))
            }
            #[cfg(feature = "parallel")]
            EngineConfig::Parallel { partitions } => {
                Ok(Engine::Parallel(crate::engine::ParallelEngine::new(*partitions)))
            }
            #[cfg(not(feature = "parallel"))]
            EngineConfig::Parallel { .. } => {
                Err(Error::Config("built without the `parallel` feature".into()))
            }
        }
    }
}

/// Serialized form of [`EpgmConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    engine: EngineConfig,
    layout: LayoutKind,
}

// ============================================================================
// EpgmConfig
// ============================================================================

#[derive(Debug, Clone)]
pub struct EpgmConfig {
    factory: ElementFactory,
    engine: Engine,
    layout: LayoutKind,
}

impl EpgmConfig {
    pub fn new(factory: ElementFactory, engine: Engine, layout: LayoutKind) -> Self {
        Self { factory, engine, layout }
    }

    /// Sequential engine, flat layout.
    pub fn local() -> Self {
        Self::new(ElementFactory::new(), Engine::Local(LocalEngine), LayoutKind::Gve)
    }

    #[cfg(feature = "parallel")]
    pub fn parallel(partitions: usize) -> Self {
        Self::new(
            ElementFactory::new(),
            Engine::Parallel(crate::engine::ParallelEngine::new(partitions)),
            LayoutKind::Gve,
        )
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let engine = file.engine.build()?;
        tracing::debug!(engine = engine.name(), layout = ?file.layout, "configuration loaded");
        Ok(Self::new(ElementFactory::new(), engine, file.layout))
    }

    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_factory(mut self, factory: ElementFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn factory(&self) -> &ElementFactory {
        &self.factory
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn layout_kind(&self) -> LayoutKind {
        self.layout
    }
}

impl Default for EpgmConfig {
    fn default() -> Self {
        Self::local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EpgmConfig::from_json("{}").unwrap();
        assert_eq!(config.engine().name(), "local");
        assert_eq!(config.layout_kind(), LayoutKind::Gve);
    }

    #[test]
    fn test_indexed_layout() {
        let config = EpgmConfig::from_json(r#"{ "layout": "indexed" }"#).unwrap();
        assert_eq!(config.layout_kind(), LayoutKind::Indexed);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_engine() {
        let config =
            EpgmConfig::from_json(r#"{ "engine": { "kind": "parallel", "partitions": 4 } }"#).unwrap();
        assert_eq!(config.engine().name(), "parallel");
    }

    #[test]
    fn test_zero_partitions_rejected() {
        let err = EpgmConfig::from_json(r#"{ "engine": { "kind": "parallel", "partitions": 0 } }"#);
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(EpgmConfig::from_json("{ nope"), Err(Error::Json(_))));
        assert!(matches!(EpgmConfig::from_json(r#"{ "layout": "graph" }"#), Err(Error::Json(_))));
        assert!(matches!(EpgmConfig::from_json(r#"{ "colour": 1 }"#), Err(Error::Json(_))));
    }

    #[test]
    fn test_engine_config_round_trip() {
        let json = serde_json::to_string(&EngineConfig::Parallel { partitions: 2 }).unwrap();
        assert_eq!(json, r#"{"kind":"parallel","partitions":2}"#);
    }
}
