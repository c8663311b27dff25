//! # Execution Engine Trait
//!
//! The dataflow primitives every graph operator is written against.
//! Operators never loop over collections themselves; they describe the
//! work as map / distinct / group / join steps and let the engine run it.
//!
//! ## Implementations
//!
//! | Engine | Module | Description |
//! |--------|--------|-------------|
//! | `LocalEngine` | `local` | Sequential, first-seen order |
//! | `ParallelEngine` | `parallel` | rayon, hash-partitioned shuffles |
//!
//! Every primitive is deterministic: running it twice on the same input
//! yields the same output, so callers may re-execute freely.

pub mod local;
#[cfg(feature = "parallel")]
pub mod parallel;

use std::fmt;
use std::hash::Hash;

pub use local::LocalEngine;
#[cfg(feature = "parallel")]
pub use parallel::ParallelEngine;

/// Bulk collection primitives.
///
/// Collections are owned `Vec`s. Closures must be `Sync` so an engine may
/// call them from several threads at once.
pub trait ExecutionEngine: fmt::Debug + Send + Sync {
    /// Engine name for logging.
    fn name(&self) -> &'static str;

    /// Apply `f` to every record.
    fn map<T, U, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Send + Sync;

    /// Apply `f` to every record and flatten the results.
    fn flat_map<T, U, I, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync;

    /// Keep the records matching `predicate`.
    fn filter<T, F>(&self, input: Vec<T>, predicate: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&T) -> bool + Send + Sync;

    /// Bag union. No deduplication.
    fn union<T: Send>(&self, mut left: Vec<T>, right: Vec<T>) -> Vec<T> {
        left.extend(right);
        left
    }

    /// Keep exactly one record per key.
    ///
    /// Which of several records sharing a key survives is engine-defined.
    fn distinct_by<T, K, F>(&self, input: Vec<T>, key: F) -> Vec<T>
    where
        T: Send,
        K: Hash + Eq + Send,
        F: Fn(&T) -> K + Send + Sync;

    /// Group records by key and reduce each group with one call.
    ///
    /// Every record of a key reaches the same `reduce` call, and each
    /// distinct key produces exactly one output record.
    fn group_reduce<T, K, R, KF, RF>(&self, input: Vec<T>, key: KF, reduce: RF) -> Vec<R>
    where
        T: Send,
        K: Hash + Eq + Send,
        R: Send,
        KF: Fn(&T) -> K + Send + Sync,
        RF: Fn(K, Vec<T>) -> R + Send + Sync;

    /// Hash equi-join: one output per matching (left, right) pair.
    fn join<L, R, K, O, LK, RK, J>(
        &self,
        left: Vec<L>,
        right: Vec<R>,
        left_key: LK,
        right_key: RK,
        joiner: J,
    ) -> Vec<O>
    where
        L: Send + Sync,
        R: Send + Sync,
        K: Hash + Eq + Send + Sync,
        O: Send,
        LK: Fn(&L) -> K + Send + Sync,
        RK: Fn(&R) -> K + Send + Sync,
        J: Fn(&L, &R) -> O + Send + Sync;

    /// Number of records.
    fn count<T>(&self, input: &[T]) -> usize {
        input.len()
    }
}

// ============================================================================
// Engine selection
// ============================================================================

/// The engine a graph runs its operators on.
///
/// `ExecutionEngine` has generic methods, so runtime selection goes
/// through this enum instead of a trait object.
#[derive(Debug, Clone)]
pub enum Engine {
    Local(LocalEngine),
    #[cfg(feature = "parallel")]
    Parallel(ParallelEngine),
}

impl Default for Engine {
    fn default() -> Self {
        Engine::Local(LocalEngine)
    }
}

macro_rules! dispatch {
    ($self:ident, $engine:ident => $call:expr) => {
        match $self {
            Engine::Local($engine) => $call,
            #[cfg(feature = "parallel")]
            Engine::Parallel($engine) => $call,
        }
    };
}

impl ExecutionEngine for Engine {
    fn name(&self) -> &'static str {
        dispatch!(self, e => e.name())
    }

    fn map<T, U, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Send + Sync,
    {
        dispatch!(self, e => e.map(input, f))
    }

    fn flat_map<T, U, I, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync,
    {
        dispatch!(self, e => e.flat_map(input, f))
    }

    fn filter<T, F>(&self, input: Vec<T>, predicate: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&T) -> bool + Send + Sync,
    {
        dispatch!(self, e => e.filter(input, predicate))
    }

    fn union<T: Send>(&self, left: Vec<T>, right: Vec<T>) -> Vec<T> {
        dispatch!(self, e => e.union(left, right))
    }

    fn distinct_by<T, K, F>(&self, input: Vec<T>, key: F) -> Vec<T>
    where
        T: Send,
        K: Hash + Eq + Send,
        F: Fn(&T) -> K + Send + Sync,
    {
        dispatch!(self, e => e.distinct_by(input, key))
    }

    fn group_reduce<T, K, R, KF, RF>(&self, input: Vec<T>, key: KF, reduce: RF) -> Vec<R>
    where
        T: Send,
        K: Hash + Eq + Send,
        R: Send,
        KF: Fn(&T) -> K + Send + Sync,
        RF: Fn(K, Vec<T>) -> R + Send + Sync,
    {
        dispatch!(self, e => e.group_reduce(input, key, reduce))
    }

    fn join<L, R, K, O, LK, RK, J>(
        &self,
        left: Vec<L>,
        right: Vec<R>,
        left_key: LK,
        right_key: RK,
        joiner: J,
    ) -> Vec<O>
    where
        L: Send + Sync,
        R: Send + Sync,
        K: Hash + Eq + Send + Sync,
        O: Send,
        LK: Fn(&L) -> K + Send + Sync,
        RK: Fn(&R) -> K + Send + Sync,
        J: Fn(&L, &R) -> O + Send + Sync,
    {
        dispatch!(self, e => e.join(left, right, left_key, right_key, joiner))
    }

    fn count<T>(&self, input: &[T]) -> usize {
        dispatch!(self, e => e.count(input))
    }
}
