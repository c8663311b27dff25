//! rayon-backed engine.
//!
//! Record-wise steps (`map`, `filter`, `flat_map`, join probes) run on the
//! rayon pool and keep input order. Key-based steps shuffle records into
//! `partitions` buckets by key hash, then deduplicate or group each bucket
//! in parallel. Output is ordered by bucket, then first-seen within the
//! bucket, so a fixed partition count gives a fixed result.

use std::hash::{BuildHasher, BuildHasherDefault, DefaultHasher, Hash};

use rayon::prelude::*;

use super::local::{build_side, distinct_first_seen, group_first_seen};
use super::ExecutionEngine;

/// Fixed-key hasher so partition assignment is stable across runs.
type PartitionHasher = BuildHasherDefault<DefaultHasher>;

#[derive(Debug, Clone)]
pub struct ParallelEngine {
    partitions: usize,
}

impl ParallelEngine {
    /// `partitions` is clamped to at least one.
    pub fn new(partitions: usize) -> Self {
        Self { partitions: partitions.max(1) }
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    fn shuffle<T, K, F>(&self, input: Vec<T>, key: &F) -> Vec<Vec<T>>
    where
        K: Hash,
        F: Fn(&T) -> K,
    {
        let hasher = PartitionHasher::default();
        let mut buckets: Vec<Vec<T>> = (0..self.partitions).map(|_| Vec::new()).collect();
        for t in input {
            let slot = (hasher.hash_one(key(&t)) % self.partitions as u64) as usize;
            buckets[slot].push(t);
        }
        tracing::trace!(partitions = self.partitions, "shuffled records by key");
        buckets
    }
}

impl Default for ParallelEngine {
    fn default() -> Self {
        Self::new(rayon::current_num_threads())
    }
}

impl ExecutionEngine for ParallelEngine {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn map<T, U, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Send + Sync,
    {
        input.into_par_iter().map(f).collect()
    }

    fn flat_map<T, U, I, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync,
    {
        input
            .into_par_iter()
            .map(|t| f(t).into_iter().collect::<Vec<U>>())
            .flatten()
            .collect()
    }

    fn filter<T, F>(&self, input: Vec<T>, predicate: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&T) -> bool + Send + Sync,
    {
        input.into_par_iter().filter(|t| predicate(t)).collect()
    }

    fn distinct_by<T, K, F>(&self, input: Vec<T>, key: F) -> Vec<T>
    where
        T: Send,
        K: Hash + Eq + Send,
        F: Fn(&T) -> K + Send + Sync,
    {
        self.shuffle(input, &key)
            .into_par_iter()
            .map(|bucket| distinct_first_seen(bucket, &key))
            .flatten()
            .collect()
    }

    fn group_reduce<T, K, R, KF, RF>(&self, input: Vec<T>, key: KF, reduce: RF) -> Vec<R>
    where
        T: Send,
        K: Hash + Eq + Send,
        R: Send,
        KF: Fn(&T) -> K + Send + Sync,
        RF: Fn(K, Vec<T>) -> R + Send + Sync,
    {
        self.shuffle(input, &key)
            .into_par_iter()
            .map(|bucket| {
                group_first_seen(bucket, &key)
                    .into_iter()
                    .map(|(k, group)| reduce(k, group))
                    .collect::<Vec<R>>()
            })
            .flatten()
            .collect()
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
        let table = build_side(&right, &right_key);
        left.par_iter()
            .map(|l| match table.get(&left_key(l)) {
                Some(matches) => matches.iter().map(|r| joiner(l, r)).collect(),
                None => Vec::new(),
            })
            .flatten()
            .collect()
    }
}
