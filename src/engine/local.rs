//! Sequential reference engine.
//!
//! Runs everything on the calling thread. Output preserves input order;
//! `distinct_by` keeps the first record seen for each key and
//! `group_reduce` emits groups in the order their keys first appear.

use std::hash::Hash;

use hashbrown::{HashMap, HashSet};

use super::ExecutionEngine;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEngine;

impl ExecutionEngine for LocalEngine {
    fn name(&self) -> &'static str {
        "local"
    }

    fn map<T, U, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Send + Sync,
    {
        input.into_iter().map(f).collect()
    }

    fn flat_map<T, U, I, F>(&self, input: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync,
    {
        input.into_iter().flat_map(f).collect()
    }

    fn filter<T, F>(&self, input: Vec<T>, predicate: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&T) -> bool + Send + Sync,
    {
        input.into_iter().filter(|t| predicate(t)).collect()
    }

    fn distinct_by<T, K, F>(&self, input: Vec<T>, key: F) -> Vec<T>
    where
        T: Send,
        K: Hash + Eq + Send,
        F: Fn(&T) -> K + Send + Sync,
    {
        distinct_first_seen(input, &key)
    }

    fn group_reduce<T, K, R, KF, RF>(&self, input: Vec<T>, key: KF, reduce: RF) -> Vec<R>
    where
        T: Send,
        K: Hash + Eq + Send,
        R: Send,
        KF: Fn(&T) -> K + Send + Sync,
        RF: Fn(K, Vec<T>) -> R + Send + Sync,
    {
        group_first_seen(input, &key)
            .into_iter()
            .map(|(k, group)| reduce(k, group))
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
        let mut out = Vec::new();
        for l in &left {
            if let Some(matches) = table.get(&left_key(l)) {
                out.extend(matches.iter().map(|r| joiner(l, r)));
            }
        }
        out
    }
}

// ============================================================================
// Shared helpers (also used per partition by the parallel engine)
// ============================================================================

pub(crate) fn distinct_first_seen<T, K, F>(input: Vec<T>, key: &F) -> Vec<T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(input.len());
    input.into_iter().filter(|t| seen.insert(key(t))).collect()
}

pub(crate) fn group_first_seen<T, K, F>(input: Vec<T>, key: &F) -> Vec<(K, Vec<T>)>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(Option<K>, Vec<T>)> = Vec::new();
    for t in input {
        let k = key(&t);
        match slots.get(&k) {
            Some(&slot) => groups[slot].1.push(t),
            None => {
                slots.insert(k, groups.len());
                groups.push((None, vec![t]));
            }
        }
    }
    // Keys moved into the index map; hand them back to their groups.
    for (k, slot) in slots {
        groups[slot].0 = Some(k);
    }
    groups
        .into_iter()
        .filter_map(|(k, group)| k.map(|k| (k, group)))
        .collect()
}

pub(crate) fn build_side<'a, R, K, F>(right: &'a [R], key: &F) -> HashMap<K, Vec<&'a R>>
where
    K: Hash + Eq,
    F: Fn(&R) -> K,
{
    let mut table: HashMap<K, Vec<&'a R>> = HashMap::new();
    for r in right {
        table.entry(key(r)).or_default().push(r);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_keeps_first_seen() {
        let out = LocalEngine.distinct_by(vec![(1, 'a'), (2, 'b'), (1, 'c')], |t| t.0);
        assert_eq!(out, vec![(1, 'a'), (2, 'b')]);
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let out = LocalEngine.group_reduce(
            vec!["bb", "a", "cc", "d", "eee"],
            |s| s.len(),
            |len, words| (len, words),
        );
        assert_eq!(out, vec![(2, vec!["bb", "cc"]), (1, vec!["a", "d"]), (3, vec!["eee"])]);
    }

    #[test]
    fn test_join_preserves_left_order() {
        let out = LocalEngine.join(
            vec![3, 1, 2],
            vec![(1, "one"), (2, "two"), (3, "three")],
            |l| *l,
            |r| r.0,
            |_, r| r.1,
        );
        assert_eq!(out, vec!["three", "one", "two"]);
    }

    #[test]
    fn test_empty_input() {
        let out: Vec<(u8, usize)> =
            LocalEngine.group_reduce(Vec::<u8>::new(), |x| *x, |k, xs| (k, xs.len()));
        assert!(out.is_empty());
    }
}
