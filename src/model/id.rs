//! Globally unique element identifiers.
//!
//! A `GradoopId` is 12 bytes:
//!
//! ```text
//! [ 0.. 4)  seconds since the Unix epoch, big-endian
//! [ 4.. 9)  generator entropy, random per IdGenerator
//! [ 9..12)  counter, big-endian, wrapping at 2^24
//! ```
//!
//! Ordering is lexicographic over the bytes, so ids sort roughly by
//! creation time.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// Opaque 96-bit element identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GradoopId([u8; GradoopId::ID_SIZE]);

impl GradoopId {
    /// Width of the binary form in bytes.
    pub const ID_SIZE: usize = 12;

    /// The all-zero id. Never produced by a generator.
    pub const NULL_VALUE: GradoopId = GradoopId([0; Self::ID_SIZE]);

    pub const fn from_bytes(bytes: [u8; Self::ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Read an id from a slice of exactly `ID_SIZE` bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; Self::ID_SIZE] = bytes.try_into().map_err(|_| {
            Error::malformed(0, format!("identifier needs {} bytes, got {}", Self::ID_SIZE, bytes.len()))
        })?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; Self::ID_SIZE] {
        &self.0
    }

    /// Creation second encoded in the first four bytes.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Display for GradoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for GradoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GradoopId({self})")
    }
}

impl FromStr for GradoopId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != Self::ID_SIZE * 2 || !s.is_ascii() {
            return Err(Error::InvalidIdentifier(format!(
                "expected {} hex digits, got '{s}'",
                Self::ID_SIZE * 2
            )));
        }
        let mut raw = [0u8; Self::ID_SIZE];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| Error::InvalidIdentifier(format!("not a hex string: '{s}'")))?;
        }
        Ok(Self(raw))
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Coordination-free id source.
///
/// Owned by an `ElementFactory`; share it behind an `Arc` to hand the same
/// generator to several execution units. `next_id` takes `&self` and is
/// safe to call concurrently.
#[derive(Debug)]
pub struct IdGenerator {
    entropy: [u8; 5],
    counter: AtomicU32,
}

impl IdGenerator {
    const COUNTER_MASK: u32 = 0x00FF_FFFF;

    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let mut entropy = [0u8; 5];
        rng.fill_bytes(&mut entropy);
        let seed = rng.next_u32() & Self::COUNTER_MASK;
        tracing::debug!(entropy = ?entropy, "id generator created");
        Self { entropy, counter: AtomicU32::new(seed) }
    }

    /// Produce a fresh id.
    pub fn next_id(&self) -> GradoopId {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & Self::COUNTER_MASK;

        let mut raw = [0u8; GradoopId::ID_SIZE];
        raw[0..4].copy_from_slice(&seconds.to_be_bytes());
        raw[4..9].copy_from_slice(&self.entropy);
        raw[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        GradoopId(raw)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GradoopIdSet
// ============================================================================

/// Sorted, duplicate-free set of graph ids.
///
/// Most elements belong to one or two graphs, so the ids live inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GradoopIdSet(SmallVec<[GradoopId; 2]>);

impl GradoopIdSet {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Insert `id`. Returns false if it was already present.
    pub fn add(&mut self, id: GradoopId) -> bool {
        match self.0.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, id);
                true
            }
        }
    }

    /// Remove `id`. Returns false if it was absent.
    pub fn remove(&mut self, id: &GradoopId) -> bool {
        match self.0.binary_search(id) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, id: &GradoopId) -> bool {
        self.0.binary_search(id).is_ok()
    }

    pub fn contains_any(&self, other: &GradoopIdSet) -> bool {
        other.iter().any(|id| self.contains(id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &GradoopId> {
        self.0.iter()
    }
}

impl FromIterator<GradoopId> for GradoopIdSet {
    fn from_iter<I: IntoIterator<Item = GradoopId>>(iter: I) -> Self {
        let mut set = GradoopIdSet::new();
        for id in iter {
            set.add(id);
        }
        set
    }
}

// Input order is not trusted: ids are re-sorted and deduplicated.
impl<'de> Deserialize<'de> for GradoopIdSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let ids = Vec::<GradoopId>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a GradoopIdSet {
    type Item = &'a GradoopId;
    type IntoIter = std::slice::Iter<'a, GradoopId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids = IdGenerator::new();
        let set: HashSet<GradoopId> = (0..10_000).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 10_000);
        assert!(!set.contains(&GradoopId::NULL_VALUE));
    }

    #[test]
    fn test_concurrent_generation() {
        let ids = Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..1_000).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut all = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(all.len(), 4_000);
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let a = GradoopId::from_bytes([0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 9]);
        let b = GradoopId::from_bytes([0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(a < b);
        assert_eq!(a.timestamp(), 1);
    }

    #[test]
    fn test_hex_round_trip() {
        let id = IdGenerator::new().next_id();
        let text = id.to_string();
        assert_eq!(text.len(), 24);
        assert_eq!(text.parse::<GradoopId>().unwrap(), id);
        assert!("xyz".parse::<GradoopId>().is_err());
        assert!("zz0000000000000000000000".parse::<GradoopId>().is_err());
    }

    #[test]
    fn test_from_slice_rejects_wrong_width() {
        assert!(GradoopId::from_slice(&[1, 2, 3]).is_err());
        assert!(GradoopId::from_slice(&[7; 12]).is_ok());
    }

    #[test]
    fn test_id_set_is_sorted_and_idempotent() {
        let ids = IdGenerator::new();
        let (a, b) = (ids.next_id(), ids.next_id());
        let mut set = GradoopIdSet::new();
        assert!(set.add(b));
        assert!(set.add(a));
        assert!(!set.add(a));
        assert_eq!(set.len(), 2);
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), expected);
        assert!(set.remove(&a));
        assert!(!set.remove(&a));
        assert!(!set.contains(&a));
    }

    #[test]
    fn test_id_set_deserialize_sorts_and_dedups() {
        let ids = IdGenerator::new();
        let (a, b) = (ids.next_id(), ids.next_id());
        let json = serde_json::to_string(&vec![b, a, b]).unwrap();
        let set: GradoopIdSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set, [a, b].into_iter().collect());
        assert!(set.contains(&a) && set.contains(&b));

        let round_trip: GradoopIdSet = serde_json::from_str(&serde_json::to_string(&set).unwrap()).unwrap();
        assert_eq!(round_trip, set);
    }
}
