//! Properties: the key-value store on graph heads, vertices and edges.

use std::collections::BTreeMap;

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use super::PropertyValue;
use super::encoding::Reader;
use crate::{Error, Result};

/// Property keys mapped to values.
///
/// Keys are unique and case-sensitive. Iteration and encoding follow key
/// order, so two maps with equal contents serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    /// Upsert. Returns the previous value under `key`, if any.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(key, value);
        self
    }

    // ========================================================================
    // Binary form: [count: u32] then per entry [key_len: u32][key][value]
    // ========================================================================

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        buf
    }

    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32(self.0.len() as u32);
        for (key, value) in &self.0 {
            buf.put_u32(key.len() as u32);
            buf.put_slice(key.as_bytes());
            value.write_to(buf);
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes, 0);
        let count = reader.u32("property count")?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key_at = reader.offset();
            let len = reader.u32("key length")? as usize;
            let key = std::str::from_utf8(reader.take(len, "property key")?)
                .map_err(|e| Error::malformed(key_at, format!("invalid UTF-8 in key: {e}")))?
                .to_owned();
            let value = reader.read_value()?;
            if map.insert(key, value).is_some() {
                return Err(Error::malformed(key_at, "duplicate property key"));
            }
        }
        if reader.has_remaining() {
            return Err(Error::malformed(reader.offset(), "trailing bytes after properties"));
        }
        Ok(Self(map))
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> From<Vec<(K, V)>> for Properties {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Properties {
    type Item = (String, PropertyValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
