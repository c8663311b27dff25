//! Canonical binary encoding of property values.
//!
//! ```text
//! fixed:     [tag][payload]
//! variable:  [tag][len: u16][payload]          payload <= 32767 bytes
//!            [tag | 0x80][len: u32][payload]   larger payloads
//! ```
//!
//! All integers are big-endian. Lists, maps and sets carry the
//! concatenated encodings of their items; maps alternate key and value.

use std::collections::{BTreeMap, BTreeSet};

use bytes::{Buf, BufMut, BytesMut};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use super::{GradoopId, PropertyValue};
use crate::{Error, Result};

/// Type tags. The numeric order doubles as the cross-variant sort order.
pub mod tag {
    pub const NULL: u8 = 0x00;
    pub const BOOLEAN: u8 = 0x01;
    pub const INTEGER: u8 = 0x02;
    pub const LONG: u8 = 0x03;
    pub const FLOAT: u8 = 0x04;
    pub const DOUBLE: u8 = 0x05;
    pub const STRING: u8 = 0x06;
    pub const BIG_DECIMAL: u8 = 0x07;
    pub const GRADOOP_ID: u8 = 0x08;
    pub const MAP: u8 = 0x09;
    pub const LIST: u8 = 0x0a;
    pub const DATE: u8 = 0x0b;
    pub const TIME: u8 = 0x0c;
    pub const DATETIME: u8 = 0x0d;
    pub const SHORT: u8 = 0x0e;
    pub const SET: u8 = 0x0f;

    /// Set on variable-length tags whose length prefix is 4 bytes wide.
    /// Payloads are capped at `u32::MAX` bytes.
    pub const FLAG_LARGE: u8 = 0x80;
}

/// Payloads above this size switch to a 4-byte length prefix.
pub const LARGE_PROPERTY_THRESHOLD: usize = i16::MAX as usize;

/// Deepest nesting of lists, maps and sets the decoder accepts.
pub const MAX_NESTING_DEPTH: usize = 128;

const SIZEOF_DATE: usize = 3 * 4;
const SIZEOF_TIME: usize = 4 * 4;
const SIZEOF_DECIMAL: usize = 16;

// ============================================================================
// Encoding
// ============================================================================

impl PropertyValue {
    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.write_to(&mut buf);
        buf.to_vec()
    }

    /// Append the encoding to `buf`.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        let tag = self.type_tag();
        match self {
            PropertyValue::Null => buf.put_u8(tag),
            PropertyValue::Boolean(b) => {
                buf.put_u8(tag);
                buf.put_u8(u8::from(*b));
            }
            PropertyValue::Short(v) => {
                buf.put_u8(tag);
                buf.put_i16(*v);
            }
            PropertyValue::Integer(v) => {
                buf.put_u8(tag);
                buf.put_i32(*v);
            }
            PropertyValue::Long(v) => {
                buf.put_u8(tag);
                buf.put_i64(*v);
            }
            PropertyValue::Float(v) => {
                buf.put_u8(tag);
                buf.put_u32(v.to_bits());
            }
            PropertyValue::Double(v) => {
                buf.put_u8(tag);
                buf.put_u64(v.to_bits());
            }
            PropertyValue::GradoopId(id) => {
                buf.put_u8(tag);
                buf.put_slice(id.as_bytes());
            }
            PropertyValue::Date(d) => {
                buf.put_u8(tag);
                put_date(buf, d);
            }
            PropertyValue::Time(t) => {
                buf.put_u8(tag);
                put_time(buf, t);
            }
            PropertyValue::DateTime(dt) => {
                buf.put_u8(tag);
                put_date(buf, &dt.date());
                put_time(buf, &dt.time());
            }
            PropertyValue::String(s) => put_variable(buf, tag, s.as_bytes()),
            PropertyValue::BigDecimal(d) => put_variable(buf, tag, &d.serialize()),
            PropertyValue::List(items) => {
                let mut payload = BytesMut::new();
                for item in items {
                    item.write_to(&mut payload);
                }
                put_variable(buf, tag, &payload);
            }
            PropertyValue::Map(entries) => {
                let mut payload = BytesMut::new();
                for (k, v) in entries {
                    k.write_to(&mut payload);
                    v.write_to(&mut payload);
                }
                put_variable(buf, tag, &payload);
            }
            PropertyValue::Set(items) => {
                let mut payload = BytesMut::new();
                for item in items {
                    item.write_to(&mut payload);
                }
                put_variable(buf, tag, &payload);
            }
        }
    }

    /// Decode exactly one value. Trailing bytes are an error.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes, 0);
        let value = reader.read_value()?;
        if reader.has_remaining() {
            return Err(Error::malformed(
                reader.offset(),
                format!("{} trailing bytes after value", reader.buf.remaining()),
            ));
        }
        Ok(value)
    }

    /// Decode one value from the front of `buf`, advancing it.
    pub fn read_from(buf: &mut &[u8]) -> Result<Self> {
        let mut reader = Reader::new(*buf, 0);
        let value = reader.read_value()?;
        *buf = reader.buf;
        Ok(value)
    }
}

fn put_variable<B: BufMut>(buf: &mut B, tag: u8, payload: &[u8]) {
    debug_assert!(payload.len() <= u32::MAX as usize, "payload exceeds 4 GiB");
    if payload.len() > LARGE_PROPERTY_THRESHOLD {
        buf.put_u8(tag | tag::FLAG_LARGE);
        buf.put_u32(payload.len() as u32);
    } else {
        buf.put_u8(tag);
        buf.put_u16(payload.len() as u16);
    }
    buf.put_slice(payload);
}

fn put_date<B: BufMut>(buf: &mut B, d: &NaiveDate) {
    buf.put_i32(d.year());
    buf.put_i32(d.month() as i32);
    buf.put_i32(d.day() as i32);
}

fn put_time<B: BufMut>(buf: &mut B, t: &NaiveTime) {
    buf.put_i32(t.hour() as i32);
    buf.put_i32(t.minute() as i32);
    buf.put_i32(t.second() as i32);
    buf.put_i32(t.nanosecond() as i32);
}

// ============================================================================
// Decoding
// ============================================================================

/// Bounds-checked cursor. `base` is the absolute offset of `buf[0]` so
/// errors in nested payloads point into the outer input. `depth` counts
/// the collections enclosing `buf`.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    base: usize,
    start_len: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8], base: usize) -> Self {
        Self { buf, base, start_len: buf.len(), depth: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.base + (self.start_len - self.buf.remaining())
    }

    pub(crate) fn has_remaining(&self) -> bool {
        self.buf.has_remaining()
    }

    fn ensure(&self, n: usize, what: &str) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(Error::malformed(
                self.offset(),
                format!("truncated {what}: need {n} bytes, {} left", self.buf.remaining()),
            ));
        }
        Ok(())
    }

    pub(crate) fn u8(&mut self, what: &str) -> Result<u8> {
        self.ensure(1, what)?;
        Ok(self.buf.get_u8())
    }

    pub(crate) fn u16(&mut self, what: &str) -> Result<u16> {
        self.ensure(2, what)?;
        Ok(self.buf.get_u16())
    }

    pub(crate) fn u32(&mut self, what: &str) -> Result<u32> {
        self.ensure(4, what)?;
        Ok(self.buf.get_u32())
    }

    fn i32(&mut self, what: &str) -> Result<i32> {
        self.ensure(4, what)?;
        Ok(self.buf.get_i32())
    }

    pub(crate) fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        self.ensure(n, what)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub(crate) fn read_value(&mut self) -> Result<PropertyValue> {
        let start = self.offset();
        if self.depth > MAX_NESTING_DEPTH {
            return Err(Error::malformed(start, "nesting too deep"));
        }
        let raw_tag = self.u8("type tag")?;
        let large = raw_tag & tag::FLAG_LARGE != 0;
        let tag = raw_tag & !tag::FLAG_LARGE;

        let fixed = |large: bool| -> Result<()> {
            if large {
                return Err(Error::malformed(start, format!("large flag on fixed-size tag {tag:#04x}")));
            }
            Ok(())
        };

        let value = match tag {
            tag::NULL => {
                fixed(large)?;
                PropertyValue::Null
            }
            tag::BOOLEAN => {
                fixed(large)?;
                match self.u8("boolean")? {
                    0 => PropertyValue::Boolean(false),
                    1 => PropertyValue::Boolean(true),
                    b => return Err(Error::malformed(start + 1, format!("invalid boolean byte {b}"))),
                }
            }
            tag::SHORT => {
                fixed(large)?;
                self.ensure(2, "short")?;
                PropertyValue::Short(self.buf.get_i16())
            }
            tag::INTEGER => {
                fixed(large)?;
                PropertyValue::Integer(self.i32("integer")?)
            }
            tag::LONG => {
                fixed(large)?;
                self.ensure(8, "long")?;
                PropertyValue::Long(self.buf.get_i64())
            }
            tag::FLOAT => {
                fixed(large)?;
                PropertyValue::Float(f32::from_bits(self.u32("float")?))
            }
            tag::DOUBLE => {
                fixed(large)?;
                self.ensure(8, "double")?;
                PropertyValue::Double(f64::from_bits(self.buf.get_u64()))
            }
            tag::GRADOOP_ID => {
                fixed(large)?;
                PropertyValue::GradoopId(GradoopId::from_slice(self.take(GradoopId::ID_SIZE, "identifier")?)?)
            }
            tag::DATE => {
                fixed(large)?;
                PropertyValue::Date(self.date()?)
            }
            tag::TIME => {
                fixed(large)?;
                PropertyValue::Time(self.time()?)
            }
            tag::DATETIME => {
                fixed(large)?;
                let date = self.date()?;
                let time = self.time()?;
                PropertyValue::DateTime(NaiveDateTime::new(date, time))
            }
            tag::STRING => {
                let payload_at = self.offset();
                let payload = self.variable(large)?;
                let s = std::str::from_utf8(payload.buf)
                    .map_err(|e| Error::malformed(payload_at, format!("invalid UTF-8: {e}")))?;
                PropertyValue::String(s.to_owned())
            }
            tag::BIG_DECIMAL => {
                let payload = self.variable(large)?;
                let at = payload.base;
                let raw: [u8; SIZEOF_DECIMAL] = payload.buf.try_into().map_err(|_| {
                    Error::malformed(at, format!("decimal needs {SIZEOF_DECIMAL} bytes, got {}", payload.buf.len()))
                })?;
                // flags word: scale in byte 2, sign in the top bit, all else zero
                let scale = raw[2];
                if scale > 28 {
                    return Err(Error::malformed(at, format!("decimal scale {scale} exceeds 28")));
                }
                if raw[0] != 0 || raw[1] != 0 || raw[3] & 0x7f != 0 {
                    return Err(Error::malformed(at, "decimal flags have unused bits set"));
                }
                PropertyValue::BigDecimal(Decimal::deserialize(raw))
            }
            tag::LIST => {
                let mut payload = self.variable(large)?;
                let mut items = Vec::new();
                while payload.has_remaining() {
                    items.push(payload.read_value()?);
                }
                PropertyValue::List(items)
            }
            tag::MAP => {
                let mut payload = self.variable(large)?;
                let mut entries = BTreeMap::new();
                while payload.has_remaining() {
                    let key_at = payload.offset();
                    let key = payload.read_value()?;
                    if !payload.has_remaining() {
                        return Err(Error::malformed(payload.offset(), "map key without value"));
                    }
                    let value = payload.read_value()?;
                    if entries.insert(key, value).is_some() {
                        return Err(Error::malformed(key_at, "duplicate map key"));
                    }
                }
                PropertyValue::Map(entries)
            }
            tag::SET => {
                let mut payload = self.variable(large)?;
                let mut items = BTreeSet::new();
                while payload.has_remaining() {
                    let item_at = payload.offset();
                    if !items.insert(payload.read_value()?) {
                        return Err(Error::malformed(item_at, "duplicate set item"));
                    }
                }
                PropertyValue::Set(items)
            }
            other => return Err(Error::malformed(start, format!("unknown type tag {other:#04x}"))),
        };
        Ok(value)
    }

    /// Read a length prefix and return a reader over exactly that payload.
    fn variable(&mut self, large: bool) -> Result<Reader<'a>> {
        let len = if large {
            self.u32("length prefix")? as usize
        } else {
            self.u16("length prefix")? as usize
        };
        let base = self.offset();
        let payload = self.take(len, "payload")?;
        Ok(Reader { depth: self.depth + 1, ..Reader::new(payload, base) })
    }

    fn date(&mut self) -> Result<NaiveDate> {
        let at = self.offset();
        self.ensure(SIZEOF_DATE, "date")?;
        let (y, m, d) = (self.buf.get_i32(), self.buf.get_i32(), self.buf.get_i32());
        let (m, d) = (u32::try_from(m).ok(), u32::try_from(d).ok());
        m.zip(d)
            .and_then(|(m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .ok_or_else(|| Error::malformed(at, format!("invalid date {y}-{m:?}-{d:?}")))
    }

    fn time(&mut self) -> Result<NaiveTime> {
        let at = self.offset();
        self.ensure(SIZEOF_TIME, "time")?;
        let parts = [self.buf.get_i32(), self.buf.get_i32(), self.buf.get_i32(), self.buf.get_i32()];
        let [h, m, s, n] = parts.map(|p| u32::try_from(p).ok());
        let time = match (h, m, s, n) {
            (Some(h), Some(m), Some(s), Some(n)) => NaiveTime::from_hms_nano_opt(h, m, s, n),
            _ => None,
        };
        time.ok_or_else(|| Error::malformed(at, format!("invalid time {parts:?}")))
    }
}

// ============================================================================
// serde: values travel as their canonical bytes
// ============================================================================

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.encode())
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EncodedVisitor;

        impl<'de> Visitor<'de> for EncodedVisitor {
            type Value = PropertyValue;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "an encoded property value")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<PropertyValue, E> {
                PropertyValue::decode(v).map_err(E::custom)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<PropertyValue, A::Error> {
                let mut raw = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(b) = seq.next_element::<u8>()? {
                    raw.push(b);
                }
                PropertyValue::decode(&raw).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(EncodedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_fixed_layouts() {
        assert_eq!(PropertyValue::Null.encode(), vec![tag::NULL]);
        assert_eq!(PropertyValue::Boolean(true).encode(), vec![tag::BOOLEAN, 1]);
        assert_eq!(PropertyValue::Short(0x0102).encode(), vec![tag::SHORT, 1, 2]);
        assert_eq!(PropertyValue::Integer(1).encode(), vec![tag::INTEGER, 0, 0, 0, 1]);
        assert_eq!(PropertyValue::Long(-1).encode(), vec![tag::LONG, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(PropertyValue::Double(1.0).encode().len(), 9);
        assert_eq!(PropertyValue::GradoopId(GradoopId::NULL_VALUE).encode().len(), 13);
        assert_eq!(PropertyValue::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()).encode().len(), 13);
    }

    #[test]
    fn test_string_layout() {
        assert_eq!(PropertyValue::from("ab").encode(), vec![tag::STRING, 0, 2, b'a', b'b']);
    }

    #[test]
    fn test_large_string_uses_wide_prefix() {
        let s = "x".repeat(LARGE_PROPERTY_THRESHOLD + 1);
        let bytes = PropertyValue::from(s.as_str()).encode();
        assert_eq!(bytes[0], tag::STRING | tag::FLAG_LARGE);
        assert_eq!(bytes.len(), 1 + 4 + s.len());
        assert_eq!(PropertyValue::decode(&bytes).unwrap(), PropertyValue::from(s));
    }

    #[test]
    fn test_round_trip_supported_properties() {
        for (key, value) in testing::supported_properties() {
            let bytes = value.encode();
            assert_eq!(PropertyValue::decode(&bytes).unwrap(), value, "round trip of {key}");
        }
    }

    #[test]
    fn test_round_trip_nested_composites() {
        let inner = PropertyValue::from(vec![
            PropertyValue::from(vec![1, 2]),
            PropertyValue::Set([PropertyValue::Null, PropertyValue::from("s")].into_iter().collect()),
        ]);
        let mut map = BTreeMap::new();
        map.insert(inner.clone(), PropertyValue::Map(BTreeMap::new()));
        map.insert(PropertyValue::Short(1), inner.clone());
        let value = PropertyValue::List(vec![PropertyValue::Map(map), inner]);
        assert_eq!(PropertyValue::decode(&value.encode()).unwrap(), value);
    }

    #[test]
    fn test_decode_rejects_truncation() {
        let bytes = PropertyValue::Long(42).encode();
        for cut in 0..bytes.len() {
            assert!(matches!(
                PropertyValue::decode(&bytes[..cut]),
                Err(Error::MalformedEncoding { .. })
            ));
        }
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        assert!(matches!(PropertyValue::decode(&[0x10]), Err(Error::MalformedEncoding { offset: 0, .. })));
        assert!(PropertyValue::decode(&[tag::INTEGER | tag::FLAG_LARGE, 0, 0, 0, 1]).is_err());
    }

    #[test]
    fn test_decode_rejects_overlong_prefix() {
        assert!(PropertyValue::decode(&[tag::STRING, 0, 9, b'a']).is_err());
        // list payload holds a truncated integer
        assert!(PropertyValue::decode(&[tag::LIST, 0, 3, tag::INTEGER, 0, 0]).is_err());
    }

    #[test]
    fn test_decode_rejects_trailing_and_invalid_payloads() {
        assert!(PropertyValue::decode(&[tag::NULL, tag::NULL]).is_err());
        assert!(PropertyValue::decode(&[tag::BOOLEAN, 2]).is_err());
        assert!(PropertyValue::decode(&[tag::STRING, 0, 1, 0xff]).is_err());

        let mut bad_date = vec![tag::DATE];
        for part in [2020i32, 13, 1] {
            bad_date.extend_from_slice(&part.to_be_bytes());
        }
        assert!(PropertyValue::decode(&bad_date).is_err());
    }

    #[test]
    fn test_decode_rejects_duplicate_set_items() {
        let one = PropertyValue::from(1).encode();
        let mut bytes = vec![tag::SET, 0, (one.len() * 2) as u8];
        bytes.extend_from_slice(&one);
        bytes.extend_from_slice(&one);
        assert!(PropertyValue::decode(&bytes).is_err());
    }

    fn nested_lists(depth: usize) -> Vec<u8> {
        // wide-prefix list headers wrapped around a single null
        let mut bytes = Vec::with_capacity(depth * 5 + 1);
        for level in (0..depth).rev() {
            bytes.push(tag::LIST | tag::FLAG_LARGE);
            bytes.extend_from_slice(&((level * 5 + 1) as u32).to_be_bytes());
        }
        bytes.push(tag::NULL);
        bytes
    }

    #[test]
    fn test_decode_accepts_nesting_up_to_limit() {
        let mut value = PropertyValue::Null;
        for _ in 0..MAX_NESTING_DEPTH {
            value = PropertyValue::List(vec![value]);
        }
        assert_eq!(PropertyValue::decode(&value.encode()).unwrap(), value);
        assert!(PropertyValue::decode(&nested_lists(MAX_NESTING_DEPTH)).is_ok());
    }

    #[test]
    fn test_decode_rejects_deep_nesting() {
        assert!(matches!(
            PropertyValue::decode(&nested_lists(MAX_NESTING_DEPTH + 1)),
            Err(Error::MalformedEncoding { offset, .. }) if offset == (MAX_NESTING_DEPTH + 1) * 5
        ));
        assert!(matches!(
            PropertyValue::decode(&nested_lists(200_000)),
            Err(Error::MalformedEncoding { .. })
        ));
    }

    #[test]
    fn test_read_from_advances() {
        let mut bytes = PropertyValue::from(7).encode();
        bytes.extend(PropertyValue::from("x").encode());
        let mut cursor: &[u8] = &bytes;
        assert_eq!(PropertyValue::read_from(&mut cursor).unwrap(), PropertyValue::from(7));
        assert_eq!(PropertyValue::read_from(&mut cursor).unwrap(), PropertyValue::from("x"));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_serde_json_uses_bytes() {
        let value = PropertyValue::from(vec![PropertyValue::from(1.5f32), PropertyValue::Null]);
        let json = serde_json::to_string(&value).unwrap();
        let back: PropertyValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
