//! Typed property values.
//!
//! `PropertyValue` is the closed set of types a property can hold. Equality,
//! ordering and hashing are variant-aware: `Integer(2) != Long(2)`, and values
//! of different variants order by their type tag.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::GradoopId;
use super::encoding::tag;
use crate::{Error, Result};

/// A property value.
///
/// Map and Set are ordered containers, so every value has exactly one
/// binary encoding.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    BigDecimal(Decimal),
    GradoopId(GradoopId),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    List(Vec<PropertyValue>),
    Map(BTreeMap<PropertyValue, PropertyValue>),
    Set(BTreeSet<PropertyValue>),
}

// ============================================================================
// Type checking
// ============================================================================

impl PropertyValue {
    /// Type tag written as the first byte of the encoding. Also the
    /// primary sort key across variants.
    pub fn type_tag(&self) -> u8 {
        match self {
            PropertyValue::Null => tag::NULL,
            PropertyValue::Boolean(_) => tag::BOOLEAN,
            PropertyValue::Integer(_) => tag::INTEGER,
            PropertyValue::Long(_) => tag::LONG,
            PropertyValue::Float(_) => tag::FLOAT,
            PropertyValue::Double(_) => tag::DOUBLE,
            PropertyValue::String(_) => tag::STRING,
            PropertyValue::BigDecimal(_) => tag::BIG_DECIMAL,
            PropertyValue::GradoopId(_) => tag::GRADOOP_ID,
            PropertyValue::Map(_) => tag::MAP,
            PropertyValue::List(_) => tag::LIST,
            PropertyValue::Date(_) => tag::DATE,
            PropertyValue::Time(_) => tag::TIME,
            PropertyValue::DateTime(_) => tag::DATETIME,
            PropertyValue::Short(_) => tag::SHORT,
            PropertyValue::Set(_) => tag::SET,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "NULL",
            PropertyValue::Boolean(_) => "BOOLEAN",
            PropertyValue::Short(_) => "SHORT",
            PropertyValue::Integer(_) => "INTEGER",
            PropertyValue::Long(_) => "LONG",
            PropertyValue::Float(_) => "FLOAT",
            PropertyValue::Double(_) => "DOUBLE",
            PropertyValue::String(_) => "STRING",
            PropertyValue::BigDecimal(_) => "BIG_DECIMAL",
            PropertyValue::GradoopId(_) => "GRADOOP_ID",
            PropertyValue::Date(_) => "DATE",
            PropertyValue::Time(_) => "TIME",
            PropertyValue::DateTime(_) => "DATETIME",
            PropertyValue::List(_) => "LIST",
            PropertyValue::Map(_) => "MAP",
            PropertyValue::Set(_) => "SET",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, PropertyValue::Null) }
    pub fn is_boolean(&self) -> bool { matches!(self, PropertyValue::Boolean(_)) }
    pub fn is_short(&self) -> bool { matches!(self, PropertyValue::Short(_)) }
    pub fn is_int(&self) -> bool { matches!(self, PropertyValue::Integer(_)) }
    pub fn is_long(&self) -> bool { matches!(self, PropertyValue::Long(_)) }
    pub fn is_float(&self) -> bool { matches!(self, PropertyValue::Float(_)) }
    pub fn is_double(&self) -> bool { matches!(self, PropertyValue::Double(_)) }
    pub fn is_string(&self) -> bool { matches!(self, PropertyValue::String(_)) }
    pub fn is_big_decimal(&self) -> bool { matches!(self, PropertyValue::BigDecimal(_)) }
    pub fn is_gradoop_id(&self) -> bool { matches!(self, PropertyValue::GradoopId(_)) }
    pub fn is_date(&self) -> bool { matches!(self, PropertyValue::Date(_)) }
    pub fn is_time(&self) -> bool { matches!(self, PropertyValue::Time(_)) }
    pub fn is_date_time(&self) -> bool { matches!(self, PropertyValue::DateTime(_)) }
    pub fn is_list(&self) -> bool { matches!(self, PropertyValue::List(_)) }
    pub fn is_map(&self) -> bool { matches!(self, PropertyValue::Map(_)) }
    pub fn is_set(&self) -> bool { matches!(self, PropertyValue::Set(_)) }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            PropertyValue::Short(_)
                | PropertyValue::Integer(_)
                | PropertyValue::Long(_)
                | PropertyValue::Float(_)
                | PropertyValue::Double(_)
                | PropertyValue::BigDecimal(_)
        )
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.type_name())
    }
}

// ============================================================================
// Narrowing accessors
// ============================================================================

impl PropertyValue {
    pub fn get_boolean(&self) -> Result<bool> {
        match self {
            PropertyValue::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch("BOOLEAN")),
        }
    }

    pub fn get_short(&self) -> Result<i16> {
        match self {
            PropertyValue::Short(v) => Ok(*v),
            _ => Err(self.mismatch("SHORT")),
        }
    }

    pub fn get_int(&self) -> Result<i32> {
        match self {
            PropertyValue::Integer(v) => Ok(*v),
            _ => Err(self.mismatch("INTEGER")),
        }
    }

    pub fn get_long(&self) -> Result<i64> {
        match self {
            PropertyValue::Long(v) => Ok(*v),
            _ => Err(self.mismatch("LONG")),
        }
    }

    pub fn get_float(&self) -> Result<f32> {
        match self {
            PropertyValue::Float(v) => Ok(*v),
            _ => Err(self.mismatch("FLOAT")),
        }
    }

    pub fn get_double(&self) -> Result<f64> {
        match self {
            PropertyValue::Double(v) => Ok(*v),
            _ => Err(self.mismatch("DOUBLE")),
        }
    }

    pub fn get_string(&self) -> Result<&str> {
        match self {
            PropertyValue::String(s) => Ok(s),
            _ => Err(self.mismatch("STRING")),
        }
    }

    pub fn get_big_decimal(&self) -> Result<Decimal> {
        match self {
            PropertyValue::BigDecimal(d) => Ok(*d),
            _ => Err(self.mismatch("BIG_DECIMAL")),
        }
    }

    pub fn get_gradoop_id(&self) -> Result<GradoopId> {
        match self {
            PropertyValue::GradoopId(id) => Ok(*id),
            _ => Err(self.mismatch("GRADOOP_ID")),
        }
    }

    pub fn get_date(&self) -> Result<NaiveDate> {
        match self {
            PropertyValue::Date(d) => Ok(*d),
            _ => Err(self.mismatch("DATE")),
        }
    }

    pub fn get_time(&self) -> Result<NaiveTime> {
        match self {
            PropertyValue::Time(t) => Ok(*t),
            _ => Err(self.mismatch("TIME")),
        }
    }

    pub fn get_date_time(&self) -> Result<NaiveDateTime> {
        match self {
            PropertyValue::DateTime(dt) => Ok(*dt),
            _ => Err(self.mismatch("DATETIME")),
        }
    }

    pub fn get_list(&self) -> Result<&[PropertyValue]> {
        match self {
            PropertyValue::List(l) => Ok(l),
            _ => Err(self.mismatch("LIST")),
        }
    }

    pub fn get_map(&self) -> Result<&BTreeMap<PropertyValue, PropertyValue>> {
        match self {
            PropertyValue::Map(m) => Ok(m),
            _ => Err(self.mismatch("MAP")),
        }
    }

    pub fn get_set(&self) -> Result<&BTreeSet<PropertyValue>> {
        match self {
            PropertyValue::Set(s) => Ok(s),
            _ => Err(self.mismatch("SET")),
        }
    }
}

// ============================================================================
// Construction from runtime-typed values
// ============================================================================

impl PropertyValue {
    /// Wrap a runtime-typed native value.
    ///
    /// Types without a variant (unsigned integers, `i8`, `char`, ...) fail
    /// with `Error::UnsupportedType`; nothing is coerced.
    pub fn create(value: &dyn Any) -> Result<Self> {
        macro_rules! wrap {
            ($($ty:ty => $ctor:expr),* $(,)?) => {
                $(
                    if let Some(v) = value.downcast_ref::<$ty>() {
                        return Ok($ctor(v));
                    }
                )*
            };
        }

        wrap! {
            PropertyValue => |v: &PropertyValue| v.clone(),
            () => |_: &()| PropertyValue::Null,
            bool => |v: &bool| PropertyValue::Boolean(*v),
            i16 => |v: &i16| PropertyValue::Short(*v),
            i32 => |v: &i32| PropertyValue::Integer(*v),
            i64 => |v: &i64| PropertyValue::Long(*v),
            f32 => |v: &f32| PropertyValue::Float(*v),
            f64 => |v: &f64| PropertyValue::Double(*v),
            String => |v: &String| PropertyValue::String(v.clone()),
            &'static str => |v: &&str| PropertyValue::String((*v).to_owned()),
            Decimal => |v: &Decimal| PropertyValue::BigDecimal(*v),
            GradoopId => |v: &GradoopId| PropertyValue::GradoopId(*v),
            NaiveDate => |v: &NaiveDate| PropertyValue::Date(*v),
            NaiveTime => |v: &NaiveTime| PropertyValue::Time(*v),
            NaiveDateTime => |v: &NaiveDateTime| PropertyValue::DateTime(*v),
            Vec<PropertyValue> => |v: &Vec<PropertyValue>| PropertyValue::List(v.clone()),
            BTreeMap<PropertyValue, PropertyValue> =>
                |v: &BTreeMap<PropertyValue, PropertyValue>| PropertyValue::Map(v.clone()),
            HashMap<PropertyValue, PropertyValue> =>
                |v: &HashMap<PropertyValue, PropertyValue>| PropertyValue::Map(v.clone().into_iter().collect()),
            BTreeSet<PropertyValue> => |v: &BTreeSet<PropertyValue>| PropertyValue::Set(v.clone()),
            HashSet<PropertyValue> =>
                |v: &HashSet<PropertyValue>| PropertyValue::Set(v.iter().cloned().collect()),
        }

        Err(Error::UnsupportedType(format!("no property variant for {:?}", Any::type_id(value))))
    }
}

impl TryFrom<&serde_json::Value> for PropertyValue {
    type Error = Error;

    /// JSON integers become `Long`, other numbers `Double`, objects become
    /// maps with string keys.
    fn try_from(json: &serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;
        Ok(match json {
            Json::Null => PropertyValue::Null,
            Json::Bool(b) => PropertyValue::Boolean(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropertyValue::Long(i)
                } else if n.is_u64() {
                    return Err(Error::UnsupportedType(format!("unsigned integer {n} exceeds LONG")));
                } else {
                    let f = n
                        .as_f64()
                        .ok_or_else(|| Error::UnsupportedType(format!("number {n}")))?;
                    PropertyValue::Double(f)
                }
            }
            Json::String(s) => PropertyValue::String(s.clone()),
            Json::Array(items) => PropertyValue::List(
                items.iter().map(PropertyValue::try_from).collect::<Result<_>>()?,
            ),
            Json::Object(fields) => PropertyValue::Map(
                fields
                    .iter()
                    .map(|(k, v)| Ok((PropertyValue::from(k.as_str()), PropertyValue::try_from(v)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for PropertyValue { fn from(v: bool) -> Self { PropertyValue::Boolean(v) } }
impl From<i16> for PropertyValue { fn from(v: i16) -> Self { PropertyValue::Short(v) } }
impl From<i32> for PropertyValue { fn from(v: i32) -> Self { PropertyValue::Integer(v) } }
impl From<i64> for PropertyValue { fn from(v: i64) -> Self { PropertyValue::Long(v) } }
impl From<f32> for PropertyValue { fn from(v: f32) -> Self { PropertyValue::Float(v) } }
impl From<f64> for PropertyValue { fn from(v: f64) -> Self { PropertyValue::Double(v) } }
impl From<String> for PropertyValue { fn from(v: String) -> Self { PropertyValue::String(v) } }
impl From<&str> for PropertyValue { fn from(v: &str) -> Self { PropertyValue::String(v.to_owned()) } }
impl From<Decimal> for PropertyValue { fn from(v: Decimal) -> Self { PropertyValue::BigDecimal(v) } }
impl From<GradoopId> for PropertyValue { fn from(v: GradoopId) -> Self { PropertyValue::GradoopId(v) } }
impl From<NaiveDate> for PropertyValue { fn from(v: NaiveDate) -> Self { PropertyValue::Date(v) } }
impl From<NaiveTime> for PropertyValue { fn from(v: NaiveTime) -> Self { PropertyValue::Time(v) } }
impl From<NaiveDateTime> for PropertyValue { fn from(v: NaiveDateTime) -> Self { PropertyValue::DateTime(v) } }
impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(v: Vec<T>) -> Self { PropertyValue::List(v.into_iter().map(Into::into).collect()) }
}
impl From<BTreeMap<PropertyValue, PropertyValue>> for PropertyValue {
    fn from(v: BTreeMap<PropertyValue, PropertyValue>) -> Self { PropertyValue::Map(v) }
}
impl From<BTreeSet<PropertyValue>> for PropertyValue {
    fn from(v: BTreeSet<PropertyValue>) -> Self { PropertyValue::Set(v) }
}
impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(PropertyValue::Null) }
}

// ============================================================================
// Equality, ordering, hashing
// ============================================================================

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use PropertyValue as P;
        match (self, other) {
            (P::Null, P::Null) => Ordering::Equal,
            (P::Boolean(a), P::Boolean(b)) => a.cmp(b),
            (P::Short(a), P::Short(b)) => a.cmp(b),
            (P::Integer(a), P::Integer(b)) => a.cmp(b),
            (P::Long(a), P::Long(b)) => a.cmp(b),
            (P::Float(a), P::Float(b)) => a.total_cmp(b),
            (P::Double(a), P::Double(b)) => a.total_cmp(b),
            (P::String(a), P::String(b)) => a.cmp(b),
            (P::BigDecimal(a), P::BigDecimal(b)) => a.cmp(b),
            (P::GradoopId(a), P::GradoopId(b)) => a.cmp(b),
            (P::Date(a), P::Date(b)) => a.cmp(b),
            (P::Time(a), P::Time(b)) => a.cmp(b),
            (P::DateTime(a), P::DateTime(b)) => a.cmp(b),
            (P::List(a), P::List(b)) => a.cmp(b),
            (P::Map(a), P::Map(b)) => a.len().cmp(&b.len()).then_with(|| a.iter().cmp(b.iter())),
            (P::Set(a), P::Set(b)) => a.len().cmp(&b.len()).then_with(|| a.iter().cmp(b.iter())),
            _ => self.type_tag().cmp(&other.type_tag()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Floats are equal iff their bits are equal, matching `total_cmp`.
impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertyValue {}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_tag().hash(state);
        match self {
            PropertyValue::Null => {}
            PropertyValue::Boolean(b) => b.hash(state),
            PropertyValue::Short(v) => v.hash(state),
            PropertyValue::Integer(v) => v.hash(state),
            PropertyValue::Long(v) => v.hash(state),
            PropertyValue::Float(v) => v.to_bits().hash(state),
            PropertyValue::Double(v) => v.to_bits().hash(state),
            PropertyValue::String(s) => s.hash(state),
            PropertyValue::BigDecimal(d) => d.hash(state),
            PropertyValue::GradoopId(id) => id.hash(state),
            PropertyValue::Date(d) => d.hash(state),
            PropertyValue::Time(t) => t.hash(state),
            PropertyValue::DateTime(dt) => dt.hash(state),
            PropertyValue::List(l) => l.hash(state),
            PropertyValue::Map(m) => m.hash(state),
            PropertyValue::Set(s) => s.hash(state),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "NULL"),
            PropertyValue::Boolean(b) => write!(f, "{b}"),
            PropertyValue::Short(v) => write!(f, "{v}"),
            PropertyValue::Integer(v) => write!(f, "{v}"),
            PropertyValue::Long(v) => write!(f, "{v}L"),
            PropertyValue::Float(v) => write!(f, "{v}f"),
            PropertyValue::Double(v) => write!(f, "{v}"),
            PropertyValue::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            PropertyValue::BigDecimal(d) => write!(f, "{d}"),
            PropertyValue::GradoopId(id) => write!(f, "{id}"),
            PropertyValue::Date(d) => write!(f, "{d}"),
            PropertyValue::Time(t) => write!(f, "{t}"),
            PropertyValue::DateTime(dt) => write!(f, "{dt}"),
            PropertyValue::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            PropertyValue::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            PropertyValue::Set(s) => {
                write!(f, "{{")?;
                for (i, v) in s.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
