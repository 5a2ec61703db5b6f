use crate::record::Record;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::ops::Index;

/// A map key as declared by a protobuf `map<K, V>` field.
///
/// Keys keep the type they have in the schema, so an `int32` keyed map stays
/// keyed by integers instead of being stringified like JSON would.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    String(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Key::Bool(value) => value.fmt(f),
            Key::I32(value) => value.fmt(f),
            Key::I64(value) => value.fmt(f),
            Key::U32(value) => value.fmt(f),
            Key::U64(value) => value.fmt(f),
            Key::String(ref value) => value.fmt(f),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::String(value.to_owned())
    }
}

/// This type holds dynamic container data.
///
/// A `Data` is what a protobuf message turns into after conversion: records
/// for messages, lists for repeated fields, maps for map fields and plain
/// scalars for everything else. `Null` marks a value that is absent, such as
/// an unset sub-message or `optional` field.
#[derive(Clone, PartialEq)]
pub enum Data {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Data>),
    Map(IndexMap<Key, Data>),
    Record(Record),
}

impl Data {
    /// Returns `true` for [Null](#variant.Null).
    pub fn is_null(&self) -> bool {
        matches!(*self, Data::Null)
    }

    /// A convenience method to extract the value out of a [Bool](#variant.Bool).
    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            Data::Bool(value) => value,
            _ => false,
        }
    }

    /// A convenience method to extract the value out of an [I32](#variant.I32).
    /// Returns `0` for other value kinds.
    pub fn as_i32(&self) -> i32 {
        match *self {
            Data::I32(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of an [I64](#variant.I64).
    /// Returns `0` for other value kinds.
    pub fn as_i64(&self) -> i64 {
        match *self {
            Data::I64(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [U32](#variant.U32).
    /// Returns `0` for other value kinds.
    pub fn as_u32(&self) -> u32 {
        match *self {
            Data::U32(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [U64](#variant.U64).
    /// Returns `0` for other value kinds.
    pub fn as_u64(&self) -> u64 {
        match *self {
            Data::U64(value) => value,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a floating point
    /// variant. Returns `0.0` for other value kinds.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Data::F32(value) => value as f64,
            Data::F64(value) => value,
            _ => 0.0,
        }
    }

    /// A convenience method to extract the value out of a [String](#variant.String).
    /// Returns `""` for other value kinds.
    pub fn as_str(&self) -> &str {
        match *self {
            Data::String(ref value) => value.as_str(),
            _ => "",
        }
    }

    /// A convenience method to extract the value out of [Bytes](#variant.Bytes).
    /// Returns an empty slice for other value kinds.
    pub fn as_bytes(&self) -> &[u8] {
        match *self {
            Data::Bytes(ref value) => value.as_slice(),
            _ => &[],
        }
    }

    /// A convenience method to get the items out of a [List](#variant.List).
    /// Returns an empty slice for other value kinds.
    pub fn as_list(&self) -> &[Data] {
        match *self {
            Data::List(ref values) => values.as_slice(),
            _ => &[],
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Data>> {
        match *self {
            Data::Map(ref entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match *self {
            Data::Record(ref record) => Some(record),
            _ => None,
        }
    }

    /// Whether this value can be read field by field, i.e. it is a
    /// [Record](#variant.Record) or a [Map](#variant.Map).
    pub fn is_container(&self) -> bool {
        matches!(*self, Data::Record(_) | Data::Map(_))
    }

    /// Looks up `name` in a [Record](#variant.Record), or the string key
    /// `name` in a [Map](#variant.Map). Returns `None` for other value kinds
    /// or if the key isn't present.
    pub fn get(&self, name: &str) -> Option<&Data> {
        match *self {
            Data::Record(ref record) => record.get(name),
            Data::Map(ref entries) => entries.get(&Key::String(name.to_owned())),
            _ => None,
        }
    }

    /// A convenience method to extract the length out of a list, map or
    /// record. Returns `0` for other value kinds.
    pub fn len(&self) -> usize {
        match *self {
            Data::List(ref values) => values.len(),
            Data::Map(ref entries) => entries.len(),
            Data::Record(ref record) => record.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match *self {
            Data::Null => "null",
            Data::Bool(_) => "bool",
            Data::I32(_) => "i32",
            Data::I64(_) => "i64",
            Data::U32(_) => "u32",
            Data::U64(_) => "u64",
            Data::F32(_) => "f32",
            Data::F64(_) => "f64",
            Data::String(_) => "string",
            Data::Bytes(_) => "bytes",
            Data::List(_) => "list",
            Data::Map(_) => "map",
            Data::Record(_) => "record",
        }
    }
}

impl Index<usize> for Data {
    type Output = Data;

    /// Adds support for `data[index]` expressions. It will panic if this
    /// value isn't a [List](#variant.List) or if the index is out of bounds.
    fn index(&self, index: usize) -> &Data {
        match *self {
            Data::List(ref values) => &values[index],
            _ => panic!("cannot index {} value by position", self.kind()),
        }
    }
}

impl<'k> Index<&'k str> for Data {
    type Output = Data;

    /// Adds support for `data["field"]` expressions. It will panic if the
    /// key is missing or this value isn't a container.
    fn index(&self, name: &'k str) -> &Data {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no key {:?} in {} value", name, self.kind()),
        }
    }
}

impl From<bool> for Data {
    fn from(value: bool) -> Self {
        Data::Bool(value)
    }
}

impl From<i32> for Data {
    fn from(value: i32) -> Self {
        Data::I32(value)
    }
}

impl From<i64> for Data {
    fn from(value: i64) -> Self {
        Data::I64(value)
    }
}

impl From<u32> for Data {
    fn from(value: u32) -> Self {
        Data::U32(value)
    }
}

impl From<u64> for Data {
    fn from(value: u64) -> Self {
        Data::U64(value)
    }
}

impl From<f32> for Data {
    fn from(value: f32) -> Self {
        Data::F32(value)
    }
}

impl From<f64> for Data {
    fn from(value: f64) -> Self {
        Data::F64(value)
    }
}

impl From<&str> for Data {
    fn from(value: &str) -> Self {
        Data::String(value.to_owned())
    }
}

impl From<String> for Data {
    fn from(value: String) -> Self {
        Data::String(value)
    }
}

impl From<Vec<u8>> for Data {
    fn from(value: Vec<u8>) -> Self {
        Data::Bytes(value)
    }
}

impl From<Record> for Data {
    fn from(value: Record) -> Self {
        Data::Record(value)
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(value: Option<T>) -> Self {
        value.map_or(Data::Null, Into::into)
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Data::Null => write!(f, "null"),
            Data::Bool(value) => value.fmt(f),
            Data::I32(value) => value.fmt(f),
            Data::I64(value) => value.fmt(f),
            Data::U32(value) => value.fmt(f),
            Data::U64(value) => value.fmt(f),
            Data::F32(value) => value.fmt(f),
            Data::F64(value) => value.fmt(f),
            Data::String(ref value) => value.fmt(f),
            Data::Bytes(ref value) => write!(f, "b{:?}", value),
            Data::List(ref values) => values.fmt(f),
            Data::Record(ref record) => record.fmt(f),

            Data::Map(ref entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {:?}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Data::Null => serializer.serialize_none(),
            Data::Bool(value) => serializer.serialize_bool(value),
            Data::I32(value) => serializer.serialize_i32(value),
            Data::I64(value) => serializer.serialize_i64(value),
            Data::U32(value) => serializer.serialize_u32(value),
            Data::U64(value) => serializer.serialize_u64(value),
            Data::F32(value) => serializer.serialize_f32(value),
            Data::F64(value) => serializer.serialize_f64(value),
            Data::String(ref value) => serializer.serialize_str(value),
            Data::Bytes(ref value) => serializer.serialize_bytes(value),
            Data::Record(ref record) => record.serialize(serializer),

            Data::List(ref values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }

            // Serializers like JSON only accept string keys.
            Data::Map(ref entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.to_string(), value)?;
                }
                map.end()
            }
        }
    }
}
