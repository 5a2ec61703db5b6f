use crate::value::Data;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::ops::Index;

/// An ordered, string-keyed container holding one converted message.
///
/// Entries are kept in insertion order, which the registry makes equal to the
/// declared field order of the message. Besides key access (`get`,
/// `record["field"]`) a record can be viewed as any serde type with
/// [decode_as](#method.decode_as), the typed counterpart of attribute access.
#[derive(Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Data>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn with_capacity(capacity: usize) -> Record {
        Record {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts or replaces `name`. A new key goes to the end; replacing an
    /// existing key keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Data>) -> Option<Data> {
        self.fields.insert(name.into(), value.into())
    }

    /// Builder-style [insert](#method.insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Data>) -> Record {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Data> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Data> {
        self.fields.get_mut(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Removes `name` while keeping the relative order of the other keys.
    pub fn remove(&mut self, name: &str) -> Option<Data> {
        self.fields.shift_remove(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Data)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deserializes this record into `T`, matching record keys to the
    /// field names of `T`.
    pub fn decode_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

impl<'k> Index<&'k str> for Record {
    type Output = Data;

    fn index(&self, name: &'k str) -> &Data {
        match self.fields.get(name) {
            Some(value) => value,
            None => panic!("no key {:?} in record", name),
        }
    }
}

impl<K: Into<String>, V: Into<Data>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Data);
    type IntoIter = indexmap::map::IntoIter<String, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", name, value)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
