//! Converter closures built from descriptors.
//!
//! Each field is inspected once, at registration, and reduced to a [Shape].
//! The closures built from a shape never look at the descriptor again; they
//! only resolve other converters by name through the [Namespace].

use crate::{
    error::CastError,
    namespace::{DataToField, DataToMessage, FieldToData, MessageToData, Namespace},
};
use dynacast_schema::{Data, Key, Record};
use indexmap::IndexMap;
use prost::bytes::Bytes;
use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, MapKey, MessageDescriptor, Value};
use std::collections::HashMap;

/// What a single value of a field is.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Scalar,
    /// Full name of the enum type.
    Enum(String),
    /// The message type. Its converters are still resolved by full name.
    Message(MessageDescriptor),
}

/// How the values of a field are laid out.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Single(Element),
    List(Element),
    /// Map field, converted through the converters of the entry's `value` field.
    Map { value_field: String },
}

impl Shape {
    pub fn of(field: &FieldDescriptor) -> Shape {
        let element = match field.kind() {
            Kind::Message(message_type) => Element::Message(message_type),
            Kind::Enum(enum_type) => Element::Enum(enum_type.full_name().to_owned()),
            _ => Element::Scalar,
        };

        match field.kind() {
            Kind::Message(entry) if field.is_map() => Shape::Map {
                value_field: entry.map_entry_value_field().full_name().to_owned(),
            },
            _ if field.is_list() => Shape::List(element),
            _ => Shape::Single(element),
        }
    }

    pub(crate) fn field_to_data(self, field: String) -> FieldToData {
        Box::new(move |ns: &Namespace, value: Option<&Value>| -> Result<Data, CastError> {
            let value = match value {
                Some(value) => value,
                None => return Ok(Data::Null),
            };

            match (&self, value) {
                (Shape::Single(element), value) => element.to_data(ns, &field, value),

                (Shape::List(element), Value::List(items)) => items
                    .iter()
                    .map(|item| element.to_data(ns, &field, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Data::List),

                (Shape::Map { value_field }, Value::Map(entries)) => {
                    let cast = ns.field_to_data(value_field)?;
                    let mut map = IndexMap::with_capacity(entries.len());
                    for (key, value) in entries {
                        map.insert(key_to_data(key), cast(ns, Some(value))?);
                    }
                    map.sort_keys();
                    Ok(Data::Map(map))
                }

                (_, other) => Err(CastError::mismatch(&field, format!("unexpected value {:?}", other))),
            }
        })
    }

    pub(crate) fn data_to_field(self, field: String) -> DataToField {
        Box::new(move |ns: &Namespace, data: &Data| -> Result<Option<Value>, CastError> {
            if data.is_null() {
                return Ok(None);
            }

            let value = match self {
                Shape::Single(ref element) => element.to_value(ns, &field, data)?,

                Shape::List(ref element) => match *data {
                    Data::List(ref items) => Value::List(
                        items
                            .iter()
                            .map(|item| element.to_value(ns, &field, item))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    ref other => {
                        return Err(CastError::mismatch(
                            &field,
                            format!("expected a list, found {}", other.kind()),
                        ))
                    }
                },

                Shape::Map { ref value_field } => {
                    let cast = ns.data_to_field(value_field)?;
                    let mut entries = HashMap::with_capacity(data.len());
                    for (key, item) in map_entries(&field, data)? {
                        let value = cast(ns, item)?.ok_or_else(|| {
                            CastError::mismatch(&field, format!("missing value for key {:?}", key))
                        })?;
                        entries.insert(key, value);
                    }
                    Value::Map(entries)
                }
            };

            Ok(Some(value))
        })
    }
}

impl Element {
    fn to_data(&self, ns: &Namespace, field: &str, value: &Value) -> Result<Data, CastError> {
        match (self, value) {
            (Element::Scalar, value) => scalar_to_data(field, value),
            (Element::Enum(enum_type), Value::EnumNumber(code)) => ns.enum_name(enum_type, *code),
            (Element::Message(message_type), Value::Message(message)) => {
                (ns.message_to_data(message_type.full_name())?)(ns, message)
            }
            (_, other) => Err(CastError::mismatch(field, format!("unexpected value {:?}", other))),
        }
    }

    fn to_value(&self, ns: &Namespace, field: &str, data: &Data) -> Result<Value, CastError> {
        match *self {
            Element::Scalar => data_to_scalar(field, data),
            Element::Enum(ref enum_type) => Ok(Value::EnumNumber(ns.enum_code(enum_type, data)?)),
            Element::Message(ref message_type) => {
                let cast = ns.data_to_message(message_type.full_name())?;
                Ok(Value::Message(cast(ns, message_type, data)?))
            }
        }
    }
}

/// A field of a message as seen by the message-level converters.
#[derive(Clone, Debug)]
pub(crate) struct FieldPlan {
    name:       String,
    full_name:  String,
    descriptor: FieldDescriptor,
    /// Unset values are reported as `Data::Null` instead of their default.
    presence:   bool,
}

impl FieldPlan {
    pub(crate) fn of(message_type: &MessageDescriptor) -> Vec<FieldPlan> {
        message_type
            .fields()
            .map(|field| FieldPlan {
                name:       field.name().to_owned(),
                full_name:  field.full_name().to_owned(),
                presence:   field.supports_presence(),
                descriptor: field,
            })
            .collect()
    }
}

pub(crate) fn message_to_data(plan: Vec<FieldPlan>) -> MessageToData {
    Box::new(move |ns: &Namespace, message: &DynamicMessage| -> Result<Data, CastError> {
        let mut record = Record::with_capacity(plan.len());
        for field in &plan {
            let value = if field.presence && !message.has_field(&field.descriptor) {
                None
            } else {
                Some(message.get_field(&field.descriptor))
            };
            let data = (ns.field_to_data(&field.full_name)?)(ns, value.as_deref())?;
            record.insert(field.name.clone(), data);
        }
        Ok(ns.build_record(record))
    })
}

pub(crate) fn data_to_message(message_type: String, plan: Vec<FieldPlan>) -> DataToMessage {
    Box::new(move |ns: &Namespace, _: &MessageDescriptor, data: &Data| -> Result<DynamicMessage, CastError> {
        if !data.is_container() {
            return Err(CastError::mismatch(
                &message_type,
                format!("expected a container, found {}", data.kind()),
            ));
        }

        let mut message = DynamicMessage::new(ns.constructor(&message_type)?.clone());
        for field in &plan {
            let item = data
                .get(&field.name)
                .ok_or_else(|| CastError::MissingField(field.full_name.clone()))?;
            if let Some(value) = (ns.data_to_field(&field.full_name)?)(ns, item)? {
                // Defaults of fields without presence stay unset, as on the wire.
                if !field.presence && value == Value::default_value_for_field(&field.descriptor) {
                    continue;
                }
                message
                    .try_set_field(&field.descriptor, value)
                    .map_err(|err| CastError::mismatch(&field.full_name, err.to_string()))?;
            }
        }
        Ok(message)
    })
}

pub(crate) fn scalar_to_data(field: &str, value: &Value) -> Result<Data, CastError> {
    Ok(match *value {
        Value::Bool(value) => Data::Bool(value),
        Value::I32(value) => Data::I32(value),
        Value::I64(value) => Data::I64(value),
        Value::U32(value) => Data::U32(value),
        Value::U64(value) => Data::U64(value),
        Value::F32(value) => Data::F32(value),
        Value::F64(value) => Data::F64(value),
        Value::String(ref value) => Data::String(value.clone()),
        Value::Bytes(ref value) => Data::Bytes(value.to_vec()),
        Value::EnumNumber(value) => Data::I32(value),
        ref other => {
            return Err(CastError::mismatch(field, format!("expected a scalar, found {:?}", other)))
        }
    })
}

/// Scalars pass through as-is: an `I64` is never narrowed into an `int32`
/// field, the mismatch surfaces when the value is set on the message.
pub(crate) fn data_to_scalar(field: &str, data: &Data) -> Result<Value, CastError> {
    Ok(match *data {
        Data::Bool(value) => Value::Bool(value),
        Data::I32(value) => Value::I32(value),
        Data::I64(value) => Value::I64(value),
        Data::U32(value) => Value::U32(value),
        Data::U64(value) => Value::U64(value),
        Data::F32(value) => Value::F32(value),
        Data::F64(value) => Value::F64(value),
        Data::String(ref value) => Value::String(value.clone()),
        Data::Bytes(ref value) => Value::Bytes(Bytes::from(value.clone())),
        ref other => {
            return Err(CastError::mismatch(
                field,
                format!("expected a scalar, found {}", other.kind()),
            ))
        }
    })
}

fn key_to_data(key: &MapKey) -> Key {
    match *key {
        MapKey::Bool(value) => Key::Bool(value),
        MapKey::I32(value) => Key::I32(value),
        MapKey::I64(value) => Key::I64(value),
        MapKey::U32(value) => Key::U32(value),
        MapKey::U64(value) => Key::U64(value),
        MapKey::String(ref value) => Key::String(value.clone()),
    }
}

fn data_to_key(key: &Key) -> MapKey {
    match *key {
        Key::Bool(value) => MapKey::Bool(value),
        Key::I32(value) => MapKey::I32(value),
        Key::I64(value) => MapKey::I64(value),
        Key::U32(value) => MapKey::U32(value),
        Key::U64(value) => MapKey::U64(value),
        Key::String(ref value) => MapKey::String(value.clone()),
    }
}

/// Entries of a map field given either as a keyed map or, for string keys,
/// as a record.
fn map_entries<'d>(field: &str, data: &'d Data) -> Result<Vec<(MapKey, &'d Data)>, CastError> {
    match *data {
        Data::Map(ref entries) => Ok(entries
            .iter()
            .map(|(key, value)| (data_to_key(key), value))
            .collect()),
        Data::Record(ref record) => Ok(record
            .iter()
            .map(|(name, value)| (MapKey::String(name.to_owned()), value))
            .collect()),
        ref other => Err(CastError::mismatch(
            field,
            format!("expected a map, found {}", other.kind()),
        )),
    }
}
