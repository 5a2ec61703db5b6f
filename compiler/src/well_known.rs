//! `google.protobuf.*` types that do not follow the generic conversion.

use crate::{
    cast::{data_to_scalar, scalar_to_data},
    error::CastError,
    namespace::{DataToMessage, Namespace},
};
use dynacast_schema::Data;
use prost_reflect::{DynamicMessage, FieldDescriptor, MessageDescriptor, ReflectMessage, Value};
use std::collections::HashMap;

/// The `NullValue` enum of `struct.proto`, converted to and from [Data::Null].
pub const NULL_VALUE: &str = "google.protobuf.NullValue";

/// Messages of `wrappers.proto`. They convert to the bare scalar they wrap.
pub const WRAPPER_TYPES: [&str; 9] = [
    "google.protobuf.DoubleValue",
    "google.protobuf.FloatValue",
    "google.protobuf.Int64Value",
    "google.protobuf.UInt64Value",
    "google.protobuf.Int32Value",
    "google.protobuf.UInt32Value",
    "google.protobuf.BoolValue",
    "google.protobuf.StringValue",
    "google.protobuf.BytesValue",
];

/// Messages whose conversion always fails with [CastError::Unsupported].
pub const UNSUPPORTED_TYPES: [&str; 7] = [
    "google.protobuf.ListValue",
    "google.protobuf.Struct",
    "google.protobuf.Value",
    "google.protobuf.Any",
    "google.protobuf.Duration",
    "google.protobuf.FieldMask",
    "google.protobuf.Timestamp",
];

/// Pre-populates `ns` with the built-in converters.
///
/// Wrappers are built from the descriptor handed to the converter, which
/// belongs to the caller's pool.
pub(crate) fn bootstrap(ns: &mut Namespace) {
    ns.insert_enum(
        NULL_VALUE,
        HashMap::from([(0, None)]),
        HashMap::from([(None, 0)]),
    );

    for full_name in WRAPPER_TYPES {
        ns.insert_message_to_data(
            full_name,
            Box::new(|_: &Namespace, message: &DynamicMessage| unwrap_scalar(message)),
        );
        ns.insert_data_to_message(full_name, wrap_scalar());
    }

    for full_name in UNSUPPORTED_TYPES {
        ns.insert_message_to_data(
            full_name,
            Box::new(move |_: &Namespace, _: &DynamicMessage| -> Result<Data, CastError> {
                Err(CastError::Unsupported(full_name.to_owned()))
            }),
        );
        ns.insert_data_to_message(
            full_name,
            Box::new(move |_: &Namespace, _: &MessageDescriptor, _: &Data| -> Result<DynamicMessage, CastError> {
                Err(CastError::Unsupported(full_name.to_owned()))
            }),
        );
    }
}

fn unwrap_scalar(message: &DynamicMessage) -> Result<Data, CastError> {
    let descriptor = message.descriptor();
    let field = value_field(&descriptor)?;
    scalar_to_data(field.full_name(), &message.get_field(&field))
}

fn wrap_scalar() -> DataToMessage {
    Box::new(|_: &Namespace, descriptor: &MessageDescriptor, data: &Data| -> Result<DynamicMessage, CastError> {
        let field = value_field(descriptor)?;
        let value = data_to_scalar(field.full_name(), data)?;
        let mut message = DynamicMessage::new(descriptor.clone());
        if value != Value::default_value_for_field(&field) {
            message
                .try_set_field(&field, value)
                .map_err(|err| CastError::mismatch(field.full_name(), err.to_string()))?;
        }
        Ok(message)
    })
}

fn value_field(descriptor: &MessageDescriptor) -> Result<FieldDescriptor, CastError> {
    descriptor
        .get_field_by_name("value")
        .ok_or_else(|| CastError::MissingField(format!("{}.value", descriptor.full_name())))
}
