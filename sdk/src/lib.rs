//! dynacast
//!
//! Runtime facade over the dynacast compiler:
//!
//! - `Registry`, `CastError` and the container types (re-exported)
//! - loading a `FileDescriptorSet` written by `protoc --descriptor_set_out`
//! - one-shot helpers between protobuf wire bytes, containers and JSON

pub use dynacast_compiler::error::CastError;
pub use dynacast_compiler::{create_enum_map, pascal_to_snake, snake_to_pascal, EnumMap, Mode, Registry};
pub use dynacast_schema::{Data, Key, Record};

use prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, EnumDescriptor, MessageDescriptor};
use std::fs;
use std::path::Path;

/// Reads a binary `FileDescriptorSet` into a new pool.
pub fn load_descriptor_pool(path: impl AsRef<Path>) -> Result<DescriptorPool, CastError> {
    let bytes = fs::read(path)?;
    Ok(DescriptorPool::decode(bytes.as_slice())?)
}

pub fn message_descriptor(pool: &DescriptorPool, full_name: &str) -> Result<MessageDescriptor, CastError> {
    pool.get_message_by_name(full_name).ok_or_else(|| CastError::UnknownSchema {
        slot: compiler::Slot::Constructor,
        name: full_name.to_owned(),
    })
}

pub fn enum_descriptor(pool: &DescriptorPool, full_name: &str) -> Result<EnumDescriptor, CastError> {
    pool.get_enum_by_name(full_name).ok_or_else(|| CastError::UnknownSchema {
        slot: compiler::Slot::EnumNames,
        name: full_name.to_owned(),
    })
}

/// Decodes a protobuf payload of `message_type` into a container.
/// `message_type` must already be registered.
pub fn decode_to_container(
    registry: &Registry,
    message_type: &MessageDescriptor,
    buffer: &[u8],
) -> Result<Data, CastError> {
    let message = DynamicMessage::decode(message_type.clone(), buffer)?;
    registry.to_container(&message)
}

/// Decode a protobuf payload into a pretty-printed JSON string.
pub fn decode_to_json(
    registry: &Registry,
    message_type: &MessageDescriptor,
    buffer: &[u8],
) -> Result<String, CastError> {
    let data = decode_to_container(registry, message_type, buffer)?;
    Ok(serde_json::to_string_pretty(&data)?)
}

/// Encodes `data` as a protobuf payload of `message_type`.
pub fn encode_from_container(
    registry: &Registry,
    message_type: &MessageDescriptor,
    data: &Data,
) -> Result<Vec<u8>, CastError> {
    let message = registry.to_message(message_type, data)?;
    Ok(message.encode_to_vec())
}

pub mod compiler {
    pub use dynacast_compiler::{Namespace, Slot};
}

pub mod error {
    pub use dynacast_compiler::error::CastError;
}

pub mod schema {
    pub use dynacast_schema::{Data, Key, Record};
}
