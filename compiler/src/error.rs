use crate::namespace::Slot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CastError {
    #[error("The {prefix:?} prefix is not common for all values of {enum_type}")]
    PrefixMismatch {
        enum_type: String,
        prefix:    String,
    },

    #[error("Conversion of {0} is not implemented")]
    Unsupported(String),

    #[error("No {slot} registered for {name}")]
    UnknownSchema {
        slot: Slot,
        name: String,
    },

    #[error("Unknown mode {0:?}")]
    InvalidMode(String),

    #[error("Enum {0} has aliased values")]
    AliasedEnum(String),

    #[error("Unknown value {value} for enum {enum_type}")]
    UnknownEnumValue {
        enum_type: String,
        value:     String,
    },

    #[error("Missing required field \"{0}\"")]
    MissingField(String),

    #[error("Type mismatch for {field}: {message}")]
    TypeMismatch {
        field:   String,
        message: String,
    },

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CastError {
    pub(crate) fn mismatch(field: &str, message: impl Into<String>) -> CastError {
        CastError::TypeMismatch {
            field:   field.to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn unknown(slot: Slot, name: &str) -> CastError {
        CastError::UnknownSchema {
            slot,
            name: name.to_owned(),
        }
    }
}
