//! The shared set of named converter slots.
//!
//! Every compiled converter receives the [Namespace] when it is called and
//! resolves its collaborators by schema full name at that moment. A converter
//! never holds on to another converter, which is what allows a message to be
//! compiled before the messages it refers to (or while they are still being
//! compiled, for recursive schemas).

use crate::error::CastError;
use dynacast_schema::{Data, Record};
use prost_reflect::{DynamicMessage, MessageDescriptor, Value};
use std::collections::HashMap;
use std::fmt;

pub type MessageToData =
    Box<dyn Fn(&Namespace, &DynamicMessage) -> Result<Data, CastError> + Send + Sync>;
/// Also receives the descriptor of the message to build, so built-in
/// converters work before the type is registered.
pub type DataToMessage = Box<
    dyn Fn(&Namespace, &MessageDescriptor, &Data) -> Result<DynamicMessage, CastError> + Send + Sync,
>;
/// `None` stands for a field without a value (unset sub-message or optional).
pub type FieldToData =
    Box<dyn Fn(&Namespace, Option<&Value>) -> Result<Data, CastError> + Send + Sync>;
/// Returns `None` when the field should be left unset.
pub type DataToField =
    Box<dyn Fn(&Namespace, &Data) -> Result<Option<Value>, CastError> + Send + Sync>;
/// Wraps every record produced for a message.
pub type RecordBuilder = Box<dyn Fn(Record) -> Data + Send + Sync>;

/// Enum code to short name. `None` names map to [Data::Null].
pub type EnumNames = HashMap<i32, Option<String>>;
/// Short name to enum code, the inverse of [EnumNames].
pub type EnumCodes = HashMap<Option<String>, i32>;

/// Identifies one of the maps held by a [Namespace].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    MessageToData,
    DataToMessage,
    FieldToData,
    DataToField,
    EnumNames,
    EnumCodes,
    Constructor,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match *self {
            Slot::MessageToData => "message-to-data converter",
            Slot::DataToMessage => "data-to-message converter",
            Slot::FieldToData => "field-to-data converter",
            Slot::DataToField => "data-to-field converter",
            Slot::EnumNames => "enum name table",
            Slot::EnumCodes => "enum code table",
            Slot::Constructor => "message constructor",
        };
        f.write_str(text)
    }
}

/// Named converter slots, one map per direction and per kind.
///
/// Keys are always schema full names. A populated key is never overwritten:
/// the first registration wins, so built-in converters survive later
/// generic registration of the same type.
pub struct Namespace {
    record:       RecordBuilder,
    m2p:          HashMap<String, MessageToData>,
    p2m:          HashMap<String, DataToMessage>,
    f2p:          HashMap<String, FieldToData>,
    p2f:          HashMap<String, DataToField>,
    i2s:          HashMap<String, EnumNames>,
    s2i:          HashMap<String, EnumCodes>,
    constructors: HashMap<String, MessageDescriptor>,
}

impl Namespace {
    pub(crate) fn new(record: RecordBuilder) -> Namespace {
        Namespace {
            record,
            m2p:          HashMap::new(),
            p2m:          HashMap::new(),
            f2p:          HashMap::new(),
            p2f:          HashMap::new(),
            i2s:          HashMap::new(),
            s2i:          HashMap::new(),
            constructors: HashMap::new(),
        }
    }

    /// Whether `name` is populated in the given slot.
    pub fn contains(&self, slot: Slot, name: &str) -> bool {
        match slot {
            Slot::MessageToData => self.m2p.contains_key(name),
            Slot::DataToMessage => self.p2m.contains_key(name),
            Slot::FieldToData => self.f2p.contains_key(name),
            Slot::DataToField => self.p2f.contains_key(name),
            Slot::EnumNames => self.i2s.contains_key(name),
            Slot::EnumCodes => self.s2i.contains_key(name),
            Slot::Constructor => self.constructors.contains_key(name),
        }
    }

    pub fn message_to_data(&self, name: &str) -> Result<&MessageToData, CastError> {
        self.m2p
            .get(name)
            .ok_or_else(|| CastError::unknown(Slot::MessageToData, name))
    }

    pub fn data_to_message(&self, name: &str) -> Result<&DataToMessage, CastError> {
        self.p2m
            .get(name)
            .ok_or_else(|| CastError::unknown(Slot::DataToMessage, name))
    }

    pub fn field_to_data(&self, name: &str) -> Result<&FieldToData, CastError> {
        self.f2p
            .get(name)
            .ok_or_else(|| CastError::unknown(Slot::FieldToData, name))
    }

    pub fn data_to_field(&self, name: &str) -> Result<&DataToField, CastError> {
        self.p2f
            .get(name)
            .ok_or_else(|| CastError::unknown(Slot::DataToField, name))
    }

    pub fn enum_names(&self, name: &str) -> Result<&EnumNames, CastError> {
        self.i2s
            .get(name)
            .ok_or_else(|| CastError::unknown(Slot::EnumNames, name))
    }

    pub fn enum_codes(&self, name: &str) -> Result<&EnumCodes, CastError> {
        self.s2i
            .get(name)
            .ok_or_else(|| CastError::unknown(Slot::EnumCodes, name))
    }

    pub fn constructor(&self, name: &str) -> Result<&MessageDescriptor, CastError> {
        self.constructors
            .get(name)
            .ok_or_else(|| CastError::unknown(Slot::Constructor, name))
    }

    /// Short name of `code` in `enum_type`, or [Data::Null] for nameless codes.
    pub fn enum_name(&self, enum_type: &str, code: i32) -> Result<Data, CastError> {
        match self.enum_names(enum_type)?.get(&code) {
            Some(Some(name)) => Ok(Data::String(name.clone())),
            Some(None) => Ok(Data::Null),
            None => Err(CastError::UnknownEnumValue {
                enum_type: enum_type.to_owned(),
                value:     code.to_string(),
            }),
        }
    }

    /// Code of the short name held by `data` in `enum_type`.
    pub fn enum_code(&self, enum_type: &str, data: &Data) -> Result<i32, CastError> {
        let name = match *data {
            Data::String(ref name) => Some(name.clone()),
            Data::Null => None,
            ref other => {
                return Err(CastError::mismatch(
                    enum_type,
                    format!("expected an enum name, found {}", other.kind()),
                ))
            }
        };
        match self.enum_codes(enum_type)?.get(&name) {
            Some(code) => Ok(*code),
            None => Err(CastError::UnknownEnumValue {
                enum_type: enum_type.to_owned(),
                value:     format!("{:?}", data),
            }),
        }
    }

    /// Runs the registry's record builder.
    pub fn build_record(&self, record: Record) -> Data {
        (self.record)(record)
    }

    pub(crate) fn insert_message_to_data(&mut self, name: &str, cast: MessageToData) -> bool {
        insert_once(&mut self.m2p, name, cast)
    }

    pub(crate) fn insert_data_to_message(&mut self, name: &str, cast: DataToMessage) -> bool {
        insert_once(&mut self.p2m, name, cast)
    }

    pub(crate) fn insert_field_to_data(&mut self, name: &str, cast: FieldToData) -> bool {
        insert_once(&mut self.f2p, name, cast)
    }

    pub(crate) fn insert_data_to_field(&mut self, name: &str, cast: DataToField) -> bool {
        insert_once(&mut self.p2f, name, cast)
    }

    pub(crate) fn insert_enum(&mut self, name: &str, names: EnumNames, codes: EnumCodes) -> bool {
        let inserted = insert_once(&mut self.i2s, name, names);
        insert_once(&mut self.s2i, name, codes) || inserted
    }

    pub(crate) fn insert_constructor(&mut self, name: &str, descriptor: MessageDescriptor) -> bool {
        insert_once(&mut self.constructors, name, descriptor)
    }

    /// Drops both message converters of `name`. Only used to undo a failed
    /// registration.
    pub(crate) fn forget_message(&mut self, name: &str) {
        self.m2p.remove(name);
        self.p2m.remove(name);
    }
}

fn insert_once<V>(map: &mut HashMap<String, V>, name: &str, value: V) -> bool {
    if map.contains_key(name) {
        return false;
    }
    map.insert(name.to_owned(), value);
    true
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("m2p", &self.m2p.len())
            .field("p2m", &self.p2m.len())
            .field("f2p", &self.f2p.len())
            .field("p2f", &self.p2f.len())
            .field("i2s", &self.i2s.len())
            .field("s2i", &self.s2i.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
