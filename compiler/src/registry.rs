use crate::{
    cast::{self, FieldPlan, Shape},
    enums::{enum_values, prefix_len},
    error::CastError,
    namespace::{EnumCodes, EnumNames, Namespace, RecordBuilder, Slot},
    well_known,
};
use dynacast_schema::{Data, Record};
use prost_reflect::{
    DescriptorPool, DynamicMessage, EnumDescriptor, FieldDescriptor, FileDescriptor, Kind,
    MessageDescriptor, ReflectMessage,
};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Registry of converters between protobuf messages and [Data] containers.
///
/// Converters are compiled once per schema, on registration, and cached by
/// full name. Converting a message afterwards only runs the cached closures.
///
/// Compared to the proto3 JSON mapping:
/// - messages become a [Record] (or whatever the record builder makes of it)
///   holding every declared field, in declaration order;
/// - fields with presence that are unset become [Data::Null], other fields
///   carry their default value;
/// - keys are the field names of the `.proto` file;
/// - enum values are names with the common prefix removed;
/// - map keys keep their protobuf type;
/// - wrapper types become bare scalars.
///
/// Registration needs `&mut self` and conversion `&self`, so conversions may
/// run concurrently once every involved schema is registered.
pub struct Registry {
    ns:          Namespace,
    registering: HashSet<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Registry {
    /// Creates a registry producing plain [Data::Record] containers.
    pub fn new() -> Registry {
        Registry::with_record_builder(Data::Record)
    }

    /// Creates a registry passing every converted message through `builder`.
    pub fn with_record_builder<F>(builder: F) -> Registry
    where
        F: Fn(Record) -> Data + Send + Sync + 'static,
    {
        let record: RecordBuilder = Box::new(builder);
        let mut ns = Namespace::new(record);
        well_known::bootstrap(&mut ns);
        Registry {
            ns,
            registering: HashSet::new(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    /// Whether messages of `full_name` can be converted.
    pub fn is_registered(&self, full_name: &str) -> bool {
        self.ns.contains(Slot::MessageToData, full_name)
    }

    /// Whether `full_name` is a message currently being registered.
    pub fn is_registering(&self, full_name: &str) -> bool {
        self.registering.contains(full_name)
    }

    pub fn enum_names(&self, full_name: &str) -> Result<&EnumNames, CastError> {
        self.ns.enum_names(full_name)
    }

    pub fn enum_codes(&self, full_name: &str) -> Result<&EnumCodes, CastError> {
        self.ns.enum_codes(full_name)
    }

    /// Registers `enum_type`, removing the conventional `ENUM_NAME_` prefix
    /// from its value names when every value carries it.
    pub fn register_enum(&mut self, enum_type: &EnumDescriptor) -> Result<(), CastError> {
        self.insert_enum(enum_type, None)
    }

    /// Registers `enum_type`, removing `prefix` from its value names. Fails
    /// if some value does not start with `prefix`.
    pub fn register_enum_with_prefix(
        &mut self,
        enum_type: &EnumDescriptor,
        prefix: &str,
    ) -> Result<(), CastError> {
        self.insert_enum(enum_type, Some(prefix))
    }

    fn insert_enum(&mut self, enum_type: &EnumDescriptor, prefix: Option<&str>) -> Result<(), CastError> {
        let full_name = enum_type.full_name();
        if self.ns.contains(Slot::EnumNames, full_name) {
            // The stored projection stays, but an explicit prefix is still checked.
            if prefix.is_some() {
                prefix_len(enum_type, prefix)?;
            }
            return Ok(());
        }

        let threshold = prefix_len(enum_type, prefix)?;
        let pairs = enum_values(enum_type, threshold);
        let names: EnumNames = pairs.iter().map(|(name, code)| (*code, Some(name.clone()))).collect();
        let codes: EnumCodes = pairs.into_iter().map(|(name, code)| (Some(name), code)).collect();
        self.ns.insert_enum(full_name, names, codes);

        debug!(enum_type = full_name, stripped = threshold, "registered enum");
        Ok(())
    }

    /// Compiles both converters of `message_type` and, transitively, of every
    /// type it refers to. Registering a type twice is a no-op.
    pub fn register_message(&mut self, message_type: &MessageDescriptor) -> Result<(), CastError> {
        let full_name = message_type.full_name();

        // Built-in converters exist before any descriptor is seen.
        if self.ns.contains(Slot::MessageToData, full_name) {
            self.ns.insert_constructor(full_name, message_type.clone());
            return Ok(());
        }

        self.registering.insert(full_name.to_owned());
        let outcome = self.compile_message(message_type);
        self.registering.remove(full_name);

        if let Err(ref err) = outcome {
            self.ns.forget_message(full_name);
            debug!(message_type = full_name, error = %err, "registration failed");
        }
        outcome
    }

    fn compile_message(&mut self, message_type: &MessageDescriptor) -> Result<(), CastError> {
        let full_name = message_type.full_name();
        let plan = FieldPlan::of(message_type);

        self.ns
            .insert_message_to_data(full_name, cast::message_to_data(plan.clone()));
        self.ns
            .insert_data_to_message(full_name, cast::data_to_message(full_name.to_owned(), plan));

        for field in message_type.fields() {
            self.register_field(&field)?;
        }

        self.ns.insert_constructor(full_name, message_type.clone());
        debug!(message_type = full_name, "registered message");
        Ok(())
    }

    /// Compiles both converters of `field`, registering the message or enum
    /// type it refers to first.
    pub fn register_field(&mut self, field: &FieldDescriptor) -> Result<(), CastError> {
        match field.kind() {
            Kind::Message(entry) if entry.is_map_entry() => {
                self.register_field(&entry.map_entry_value_field())?;
            }
            Kind::Message(nested) => {
                if !self.registering.contains(nested.full_name()) {
                    self.register_message(&nested)?;
                }
            }
            Kind::Enum(enum_type) => self.register_enum(&enum_type)?,
            _ => {}
        }

        let full_name = field.full_name();
        let shape = Shape::of(field);
        trace!(field = full_name, ?shape, "compiled field");
        self.ns
            .insert_field_to_data(full_name, shape.clone().field_to_data(full_name.to_owned()));
        self.ns
            .insert_data_to_field(full_name, shape.data_to_field(full_name.to_owned()));
        Ok(())
    }

    /// Registers every enum and message declared in `file`, nested ones
    /// included.
    pub fn register_file(&mut self, file: &FileDescriptor) -> Result<(), CastError> {
        for enum_type in file.enums() {
            self.register_enum(&enum_type)?;
        }
        for message_type in file.messages() {
            self.register_declarations(&message_type)?;
        }
        Ok(())
    }

    /// Registers every file of `pool`.
    pub fn register_pool(&mut self, pool: &DescriptorPool) -> Result<(), CastError> {
        for file in pool.files() {
            self.register_file(&file)?;
        }
        Ok(())
    }

    fn register_declarations(&mut self, message_type: &MessageDescriptor) -> Result<(), CastError> {
        if message_type.is_map_entry() {
            return Ok(());
        }
        for enum_type in message_type.child_enums() {
            self.register_enum(&enum_type)?;
        }
        self.register_message(message_type)?;
        for child in message_type.child_messages() {
            self.register_declarations(&child)?;
        }
        Ok(())
    }

    /// Converts `message` to a container.
    pub fn to_container(&self, message: &DynamicMessage) -> Result<Data, CastError> {
        let descriptor = message.descriptor();
        trace!(message_type = descriptor.full_name(), "message to container");
        let cast = self.ns.message_to_data(descriptor.full_name())?;
        cast(&self.ns, message)
    }

    /// Converts `data` to a message of `message_type`.
    pub fn to_message(
        &self,
        message_type: &MessageDescriptor,
        data: &Data,
    ) -> Result<DynamicMessage, CastError> {
        trace!(message_type = message_type.full_name(), "container to message");
        let cast = self.ns.data_to_message(message_type.full_name())?;
        cast(&self.ns, message_type, data)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("ns", &self.ns)
            .field("registering", &self.registering)
            .finish()
    }
}
