//! Descriptor fixtures written as `FileDescriptorProto`s, so the tests do not
//! need `protoc`.
#![allow(dead_code)]

use prost_reflect::{DescriptorPool, DynamicMessage, EnumDescriptor, MessageDescriptor, Value};
use prost_types::{
    field_descriptor_proto::{Label, Type},
    DescriptorProto, EnumDescriptorProto, EnumOptions, EnumValueDescriptorProto,
    FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet, MessageOptions,
    OneofDescriptorProto,
};

pub fn field(name: &str, number: i32, ty: Type, label: Label, type_name: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        type_name: type_name.map(str::to_owned),
        ..Default::default()
    }
}

pub fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    field(name, number, ty, Label::Optional, None)
}

pub fn repeated(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    field(name, number, ty, Label::Repeated, None)
}

pub fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    field(name, number, Type::Message, Label::Optional, Some(type_name))
}

pub fn repeated_message(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    field(name, number, Type::Message, Label::Repeated, Some(type_name))
}

pub fn enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    field(name, number, Type::Enum, Label::Optional, Some(type_name))
}

pub fn repeated_enum(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    field(name, number, Type::Enum, Label::Repeated, Some(type_name))
}

/// A proto3 `optional` field, backed by its synthetic oneof.
pub fn optional(name: &str, number: i32, ty: Type, oneof_index: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        oneof_index: Some(oneof_index),
        proto3_optional: Some(true),
        ..scalar(name, number, ty)
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_owned()),
        field: fields,
        ..Default::default()
    }
}

/// The synthetic `<Name>Entry` message of a `map<K, V>` field.
pub fn map_entry(name: &str, key: Type, value: FieldDescriptorProto) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_owned()),
        field: vec![scalar("key", 1, key), FieldDescriptorProto { number: Some(2), name: Some("value".to_owned()), ..value }],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn map_field(name: &str, number: i32, entry_type: &str) -> FieldDescriptorProto {
    repeated_message(name, number, entry_type)
}

pub fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_owned()),
        value: values
            .iter()
            .map(|(value, number)| EnumValueDescriptorProto {
                name: Some((*value).to_owned()),
                number: Some(*number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn file(name: &str, package: &str, dependency: &[&str]) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_owned()),
        package: Some(package.to_owned()),
        dependency: dependency.iter().map(|d| (*d).to_owned()).collect(),
        syntax: Some("proto3".to_owned()),
        ..Default::default()
    }
}

fn wrappers_file() -> FileDescriptorProto {
    FileDescriptorProto {
        message_type: vec![
            message("Int32Value", vec![scalar("value", 1, Type::Int32)]),
            message("Int64Value", vec![scalar("value", 1, Type::Int64)]),
            message("StringValue", vec![scalar("value", 1, Type::String)]),
            message("BoolValue", vec![scalar("value", 1, Type::Bool)]),
        ],
        ..file("google/protobuf/wrappers.proto", "google.protobuf", &[])
    }
}

fn timestamp_file() -> FileDescriptorProto {
    FileDescriptorProto {
        message_type: vec![message(
            "Timestamp",
            vec![scalar("seconds", 1, Type::Int64), scalar("nanos", 2, Type::Int32)],
        )],
        ..file("google/protobuf/timestamp.proto", "google.protobuf", &[])
    }
}

fn struct_file() -> FileDescriptorProto {
    FileDescriptorProto {
        enum_type: vec![enumeration("NullValue", &[("NULL_VALUE", 0)])],
        ..file("google/protobuf/struct.proto", "google.protobuf", &[])
    }
}

/// `test.proto`:
///
/// ```proto
/// enum Color { COLOR_RED = 0; COLOR_BLUE = 1; }
/// enum Plain { RED = 0; BLUE = 1; }
/// message Node { int32 value = 1; Node next = 2; }
/// message Tagged { map<string, string> tags = 1; }
/// message Sample {
///   string name = 1;
///   int64 count = 2;
///   Color color = 3;
///   repeated Color palette = 4;
///   repeated int32 numbers = 5;
///   Node head = 6;
///   repeated Node nodes = 7;
///   map<int32, Node> by_id = 8;
///   google.protobuf.Int32Value maybe = 9;
///   bytes blob = 10;
///   optional string nickname = 11;
///   google.protobuf.NullValue nothing = 12;
///   double ratio = 13;
///   bool flag = 14;
///   map<string, Color> color_by_name = 15;
///   message Inner { Plain plain = 1; }
///   Inner inner = 16;
/// }
/// message Event { string name = 1; google.protobuf.Timestamp at = 2; }
/// message Left { Right right = 1; int32 depth = 2; }
/// message Right { Left left = 1; string tag = 2; }
/// ```
fn test_file() -> FileDescriptorProto {
    let sample = DescriptorProto {
        nested_type: vec![
            map_entry("ByIdEntry", Type::Int32, message_field("value", 2, ".test.Node")),
            map_entry("ColorByNameEntry", Type::String, enum_field("value", 2, ".test.Color")),
            message("Inner", vec![enum_field("plain", 1, ".test.Plain")]),
        ],
        oneof_decl: vec![OneofDescriptorProto {
            name: Some("_nickname".to_owned()),
            ..Default::default()
        }],
        ..message(
            "Sample",
            vec![
                scalar("name", 1, Type::String),
                scalar("count", 2, Type::Int64),
                enum_field("color", 3, ".test.Color"),
                repeated_enum("palette", 4, ".test.Color"),
                repeated("numbers", 5, Type::Int32),
                message_field("head", 6, ".test.Node"),
                repeated_message("nodes", 7, ".test.Node"),
                map_field("by_id", 8, ".test.Sample.ByIdEntry"),
                message_field("maybe", 9, ".google.protobuf.Int32Value"),
                scalar("blob", 10, Type::Bytes),
                optional("nickname", 11, Type::String, 0),
                enum_field("nothing", 12, ".google.protobuf.NullValue"),
                scalar("ratio", 13, Type::Double),
                scalar("flag", 14, Type::Bool),
                map_field("color_by_name", 15, ".test.Sample.ColorByNameEntry"),
                message_field("inner", 16, ".test.Sample.Inner"),
            ],
        )
    };

    let tagged = DescriptorProto {
        nested_type: vec![map_entry("TagsEntry", Type::String, scalar("value", 2, Type::String))],
        ..message("Tagged", vec![map_field("tags", 1, ".test.Tagged.TagsEntry")])
    };

    FileDescriptorProto {
        enum_type: vec![
            enumeration("Color", &[("COLOR_RED", 0), ("COLOR_BLUE", 1)]),
            enumeration("Plain", &[("RED", 0), ("BLUE", 1)]),
        ],
        message_type: vec![
            message(
                "Node",
                vec![scalar("value", 1, Type::Int32), message_field("next", 2, ".test.Node")],
            ),
            tagged,
            sample,
            message(
                "Event",
                vec![
                    scalar("name", 1, Type::String),
                    message_field("at", 2, ".google.protobuf.Timestamp"),
                ],
            ),
            message(
                "Left",
                vec![message_field("right", 1, ".test.Right"), scalar("depth", 2, Type::Int32)],
            ),
            message(
                "Right",
                vec![message_field("left", 1, ".test.Left"), scalar("tag", 2, Type::String)],
            ),
        ],
        ..file(
            "test.proto",
            "test",
            &[
                "google/protobuf/wrappers.proto",
                "google/protobuf/timestamp.proto",
                "google/protobuf/struct.proto",
            ],
        )
    }
}

/// `broken.proto`, holding an enum with aliased values.
///
/// ```proto
/// enum Level { option allow_alias = true; LEVEL_LOW = 0; LEVEL_MIN = 0; }
/// message Holder { Level level = 1; }
/// message Outer { int32 id = 1; Holder holder = 2; }
/// ```
fn broken_file() -> FileDescriptorProto {
    FileDescriptorProto {
        enum_type: vec![EnumDescriptorProto {
            options: Some(EnumOptions {
                allow_alias: Some(true),
                ..Default::default()
            }),
            ..enumeration("Level", &[("LEVEL_LOW", 0), ("LEVEL_MIN", 0)])
        }],
        message_type: vec![
            message("Holder", vec![enum_field("level", 1, ".broken.Level")]),
            message(
                "Outer",
                vec![scalar("id", 1, Type::Int32), message_field("holder", 2, ".broken.Holder")],
            ),
        ],
        ..file("broken.proto", "broken", &[])
    }
}

pub fn file_descriptor_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![wrappers_file(), timestamp_file(), struct_file(), test_file()],
    }
}

pub fn pool() -> DescriptorPool {
    DescriptorPool::from_file_descriptor_set(file_descriptor_set()).expect("valid test descriptors")
}

pub fn broken_pool() -> DescriptorPool {
    DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
        file: vec![broken_file()],
    })
    .expect("valid broken descriptors")
}

pub fn message_type(pool: &DescriptorPool, name: &str) -> MessageDescriptor {
    pool.get_message_by_name(name)
        .unwrap_or_else(|| panic!("message {name} in pool"))
}

pub fn enum_type(pool: &DescriptorPool, name: &str) -> EnumDescriptor {
    pool.get_enum_by_name(name)
        .unwrap_or_else(|| panic!("enum {name} in pool"))
}

/// Builds a message from `(field name, value)` pairs.
pub fn build(descriptor: &MessageDescriptor, fields: Vec<(&str, Value)>) -> DynamicMessage {
    let mut message = DynamicMessage::new(descriptor.clone());
    for (name, value) in fields {
        message.set_field_by_name(name, value);
    }
    message
}

/// `Node { value: 1, next: Node { value: 2, next: ... } }` with `depth` nodes.
pub fn chain(node: &MessageDescriptor, depth: i32) -> DynamicMessage {
    let mut message = build(node, vec![("value", Value::I32(depth))]);
    for value in (1..depth).rev() {
        message = build(
            node,
            vec![("value", Value::I32(value)), ("next", Value::Message(message))],
        );
    }
    message
}
