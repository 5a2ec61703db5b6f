use crate::{error::CastError, naming::pascal_to_snake};
use prost_reflect::EnumDescriptor;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Direction of an enum projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Integer codes to short names.
    Int2Str,
    /// Short names to integer codes.
    Str2Int,
}

impl FromStr for Mode {
    type Err = CastError;

    fn from_str(text: &str) -> Result<Mode, CastError> {
        match text {
            "int2str" => Ok(Mode::Int2Str),
            "str2int" => Ok(Mode::Str2Int),
            other => Err(CastError::InvalidMode(other.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Mode::Int2Str => f.write_str("int2str"),
            Mode::Str2Int => f.write_str("str2int"),
        }
    }
}

/// One direction of an enum projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumMap {
    Int2Str(BTreeMap<i32, String>),
    Str2Int(BTreeMap<String, i32>),
}

/// Builds the mapping between the codes and the short names of `enum_type`.
///
/// Short names have a common prefix removed. When `prefix` is `None` the
/// prefix follows the protobuf style guide: the enum name in upper snake case
/// plus a trailing underscore (`TaskState` -> `TASK_STATE_`). If some value
/// does not carry that derived prefix, a warning is logged and names are kept
/// whole. An explicit `prefix` must be shared by every value, use `Some("")`
/// to keep names unchanged.
///
/// Enums with aliases (several names for one code) are rejected.
pub fn create_enum_map(
    enum_type: &EnumDescriptor,
    mode: Mode,
    prefix: Option<&str>,
) -> Result<EnumMap, CastError> {
    let threshold = prefix_len(enum_type, prefix)?;
    let pairs = enum_values(enum_type, threshold);
    Ok(match mode {
        Mode::Int2Str => EnumMap::Int2Str(pairs.into_iter().map(|(name, code)| (code, name)).collect()),
        Mode::Str2Int => EnumMap::Str2Int(pairs.into_iter().collect()),
    })
}

/// Length of the prefix to strip from every value name of `enum_type`.
pub(crate) fn prefix_len(enum_type: &EnumDescriptor, prefix: Option<&str>) -> Result<usize, CastError> {
    reject_aliases(enum_type)?;

    let common = match prefix {
        Some(prefix) => prefix.to_owned(),
        None => format!("{}_", pascal_to_snake(enum_type.name()).to_uppercase()),
    };

    if enum_type.values().all(|value| value.name().starts_with(&common)) {
        return Ok(common.len());
    }

    match prefix {
        Some(prefix) => Err(CastError::PrefixMismatch {
            enum_type: enum_type.full_name().to_owned(),
            prefix:    prefix.to_owned(),
        }),
        None => {
            warn!(
                enum_type = enum_type.full_name(),
                prefix = %common,
                "Missing values prefix in enum {}",
                enum_type.full_name()
            );
            Ok(0)
        }
    }
}

/// `(short name, code)` pairs in declaration order.
pub(crate) fn enum_values(enum_type: &EnumDescriptor, threshold: usize) -> Vec<(String, i32)> {
    enum_type
        .values()
        .map(|value| (value.name()[threshold..].to_owned(), value.number()))
        .collect()
}

fn reject_aliases(enum_type: &EnumDescriptor) -> Result<(), CastError> {
    let mut seen = HashSet::new();
    for value in enum_type.values() {
        if !seen.insert(value.number()) {
            return Err(CastError::AliasedEnum(enum_type.full_name().to_owned()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_reflect::DescriptorPool;
    use prost_types::{
        EnumDescriptorProto, EnumOptions, EnumValueDescriptorProto, FileDescriptorProto,
        FileDescriptorSet,
    };

    fn enum_type(name: &str, values: &[(&str, i32)]) -> EnumDescriptor {
        let file = FileDescriptorProto {
            name: Some("enums.proto".to_owned()),
            package: Some("test".to_owned()),
            syntax: Some("proto3".to_owned()),
            enum_type: vec![EnumDescriptorProto {
                name: Some(name.to_owned()),
                value: values
                    .iter()
                    .map(|(value, number)| EnumValueDescriptorProto {
                        name: Some((*value).to_owned()),
                        number: Some(*number),
                        ..Default::default()
                    })
                    .collect(),
                options: Some(EnumOptions {
                    allow_alias: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        let pool = DescriptorPool::from_file_descriptor_set(FileDescriptorSet { file: vec![file] })
            .expect("valid enum descriptor");
        pool.get_enum_by_name(&format!("test.{name}")).expect("enum in pool")
    }

    #[test]
    fn strips_derived_prefix() {
        let color = enum_type("Color", &[("COLOR_RED", 0), ("COLOR_BLUE", 1)]);

        assert_eq!(
            create_enum_map(&color, Mode::Int2Str, None).unwrap(),
            EnumMap::Int2Str(BTreeMap::from([(0, "RED".to_owned()), (1, "BLUE".to_owned())]))
        );
        assert_eq!(
            create_enum_map(&color, Mode::Str2Int, None).unwrap(),
            EnumMap::Str2Int(BTreeMap::from([("RED".to_owned(), 0), ("BLUE".to_owned(), 1)]))
        );
    }

    #[test]
    fn derived_prefix_uses_snake_case_of_enum_name() {
        let state = enum_type(
            "TaskState",
            &[("TASK_STATE_UNSPECIFIED", 0), ("TASK_STATE_DONE", 1)],
        );
        assert_eq!(
            create_enum_map(&state, Mode::Int2Str, None).unwrap(),
            EnumMap::Int2Str(BTreeMap::from([
                (0, "UNSPECIFIED".to_owned()),
                (1, "DONE".to_owned()),
            ]))
        );
    }

    #[test]
    fn missing_derived_prefix_keeps_full_names() {
        let color = enum_type("Color", &[("RED", 0), ("BLUE", 1)]);
        assert_eq!(
            create_enum_map(&color, Mode::Int2Str, None).unwrap(),
            EnumMap::Int2Str(BTreeMap::from([(0, "RED".to_owned()), (1, "BLUE".to_owned())]))
        );
    }

    #[test]
    fn explicit_prefix_must_be_common() {
        let color = enum_type("Color", &[("RED", 0), ("BLUE", 1)]);
        let err = create_enum_map(&color, Mode::Int2Str, Some("X_")).unwrap_err();
        match err {
            CastError::PrefixMismatch { enum_type, prefix } => {
                assert_eq!(enum_type, "test.Color");
                assert_eq!(prefix, "X_");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn explicit_prefix_is_used_verbatim() {
        let color = enum_type("Color", &[("COLOR_RED", 0), ("COLOR_BLUE", 1)]);
        assert_eq!(
            create_enum_map(&color, Mode::Str2Int, Some("COLOR_B")).err().map(|e| e.to_string()),
            Some("The \"COLOR_B\" prefix is not common for all values of test.Color".to_owned())
        );
        assert_eq!(
            create_enum_map(&color, Mode::Str2Int, Some("")).unwrap(),
            EnumMap::Str2Int(BTreeMap::from([
                ("COLOR_RED".to_owned(), 0),
                ("COLOR_BLUE".to_owned(), 1),
            ]))
        );
        assert_eq!(
            create_enum_map(&color, Mode::Str2Int, Some("COLOR")).unwrap(),
            EnumMap::Str2Int(BTreeMap::from([("_RED".to_owned(), 0), ("_BLUE".to_owned(), 1)]))
        );
    }

    #[test]
    fn aliases_are_rejected() {
        let aliased = enum_type("Level", &[("LEVEL_LOW", 0), ("LEVEL_MIN", 0)]);
        assert!(matches!(
            create_enum_map(&aliased, Mode::Int2Str, None),
            Err(CastError::AliasedEnum(name)) if name == "test.Level"
        ));
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("int2str".parse::<Mode>().unwrap(), Mode::Int2Str);
        assert_eq!("str2int".parse::<Mode>().unwrap(), Mode::Str2Int);
        assert!(matches!(
            "both".parse::<Mode>(),
            Err(CastError::InvalidMode(mode)) if mode == "both"
        ));
        assert_eq!(Mode::Str2Int.to_string(), "str2int");
    }
}
