//! dynacast-compiler
//!
//! This crate implements:
//!  1) `snake_case` / `PascalCase` helpers used to derive enum prefixes,
//!  2) enum projections (`create_enum_map`) mapping codes to short names,
//!  3) the converter [Namespace](namespace::Namespace) of named slots,
//!  4) the type-cast compiler turning descriptors into cached closures,
//!  5) the [Registry] facade (`to_container` / `to_message`), with the
//!     `google.protobuf.*` built-ins, and the [CastError] type.

pub mod cast;
pub mod enums;
pub mod error;
pub mod naming;
pub mod namespace;
pub mod registry;
pub mod well_known;

pub use enums::{create_enum_map, EnumMap, Mode};
pub use error::CastError;
pub use naming::{pascal_to_snake, snake_to_pascal};
pub use namespace::{Namespace, Slot};
pub use registry::Registry;
