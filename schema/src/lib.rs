//! Container side of the dynacast conversion.
//!
//! Protobuf messages converted by the registry in `dynacast-compiler` end up
//! as [Data] values: a [Record] per message with one entry per declared
//! field, in declaration order, plus lists, keyed maps and plain scalars.
//!
//! ```
//! use dynacast_schema::*;
//!
//! let point = Record::new()
//!     .with("x", 1)
//!     .with("y", -1)
//!     .with("label", Data::Null);
//!
//! assert_eq!(point.keys().collect::<Vec<_>>(), ["x", "y", "label"]);
//! assert_eq!(point["y"], Data::I32(-1));
//! assert_eq!(format!("{:?}", point), "{x: 1, y: -1, label: null}");
//! ```

pub mod record;
pub mod value;

pub use record::*;
pub use value::*;
