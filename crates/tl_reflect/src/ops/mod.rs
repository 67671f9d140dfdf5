//! Kind traits for reading and writing values through `dyn Reflect`.

// -----------------------------------------------------------------------------
// Modules

mod enum_ops;
mod kind;
mod list_ops;
mod map_ops;
mod optional_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use enum_ops::Enum;
pub use kind::{ReflectMut, ReflectRef};
pub use list_ops::{List, ListIter};
pub(crate) use list_ops::list_debug;
pub use map_ops::{Map, MapIter};
pub(crate) use map_ops::map_debug;
pub use optional_ops::Optional;
pub use struct_ops::{Struct, StructFieldIter, struct_debug};
