//! Runtime type information and dynamic value access.
//!
//! The mapping engine never names concrete user types. Everything it needs
//! is reached through this crate:
//!
//! - [`info`]: static descriptions of types ([`TypeInfo`](info::TypeInfo)),
//!   memoized per type and available without an instance.
//! - [`ops`]: the kind traits ([`Struct`](ops::Struct), [`List`](ops::List),
//!   [`Map`](ops::Map), [`Enum`](ops::Enum), [`Optional`](ops::Optional))
//!   used to read and write values through `dyn Reflect`.
//! - [`impls`]: implementations for std and the supported scalar families,
//!   plus the cells used to implement [`Typed`](info::Typed) by hand.
//!
//! # Examples
//!
//! ```
//! use tl_reflect::{Reflect, derive::Reflect, info::Typed, ops::ReflectRef};
//!
//! #[derive(Reflect, Default)]
//! struct Person {
//!     #[reflect(rename = "FullName")]
//!     name: String,
//!     age: u32,
//! }
//!
//! let info = Person::type_info().as_struct().unwrap();
//! assert_eq!(info.field_at(0).unwrap().external_name(), "FullName");
//!
//! let person = Person { name: "Ann".into(), age: 30 };
//! let ReflectRef::Struct(s) = person.reflect_ref() else { unreachable!() };
//! assert_eq!(s.field("age").unwrap().downcast_ref::<u32>(), Some(&30));
//! ```

// `tl_reflect_derive` emits `::tl_reflect` paths, which must also
// resolve inside this crate and its doctests.
extern crate self as tl_reflect;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;

// -----------------------------------------------------------------------------
// Exports

pub use reflection::Reflect;
pub use tl_reflect_derive as derive;
