//! Format-agnostic mapping between object graphs and node trees.
//!
//! Every notation, and the object graph itself, is seen through one
//! abstract tree interface, [`Node`]. Mapping walks a source tree and a
//! target tree in lock-step:
//!
//! - [`GraphNode`] projects any [`Reflect`](tl_reflect::Reflect) value onto
//!   nodes, using [`TypeShape`](shape::TypeShape)s computed once per type;
//! - [`coerce`] converts leaf [`Value`]s to and from typed scalars;
//! - [`Options`] carry the settings, the shape cache and the caller's
//!   [conventions](convention);
//! - [`Mapper`] drives the recursion and attaches the position of every
//!   failure to the error.
//!
//! # Examples
//!
//! ```
//! use tl_map::{GraphNode, Options};
//! use tl_reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Summary {
//!     name: String,
//! }
//!
//! let options = Options::default();
//! let ed = Person { name: "Ed".into(), age: 67 };
//!
//! let summary: Summary = tl_map::deserialize(&GraphNode::source(&ed, &options), &options).unwrap();
//! assert_eq!(summary.name, "Ed");
//! ```

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mapper;
mod naming;
mod node;
mod options;
mod value;

pub mod coerce;
pub mod convention;
pub mod graph;
pub mod metadata;
pub mod shape;

// -----------------------------------------------------------------------------
// Exports

pub use error::{BoxError, Error, MappingError, Position, Result};
pub use graph::GraphNode;
pub use mapper::{Direction, Mapper, deserialize, deserialize_into, serialize};
pub use metadata::Metadata;
pub use naming::NamingConvention;
pub use node::{Configure, Node, NodeIter, NodeType};
pub use options::{ObjectFactory, Options, OptionsBuilder, OptionsConfig};
pub use value::Value;
