//! Map object graphs to and from any tree-shaped notation.
//!
//! - [`reflect`]: runtime type information, `#[derive(Reflect)]`;
//! - [`map`]: the node contract and the mapping engine;
//! - [`formats`]: JSON, markup and delimited row adapters;
//! - [`utils`]: shared collections.
//!
//! ```
//! use treeline::map::Options;
//! use treeline::reflect::derive::Reflect;
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(default)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! let options = Options::default();
//! let ed = Person { name: "Ed".into(), age: 67 };
//!
//! let text = treeline::formats::json::to_string(&ed, &options).unwrap();
//! let back: Person = treeline::formats::json::from_str(&text, &options).unwrap();
//! assert_eq!(back, ed);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tl_formats as formats;
pub use tl_map as map;
pub use tl_reflect as reflect;
pub use tl_utils as utils;
