//! Collection utilities shared by the treeline crates.
//!
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId), hashed without rehashing.
//! - [`hash`]: fixed-seed and no-op hash states plus `hashbrown` aliases using them.

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
