//! Helpers shared by the treeline proc-macro crates.

extern crate proc_macro;

// -----------------------------------------------------------------------------
// Modules

mod manifest;
mod symbol;

// -----------------------------------------------------------------------------
// Exports

pub use manifest::Manifest;
pub use symbol::Symbol;
