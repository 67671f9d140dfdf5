//! Implementations for std and the supported scalar families, plus helpers
//! for implementing the reflection traits by hand.
//!
//! - [`NonGenericTypeInfoCell`]: storage for the [`TypeInfo`] of a non-generic type.
//! - [`GenericTypeInfoCell`] / [`GenericTypePathCell`]: the same for generic types.
//! - [`concat`]: builds type paths for generic types.
//!
//! ## Implemented
//!
//! - scalars: `bool`, `char`, `i8`-`i64`, `isize`, `u8`-`u64`, `usize`,
//!   `f32`, `f64`, `String`, `Duration`
//! - `chrono::{DateTime<Utc>, NaiveDate, NaiveDateTime}`, `uuid::Uuid`, `url::Url`
//! - `Option<T>`
//! - `Vec<T>`, `VecDeque<T>`
//! - `HashMap<K, V>`, `BTreeMap<K, V>`
//!
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod list;
mod map;
mod option;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
pub use crate::ops::struct_debug;

/// Concatenates string pieces into one allocation.
///
/// Used to build the [`TypePath`](crate::info::TypePath) of generic types.
///
/// ```
/// use tl_reflect::impls;
///
/// let s = impls::concat(&["demo", "::", "Pair", "<", "u8", ">"]);
/// assert_eq!(s, "demo::Pair<u8>");
/// assert_eq!(s.capacity(), 14);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> String {
    let len = arr.iter().map(|s| s.len()).sum();
    let mut res = String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}
