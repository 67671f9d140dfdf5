use crate::Reflect;

/// A field-less enum value.
///
/// ```
/// use tl_reflect::{derive::Reflect, ops::Enum};
///
/// #[derive(Reflect)]
/// enum Level { Low = 1, High = 10 }
///
/// assert_eq!(Level::High.variant_name(), "High");
/// assert_eq!(Level::High.variant_index(), 1);
/// assert_eq!(Level::High.discriminant(), 10);
/// ```
pub trait Enum: Reflect {
    /// The Rust name of the current variant.
    fn variant_name(&self) -> &str;

    /// Declaration position of the current variant.
    fn variant_index(&self) -> usize;

    /// Discriminant of the current variant.
    fn discriminant(&self) -> i64;
}
