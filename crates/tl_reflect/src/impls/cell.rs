//! Once-per-type storage behind `Typed::type_info` and `TypePath`.
//!
//! Rust has no generic statics: one `static` in a generic function serves
//! all of its instantiations. Generic impls therefore share a cell keyed by
//! [`TypeId`], while plain types use a [`OnceLock`].

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use tl_utils::TypeIdMap;

use crate::info::TypeInfo;

mod sealed {
    use crate::info::TypeInfo;

    pub trait TypedProperty: 'static {}

    impl TypedProperty for String {}
    impl TypedProperty for TypeInfo {}
}

use sealed::TypedProperty;

/// Lazily built value for one non-generic type.
pub struct NonGenericTypeCell<T: TypedProperty>(OnceLock<T>);

/// [`TypeInfo`] of a non-generic type. Used in [`Typed`](crate::info::Typed)
/// impls.
pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: TypedProperty> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Builds the value with `f` the first time.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }
}

impl<T: TypedProperty> Default for NonGenericTypeCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily built values for every instantiation of a generic type.
///
/// Values are leaked once built; that is what makes the `'static`
/// borrows possible.
pub struct GenericTypeCell<T: TypedProperty>(RwLock<TypeIdMap<&'static T>>);

/// [`TypeInfo`] of each instantiation of a generic type.
///
/// ```
/// use tl_reflect::{impls::GenericTypeInfoCell, info::{TypeInfo, OpaqueInfo, TypePath}};
///
/// struct Tag<T>(T);
///
/// impl<T: TypePath> TypePath for Tag<T> {
///     fn type_path() -> &'static str { "demo::Tag" }
///     fn type_name() -> &'static str { "Tag" }
///     fn type_ident() -> &'static str { "Tag" }
/// }
///
/// fn info<T: TypePath>() -> &'static TypeInfo {
///     static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///     CELL.get_or_insert::<Tag<T>>(|| TypeInfo::Opaque(OpaqueInfo::new::<Tag<T>>()))
/// }
///
/// assert!(info::<u8>().type_is::<Tag<u8>>());
/// assert!(info::<u16>().type_is::<Tag<u16>>());
/// assert!(core::ptr::eq(info::<u8>(), info::<u8>()));
/// ```
pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

/// Composed names such as `Vec<Person>`, one per instantiation.
pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: TypedProperty> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Value for the instantiation `G`, built by `f` when absent.
    ///
    /// No lock is held while `f` runs: building `Vec<Vec<u8>>` looks up
    /// `Vec<u8>` in the same cell.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    // On a race the loser's value is dropped, never leaked.
    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &T {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

impl<T: TypedProperty> Default for GenericTypeCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
