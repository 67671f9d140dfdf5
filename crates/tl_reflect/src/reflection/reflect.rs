use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTypePath, DynamicTyped, ReflectKind};
use crate::ops::{ReflectMut, ReflectRef, Struct};

// -----------------------------------------------------------------------------
// Reflect

/// A value the mapper can walk without knowing its static type.
///
/// Through a `dyn Reflect` the mapper reads the static description
/// ([`DynamicTyped::reflect_type_info`]), visits members and items
/// ([`reflect_ref`], [`reflect_mut`]) and overwrites scalars ([`set`]).
///
/// Implement it with [`#[derive(Reflect)]`](crate::derive::Reflect).
///
/// # Type ids
///
/// Calling [`Any::type_id`] on a `Box<dyn Reflect>` yields the id of the
/// box itself. [`Reflect::ty_id`] yields the id of the boxed value:
///
/// ```
/// # use tl_reflect::Reflect;
/// # use core::any::{Any, TypeId};
/// let x: Box<dyn Reflect> = Box::new(32_i32);
///
/// assert!(x.type_id() != TypeId::of::<i32>());
/// assert!(x.ty_id() == TypeId::of::<i32>());
/// ```
///
/// # By hand
///
/// ```rust, ignore
/// fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
///     *self = value.take::<Self>()?;
///     Ok(())
/// }
///
/// fn reflect_kind(&self) -> ReflectKind {
///     ReflectKind::Struct
/// }
///
/// fn reflect_ref(&self) -> ReflectRef<'_> {
///     ReflectRef::Struct(self)
/// }
///
/// fn reflect_mut(&mut self) -> ReflectMut<'_> {
///     ReflectMut::Struct(self)
/// }
/// ```
///
/// A container that also carries named members (a list with properties)
/// overrides [`as_struct`] and [`as_struct_mut`] as well.
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
/// [`set`]: Reflect::set
/// [`as_struct`]: Reflect::as_struct
/// [`as_struct_mut`]: Reflect::as_struct_mut
pub trait Reflect: DynamicTypePath + DynamicTyped + Send + Sync + Any {
    /// Upcast.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Mutable upcast.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Boxes `self` as a `dyn Reflect`.
    ///
    /// ```
    /// use tl_reflect::Reflect;
    ///
    /// let r = 32.into_boxed_reflect();
    /// assert!(r.is::<i32>());
    /// ```
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// [`TypeId`] of the concrete type behind the reference.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Overwrites `self` with `value`, which must hold a `Self`. On a type
    /// mismatch `value` is returned untouched.
    ///
    /// ```
    /// # use tl_reflect::Reflect;
    /// let mut vec = Vec::<i32>::new();
    ///
    /// assert!(vec.set(vec![1_i32, 2, 3].into_boxed_reflect()).is_ok());
    /// assert_eq!(vec, [1, 2, 3]);
    /// assert!(vec.set(1_u8.into_boxed_reflect()).is_err());
    /// ```
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Which of the [`ReflectKind`] shapes this value has.
    fn reflect_kind(&self) -> ReflectKind;

    /// Borrows the kind-specific view.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Mutably borrows the kind-specific view.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Named members of this value. `None` for scalars and for containers
    /// without extra properties.
    #[inline]
    fn as_struct(&self) -> Option<&dyn Struct> {
        match self.reflect_ref() {
            ReflectRef::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Reflect::as_struct`].
    #[inline]
    fn as_struct_mut(&mut self) -> Option<&mut dyn Struct> {
        match self.reflect_mut() {
            ReflectMut::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Used by `Debug for dyn Reflect`. Prints the type path unless
    /// overridden.
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_path())
    }
}

// -----------------------------------------------------------------------------
// dyn Reflect

impl dyn Reflect {
    /// Whether the concrete type is `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Borrows the value as a `T`.
    ///
    /// ```
    /// # use tl_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10.into_boxed_reflect();
    /// assert_eq!(x.downcast_ref::<i32>(), Some(&10));
    /// assert_eq!(x.downcast_ref::<u32>(), None);
    /// ```
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Mutably borrows the value as a `T`.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Converts the box into a `Box<T>`, or gives it back unchanged.
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Like [`downcast`](Self::downcast), then unboxes.
    ///
    /// ```
    /// # use tl_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10.into_boxed_reflect();
    /// assert_eq!(x.take::<i32>().ok(), Some(10));
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}
