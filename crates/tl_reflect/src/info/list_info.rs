use crate::info::{Constructor, NamedField, Type, TypeInfo, TypePath, Typed, impl_type_fn};
use crate::ops::List;

/// Where a container implementation comes from.
///
/// Mapping policies may treat [`Custom`](ContainerOrigin::Custom)
/// containers as plain objects, see [`ListInfo::with_members`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainerOrigin {
    /// A standard library collection.
    #[default]
    Std,
    /// A user type that implements the container traits itself.
    Custom,
}

/// Static description of a growable sequence.
///
/// ```
/// use tl_reflect::info::{Typed, ContainerOrigin};
///
/// let info = <Vec<u8> as Typed>::type_info().as_list().unwrap();
/// assert!(info.item_info().type_is::<u8>());
/// assert_eq!(info.origin(), ContainerOrigin::Std);
/// ```
#[derive(Clone, Debug)]
pub struct ListInfo {
    ty: Type,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    origin: ContainerOrigin,
    members: Box<[NamedField]>,
    constructor: Option<Constructor>,
}

impl ListInfo {
    impl_type_fn!(ty);

    /// Describes the list type `TList` holding `TItem`.
    pub fn new<TList: List + TypePath, TItem: Typed>() -> Self {
        Self {
            ty: Type::of::<TList>(),
            item_ty: Type::of::<TItem>(),
            item_info: TItem::type_info,
            origin: ContainerOrigin::Std,
            members: Box::new([]),
            constructor: None,
        }
    }

    #[inline]
    pub fn with_origin(mut self, origin: ContainerOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Named members carried next to the items.
    ///
    /// Marks the container [`Custom`](ContainerOrigin::Custom); the type
    /// must also answer [`Reflect::as_struct`](crate::Reflect::as_struct).
    pub fn with_members(mut self, members: &[NamedField]) -> Self {
        self.origin = ContainerOrigin::Custom;
        self.members = members.into();
        self
    }

    #[inline]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    #[inline]
    pub fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }

    #[inline]
    pub fn origin(&self) -> ContainerOrigin {
        self.origin
    }

    #[inline]
    pub fn members(&self) -> &[NamedField] {
        &self.members
    }

    #[inline]
    pub fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }
}
