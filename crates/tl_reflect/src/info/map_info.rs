use crate::info::{Constructor, ContainerOrigin, NamedField, Type, TypeInfo, TypePath, Typed, impl_type_fn};
use crate::ops::Map;

/// Static description of a key-value collection.
///
/// ```
/// use std::collections::BTreeMap;
/// use tl_reflect::info::Typed;
///
/// let info = <BTreeMap<String, i32> as Typed>::type_info().as_map().unwrap();
/// assert!(info.key_info().type_is::<String>());
/// assert!(info.value_info().type_is::<i32>());
/// ```
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    key_ty: Type,
    key_info: fn() -> &'static TypeInfo,
    value_ty: Type,
    value_info: fn() -> &'static TypeInfo,
    origin: ContainerOrigin,
    members: Box<[NamedField]>,
    constructor: Option<Constructor>,
}

impl MapInfo {
    impl_type_fn!(ty);

    /// Describes the map type `TMap` from `TKey` to `TValue`.
    pub fn new<TMap: Map + TypePath, TKey: Typed, TValue: Typed>() -> Self {
        Self {
            ty: Type::of::<TMap>(),
            key_ty: Type::of::<TKey>(),
            key_info: TKey::type_info,
            value_ty: Type::of::<TValue>(),
            value_info: TValue::type_info,
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

    /// See [`ListInfo::with_members`](crate::info::ListInfo::with_members).
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
    pub fn key_ty(&self) -> &Type {
        &self.key_ty
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key_info)()
    }

    #[inline]
    pub fn value_ty(&self) -> &Type {
        &self.value_ty
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }
}
