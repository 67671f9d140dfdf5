use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Enum, List, Map, Optional, Struct};

macro_rules! impl_kind_view {
    ($name:ident, $($ref:tt)+) => {
        impl<'a> $name<'a> {
            /// The [`ReflectKind`] of the viewed value.
            pub fn kind(&self) -> ReflectKind {
                match self {
                    Self::Struct(_) => ReflectKind::Struct,
                    Self::List(_) => ReflectKind::List,
                    Self::Map(_) => ReflectKind::Map,
                    Self::Enum(_) => ReflectKind::Enum,
                    Self::Optional(_) => ReflectKind::Optional,
                    Self::Opaque(_) => ReflectKind::Opaque,
                }
            }

            #[inline]
            pub fn as_list(self) -> Option<$($ref)+ dyn List> {
                match self {
                    Self::List(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            pub fn as_map(self) -> Option<$($ref)+ dyn Map> {
                match self {
                    Self::Map(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            pub fn as_optional(self) -> Option<$($ref)+ dyn Optional> {
                match self {
                    Self::Optional(v) => Some(v),
                    _ => None,
                }
            }

            #[inline]
            pub fn as_enum(self) -> Option<$($ref)+ dyn Enum> {
                match self {
                    Self::Enum(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

/// An immutable view of a value by kind.
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Enum(&'a dyn Enum),
    Optional(&'a dyn Optional),
    Opaque(&'a dyn Reflect),
}

/// A mutable view of a value by kind.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Enum(&'a mut dyn Enum),
    Optional(&'a mut dyn Optional),
    Opaque(&'a mut dyn Reflect),
}

impl_kind_view!(ReflectRef, &'a);
impl_kind_view!(ReflectMut, &'a mut);
