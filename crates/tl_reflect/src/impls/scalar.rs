use core::fmt;
use core::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, ReflectKind, ScalarKind, TypeInfo, TypePath, Typed};
use crate::ops::{ReflectMut, ReflectRef};

macro_rules! impl_scalar {
    ($ty:ty, $path:expr, $name:expr, $ident:expr, $kind:ident $(, $ctor:expr)?) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $ident
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = OpaqueInfo::new::<Self>().with_scalar(ScalarKind::$kind);
                    $( let info = info.with_constructor($ctor); )?
                    TypeInfo::Opaque(info)
                })
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Opaque
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Opaque(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Opaque(self)
            }

            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

macro_rules! impl_primitive {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl_scalar!(
                $ty,
                stringify!($ty),
                stringify!($ty),
                stringify!($ty),
                $kind,
                || Some(Box::new(<$ty>::default()))
            );
        )*
    };
}

impl_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl_scalar!(
    String,
    "alloc::string::String",
    "String",
    "String",
    String,
    || Some(Box::new(String::new()))
);

impl_scalar!(
    Duration,
    "core::time::Duration",
    "Duration",
    "Duration",
    Duration,
    || Some(Box::new(Duration::ZERO))
);

impl_scalar!(
    DateTime<Utc>,
    "chrono::DateTime<chrono::Utc>",
    "DateTime<Utc>",
    "DateTime",
    DateTime,
    || Some(Box::new(DateTime::<Utc>::UNIX_EPOCH))
);

impl_scalar!(
    NaiveDate,
    "chrono::NaiveDate",
    "NaiveDate",
    "NaiveDate",
    NaiveDate,
    || Some(Box::new(NaiveDate::default()))
);

impl_scalar!(
    NaiveDateTime,
    "chrono::NaiveDateTime",
    "NaiveDateTime",
    "NaiveDateTime",
    NaiveDateTime,
    || Some(Box::new(NaiveDateTime::default()))
);

impl_scalar!(
    Uuid,
    "uuid::Uuid",
    "Uuid",
    "Uuid",
    Uuid,
    || Some(Box::new(Uuid::nil()))
);

// Placeholder until the document supplies the member.
impl_scalar!(Url, "url::Url", "Url", "Url", Url, || {
    Url::parse("about:blank")
        .ok()
        .map(|url| Box::new(url) as Box<dyn Reflect>)
});
