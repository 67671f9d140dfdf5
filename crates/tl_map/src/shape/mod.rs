//! Per-type mapping shapes.
//!
//! A [`TypeShape`] is the engine's view of a type: how it maps
//! ([`Classification`]), whether it accepts null, and, for complex types, the
//! ordered [`MemberDescriptor`]s with their external names already resolved.
//! Shapes are computed once per type and kept in a [`ShapeCache`].

use tl_reflect::Reflect;
use tl_reflect::info::{
    ContainerOrigin, EnumInfo, FieldFlags, NamedField, ScalarKind, TypeInfo,
};
use tl_reflect::ops::{ReflectMut, ReflectRef};
use tl_utils::hash::HashMap;

use crate::error::{Error, Result};
use crate::naming::NamingConvention;

// -----------------------------------------------------------------------------
// Modules

mod cache;

// -----------------------------------------------------------------------------
// Exports

pub use cache::{ShapeCache, ShapePolicy};

// -----------------------------------------------------------------------------
// Classification

/// How a type is projected onto nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A scalar or an enum, mapped as a value node.
    Simple,
    /// A [`List`](tl_reflect::ops::List), mapped as an array node.
    Enumerable,
    /// A [`Map`](tl_reflect::ops::Map), mapped as an object node keyed by
    /// the text form of its keys.
    Dictionary,
    /// Named members, mapped as an object node.
    Complex,
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One mapped member of a complex type.
#[derive(Clone, Debug)]
pub struct MemberDescriptor {
    field: &'static NamedField,
    index: usize,
    external_name: String,
}

impl MemberDescriptor {
    fn new(field: &'static NamedField, index: usize, naming: NamingConvention) -> Self {
        let external_name = if field.is_renamed() {
            field.external_name().to_owned()
        } else {
            naming.apply(field.name())
        };
        Self {
            field,
            index,
            external_name,
        }
    }

    /// The in-memory field name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    /// The name used in documents.
    #[inline]
    pub fn external_name(&self) -> &str {
        &self.external_name
    }

    /// Position of the field in the [`Struct`](tl_reflect::ops::Struct) view.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.field.flags()
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.flags().contains(FieldFlags::REQUIRED)
    }

    /// Whether the member is left out of documents while it has no value.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.flags().contains(FieldFlags::OPTIONAL)
    }

    /// Whether the member is read from documents.
    #[inline]
    pub fn is_readable(&self) -> bool {
        !self.flags().contains(FieldFlags::READ_ONLY)
    }

    /// Whether the member is written to documents.
    #[inline]
    pub fn is_writable(&self) -> bool {
        !self.flags().contains(FieldFlags::WRITE_ONLY)
    }

    /// Overridden name of each item, for sequence members.
    #[inline]
    pub fn item_name(&self) -> Option<&'static str> {
        self.field.item_name()
    }

    /// The declared type of the member. Its shape comes from the cache.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.field.type_info()
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// The mapping shape of one type.
///
/// `Option<T>` shares the classification and members of `T` and is marked
/// nullable. Element, key and value shapes of containers are not stored;
/// they are looked up in the cache when first needed, which keeps
/// recursive types finite.
#[derive(Debug)]
pub struct TypeShape {
    info: &'static TypeInfo,
    inner: &'static TypeInfo,
    nullable: bool,
    classification: Classification,
    members: Box<[MemberDescriptor]>,
    by_name: HashMap<String, usize>,
    item_name: String,
}

impl TypeShape {
    pub(crate) fn compute(info: &'static TypeInfo, policy: &ShapePolicy) -> Self {
        // Nested options collapse into one nullable layer.
        let mut inner = info;
        while let TypeInfo::Optional(optional) = inner {
            inner = optional.some_info();
        }
        let nullable = !core::ptr::eq(inner, info);

        let members_of = |fields: &'static [NamedField]| -> Box<[MemberDescriptor]> {
            fields
                .iter()
                .enumerate()
                .map(|(index, field)| MemberDescriptor::new(field, index, policy.member_naming))
                .collect()
        };

        let (classification, members) = match inner {
            TypeInfo::Struct(info) => {
                let fields: &'static [NamedField] = info.fields();
                (Classification::Complex, members_of(fields))
            }
            TypeInfo::Map(info)
                if policy.treat_map_impls_as_objects && info.origin() == ContainerOrigin::Custom =>
            {
                (Classification::Complex, members_of(info.members()))
            }
            TypeInfo::List(info)
                if policy.treat_list_impls_as_objects && info.origin() == ContainerOrigin::Custom =>
            {
                (Classification::Complex, members_of(info.members()))
            }
            TypeInfo::Map(_) => (Classification::Dictionary, Box::default()),
            TypeInfo::List(_) => (Classification::Enumerable, Box::default()),
            TypeInfo::Enum(_) | TypeInfo::Opaque(_) | TypeInfo::Optional(_) => {
                (Classification::Simple, Box::default())
            }
        };

        let mut by_name = HashMap::default();
        for (position, member) in members.iter().enumerate() {
            by_name
                .entry(member.external_name().to_owned())
                .or_insert(position);
        }

        Self {
            info,
            inner,
            nullable,
            classification,
            members,
            by_name,
            item_name: policy.member_naming.apply(inner.type_ident()),
        }
    }

    #[inline]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Whether the declared type is an `Option`.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The declared type, `Option<T>` for nullable shapes.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The underlying type, `T` for nullable shapes.
    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        self.inner
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.info.type_path()
    }

    /// The scalar family, for simple shapes over known scalars.
    pub fn scalar(&self) -> Option<ScalarKind> {
        self.inner.as_opaque().and_then(|info| info.scalar())
    }

    pub fn enum_info(&self) -> Option<&'static EnumInfo> {
        self.inner.as_enum()
    }

    /// The members of a complex shape, in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Finds a member by its external name, returning its position in
    /// [`members`](Self::members).
    pub fn member(&self, name: &str, case_sensitive: bool) -> Option<(usize, &MemberDescriptor)> {
        let position = if case_sensitive {
            self.by_name.get(name).copied()
        } else {
            self.members
                .iter()
                .position(|m| m.external_name().eq_ignore_ascii_case(name))
        };
        position.map(|position| (position, &self.members[position]))
    }

    /// The item type of an enumerable shape.
    pub fn element_info(&self) -> Option<&'static TypeInfo> {
        self.inner.as_list().map(|info| info.item_info())
    }

    /// The key type of a dictionary shape.
    pub fn key_info(&self) -> Option<&'static TypeInfo> {
        self.inner.as_map().map(|info| info.key_info())
    }

    /// The value type of a dictionary shape.
    pub fn value_info(&self) -> Option<&'static TypeInfo> {
        self.inner.as_map().map(|info| info.value_info())
    }

    /// The name given to a value of this type when it is a sequence item.
    #[inline]
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// Creates a fresh instance of the underlying type.
    #[inline]
    pub fn construct(&self) -> Option<Box<dyn Reflect>> {
        self.inner.construct()
    }

    /// Looks through the `Option` layers of a nullable shape.
    ///
    /// Returns `None` for a null value, at any layer.
    pub fn unwrap<'v>(&self, value: &'v dyn Reflect) -> Option<&'v dyn Reflect> {
        if !self.nullable {
            return Some(value);
        }
        let mut value = value;
        while let ReflectRef::Optional(optional) = value.reflect_ref() {
            value = optional.value()?;
        }
        Some(value)
    }

    /// Turns a value of the underlying type, or null, into a value of the
    /// declared type.
    pub fn wrap(&self, value: Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>> {
        if !self.nullable {
            return value.ok_or(Error::ValueCannotBeNull {
                type_path: self.type_path(),
            });
        }

        Self::wrap_layer(self.info, value)
    }

    /// Wraps `value` in the `Option` layer described by `info`, and in every
    /// layer below it. Null stops at the outermost layer.
    fn wrap_layer(
        info: &'static TypeInfo,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>> {
        let creation = || Error::ObjectCreation {
            type_path: info.type_path(),
        };
        let TypeInfo::Optional(layer) = info else {
            return Err(creation());
        };
        let value = match value {
            Some(value) if matches!(layer.some_info(), TypeInfo::Optional(_)) => {
                Some(Self::wrap_layer(layer.some_info(), Some(value))?)
            }
            value => value,
        };

        let mut outer = info.construct().ok_or_else(creation)?;
        let ReflectMut::Optional(optional) = outer.reflect_mut() else {
            return Err(creation());
        };
        match value {
            Some(value) => optional.set_some(value).map_err(|value| Error::ValueConversion {
                value: value.reflect_type_path().to_owned(),
                type_path: layer.some_info().type_path(),
            })?,
            None => optional.set_none(),
        }
        Ok(outer)
    }
}

#[cfg(test)]
mod tests {
    use tl_reflect::derive::Reflect;
    use tl_reflect::info::Typed;

    use super::{Classification, ShapePolicy, TypeShape};
    use crate::NamingConvention;

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Order {
        #[reflect(rename = "ID")]
        order_id: u32,
        customer_name: Option<String>,
        #[reflect(item_name = "Line", required)]
        lines: Vec<String>,
    }

    fn shape_of<T: Typed>(naming: NamingConvention) -> TypeShape {
        let policy = ShapePolicy {
            member_naming: naming,
            ..ShapePolicy::default()
        };
        TypeShape::compute(T::type_info(), &policy)
    }

    #[test]
    fn members_resolve_external_names() {
        let shape = shape_of::<Order>(NamingConvention::PascalCase);
        assert_eq!(shape.classification(), Classification::Complex);

        let names: Vec<_> = shape.members().iter().map(|m| m.external_name()).collect();
        assert_eq!(names, ["ID", "CustomerName", "Lines"]);

        let (pos, lines) = shape.member("lines", false).unwrap();
        assert_eq!(pos, 2);
        assert!(lines.is_required());
        assert_eq!(lines.item_name(), Some("Line"));
        assert!(shape.member("lines", true).is_none());
    }

    #[test]
    fn option_is_nullable_inner() {
        let shape = shape_of::<Option<Vec<u8>>>(NamingConvention::AsIs);
        assert!(shape.is_nullable());
        assert_eq!(shape.classification(), Classification::Enumerable);
        assert!(shape.element_info().unwrap().type_is::<u8>());

        let null = shape.wrap(None).unwrap();
        assert_eq!(null.take::<Option<Vec<u8>>>().ok(), Some(None));

        let some = shape.wrap(Some(Box::new(vec![1_u8]))).unwrap();
        assert_eq!(some.take::<Option<Vec<u8>>>().ok(), Some(Some(vec![1])));
    }

    #[test]
    fn nested_options_collapse_into_one_layer() {
        let shape = shape_of::<Option<Option<u8>>>(NamingConvention::AsIs);
        assert!(shape.is_nullable());
        assert_eq!(shape.classification(), Classification::Simple);
        assert!(shape.inner_info().type_is::<u8>());

        let value: Option<Option<u8>> = Some(Some(3));
        let inner = shape.unwrap(&value).unwrap();
        assert_eq!(inner.downcast_ref::<u8>(), Some(&3));
        assert!(shape.unwrap(&Some(None::<u8>)).is_none());

        let some = shape.wrap(Some(Box::new(4_u8))).unwrap();
        assert_eq!(some.take::<Option<Option<u8>>>().ok(), Some(Some(Some(4))));
        let null = shape.wrap(None).unwrap();
        assert_eq!(null.take::<Option<Option<u8>>>().ok(), Some(None));
    }

    #[test]
    fn non_nullable_rejects_null() {
        let shape = shape_of::<u32>(NamingConvention::AsIs);
        assert_eq!(shape.classification(), Classification::Simple);
        assert!(shape.wrap(None).is_err());
        assert_eq!(shape.item_name(), "u32");
    }
}
