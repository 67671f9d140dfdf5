use core::fmt;

/// The payload of a value node.
///
/// Every leaf crosses node boundaries as a `Value`. Formats map it onto
/// their own scalars, the object graph converts it to and from typed values.
///
/// [`Display`](fmt::Display) produces the external text form: `Null` is
/// empty, floats use the shortest representation that round-trips.
///
/// ```
/// use tl_map::Value;
///
/// assert_eq!(Value::from(67_i32).to_string(), "67");
/// assert_eq!(Value::from("Ed").to_string(), "Ed");
/// assert_eq!(Value::Null.to_string(), "");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a short name of the variant, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "number",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => fmt::Display::fmt(b, f),
            Self::Int(n) => fmt::Display::fmt(n, f),
            Self::UInt(n) => fmt::Display::fmt(n, f),
            Self::Float(n) => fmt::Display::fmt(n, f),
            Self::Str(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident as $inner:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(<$inner>::from(value))
                }
            }
        )+
    };
}

impl_from!(Int as i64: i8, i16, i32, i64);
impl_from!(UInt as u64: u8, u16, u32, u64);
impl_from!(Float as f64: f32, f64);
impl_from!(Bool as bool: bool);
impl_from!(Str as String: String, &str, char);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
