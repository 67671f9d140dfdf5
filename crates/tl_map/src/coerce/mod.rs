//! Conversion between [`Value`]s and typed scalars.
//!
//! - [`parse`]: text to a typed value, with end-user messages on failure.
//! - [`coerce`]: any [`Value`] to a typed value, handling null.
//! - [`to_value`]: a typed value back to a [`Value`].
//!
//! Parsing never depends on the locale. Dates use RFC 3339 (`DateTime`),
//! `YYYY-MM-DD` (`NaiveDate`) and `YYYY-MM-DDTHH:MM:SS[.f]`
//! (`NaiveDateTime`); durations are seconds.

use std::borrow::Cow;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tl_reflect::Reflect;
use tl_reflect::info::{EnumInfo, ScalarKind, VariantInfo};
use tl_reflect::ops::ReflectRef;

use crate::error::{Error, Result};
use crate::naming::NamingConvention;
use crate::node::names_match;
use crate::options::Options;
use crate::shape::TypeShape;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Modules

pub mod messages;

// -----------------------------------------------------------------------------
// parse

/// Parses external text into a value of the underlying type of `shape`.
///
/// Strings pass through untouched, everything else is trimmed first.
///
/// ```
/// use tl_map::{Options, coerce};
///
/// let options = Options::default();
/// let shape = options.shapes().get_type::<i32>();
///
/// let value = coerce::parse(" 42 ", &shape, &options).unwrap();
/// assert_eq!(value.take::<i32>().ok(), Some(42));
///
/// let err = coerce::parse("abc", &shape, &options).unwrap_err();
/// assert!(err.friendly_message().unwrap().starts_with("Integer 'abc'"));
/// ```
pub fn parse(text: &str, shape: &TypeShape, options: &Options) -> Result<Box<dyn Reflect>> {
    if let Some(info) = shape.enum_info() {
        return parse_enum(text, info, shape, options);
    }
    let Some(kind) = shape.scalar() else {
        return Err(Error::ValueConversion {
            value: format!("'{text}'"),
            type_path: shape.type_path(),
        });
    };
    parse_scalar(text, kind)
        .ok_or_else(|| parse_error(text, shape, options, messages::template(kind), ""))
}

fn parse_scalar(text: &str, kind: ScalarKind) -> Option<Box<dyn Reflect>> {
    let t = text.trim();
    let value = match kind {
        ScalarKind::String => boxed(text.to_owned()),
        ScalarKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => boxed(c),
                _ => return None,
            }
        }
        ScalarKind::Bool => boxed(t.parse::<bool>().ok()?),
        ScalarKind::I8 => boxed(t.parse::<i8>().ok()?),
        ScalarKind::I16 => boxed(t.parse::<i16>().ok()?),
        ScalarKind::I32 => boxed(t.parse::<i32>().ok()?),
        ScalarKind::I64 => boxed(t.parse::<i64>().ok()?),
        ScalarKind::Isize => boxed(t.parse::<isize>().ok()?),
        ScalarKind::U8 => boxed(t.parse::<u8>().ok()?),
        ScalarKind::U16 => boxed(t.parse::<u16>().ok()?),
        ScalarKind::U32 => boxed(t.parse::<u32>().ok()?),
        ScalarKind::U64 => boxed(t.parse::<u64>().ok()?),
        ScalarKind::Usize => boxed(t.parse::<usize>().ok()?),
        ScalarKind::F32 => boxed(t.parse::<f32>().ok()?),
        ScalarKind::F64 => boxed(t.parse::<f64>().ok()?),
        ScalarKind::Duration => boxed(Duration::try_from_secs_f64(t.parse().ok()?).ok()?),
        ScalarKind::DateTime => boxed(DateTime::parse_from_rfc3339(t).ok()?.with_timezone(&Utc)),
        ScalarKind::NaiveDate => boxed(NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()?),
        ScalarKind::NaiveDateTime => boxed(t.parse::<NaiveDateTime>().ok()?),
        ScalarKind::Uuid => boxed(uuid::Uuid::parse_str(t).ok()?),
        ScalarKind::Url => boxed(url::Url::parse(t).ok()?),
    };
    Some(value)
}

fn parse_enum(
    text: &str,
    info: &EnumInfo,
    shape: &TypeShape,
    options: &Options,
) -> Result<Box<dyn Reflect>> {
    let t = text.trim();
    let case_sensitive = options.case_sensitive_enums();
    let naming = options.enum_naming();

    let index = info
        .iter()
        .position(|v| {
            names_match(&variant_name(v, naming), t, case_sensitive)
                || names_match(v.name(), t, case_sensitive)
        })
        .or_else(|| {
            t.parse::<i64>()
                .ok()
                .and_then(|d| info.index_of_discriminant(d))
        });

    index.and_then(|i| info.variant_value(i)).ok_or_else(|| {
        let choices = info
            .iter()
            .map(|v| variant_name(v, naming))
            .collect::<Vec<_>>()
            .join(", ");
        parse_error(text, shape, options, messages::ENUM, &choices)
    })
}

fn parse_error(
    text: &str,
    shape: &TypeShape,
    options: &Options,
    template: &str,
    choices: &str,
) -> Error {
    let inner = shape.inner_info();
    let template = options.friendly_template(inner.ty_id()).unwrap_or(template);
    Error::ValueParse {
        value: text.to_owned(),
        type_path: shape.type_path(),
        friendly: messages::render(template, text, inner.type_name(), choices),
    }
}

/// The document name of an enum variant.
pub fn variant_name(variant: &VariantInfo, naming: NamingConvention) -> Cow<'static, str> {
    if variant.external_name() != variant.name() {
        Cow::Borrowed(variant.external_name())
    } else {
        Cow::Owned(naming.apply(variant.name()))
    }
}

// -----------------------------------------------------------------------------
// coerce

/// Converts any [`Value`] into a value of the underlying type of `shape`.
///
/// Returns `Ok(None)` for null, which only nullable shapes accept. An empty
/// string is null for nullable shapes. Text goes through [`parse`]; other
/// values are converted numerically, failing with
/// [`Error::ValueConversion`] when they do not fit.
///
/// ```
/// use tl_map::{Options, Value, coerce};
///
/// let options = Options::default();
/// let shape = options.shapes().get_type::<Option<u8>>();
///
/// assert!(coerce::coerce(Value::from(""), &shape, &options).unwrap().is_none());
/// let value = coerce::coerce(Value::Int(7), &shape, &options).unwrap().unwrap();
/// assert_eq!(value.take::<u8>().ok(), Some(7));
/// assert!(coerce::coerce(Value::Int(700), &shape, &options).is_err());
/// ```
pub fn coerce(value: Value, shape: &TypeShape, options: &Options) -> Result<Option<Box<dyn Reflect>>> {
    let value = match value {
        Value::Null if shape.is_nullable() => return Ok(None),
        Value::Null => {
            return Err(Error::ValueCannotBeNull {
                type_path: shape.type_path(),
            });
        }
        Value::Str(text) if text.is_empty() && shape.is_nullable() => return Ok(None),
        Value::Str(text) => return parse(&text, shape, options).map(Some),
        other => other,
    };

    let converted = if let Some(info) = shape.enum_info() {
        match value {
            Value::Int(n) => enum_by_discriminant(info, n),
            Value::UInt(n) => i64::try_from(n)
                .ok()
                .and_then(|n| enum_by_discriminant(info, n)),
            _ => None,
        }
    } else if let Some(kind) = shape.scalar() {
        match value {
            Value::Bool(b) => from_bool(b, kind),
            Value::Int(n) => from_integer(n.into(), kind),
            Value::UInt(n) => from_integer(n.into(), kind),
            Value::Float(n) => from_float(n, kind),
            Value::Null | Value::Str(_) => None,
        }
    } else {
        None
    };

    match converted {
        Some(converted) => Ok(Some(converted)),
        None => Err(Error::ValueConversion {
            value: format!("{} {value}", value.kind_name()),
            type_path: shape.type_path(),
        }),
    }
}

fn enum_by_discriminant(info: &EnumInfo, discriminant: i64) -> Option<Box<dyn Reflect>> {
    info.index_of_discriminant(discriminant)
        .and_then(|index| info.variant_value(index))
}

fn from_bool(b: bool, kind: ScalarKind) -> Option<Box<dyn Reflect>> {
    match kind {
        ScalarKind::Bool => Some(boxed(b)),
        ScalarKind::String => Some(boxed(b.to_string())),
        _ => None,
    }
}

fn from_integer(n: i128, kind: ScalarKind) -> Option<Box<dyn Reflect>> {
    let value = match kind {
        ScalarKind::I8 => boxed(i8::try_from(n).ok()?),
        ScalarKind::I16 => boxed(i16::try_from(n).ok()?),
        ScalarKind::I32 => boxed(i32::try_from(n).ok()?),
        ScalarKind::I64 => boxed(i64::try_from(n).ok()?),
        ScalarKind::Isize => boxed(isize::try_from(n).ok()?),
        ScalarKind::U8 => boxed(u8::try_from(n).ok()?),
        ScalarKind::U16 => boxed(u16::try_from(n).ok()?),
        ScalarKind::U32 => boxed(u32::try_from(n).ok()?),
        ScalarKind::U64 => boxed(u64::try_from(n).ok()?),
        ScalarKind::Usize => boxed(usize::try_from(n).ok()?),
        ScalarKind::F32 => boxed(n as f32),
        ScalarKind::F64 => boxed(n as f64),
        ScalarKind::Duration => boxed(Duration::from_secs(u64::try_from(n).ok()?)),
        ScalarKind::String => boxed(n.to_string()),
        _ => return None,
    };
    Some(value)
}

fn from_float(n: f64, kind: ScalarKind) -> Option<Box<dyn Reflect>> {
    match kind {
        ScalarKind::F32 => Some(boxed(n as f32)),
        ScalarKind::F64 => Some(boxed(n)),
        ScalarKind::Duration => Duration::try_from_secs_f64(n).ok().map(boxed),
        ScalarKind::String => Some(boxed(n.to_string())),
        _ if kind.is_numeric() && n.is_finite() && n.fract() == 0.0 => from_integer(n as i128, kind),
        _ => None,
    }
}

#[inline]
fn boxed<T: Reflect>(value: T) -> Box<dyn Reflect> {
    Box::new(value)
}

// -----------------------------------------------------------------------------
// to_value

/// Converts a value of the underlying type of `shape` into a [`Value`].
///
/// Enums become the document name of their variant.
pub fn to_value(value: &dyn Reflect, shape: &TypeShape, options: &Options) -> Result<Value> {
    let unsupported = || Error::ValueConversion {
        value: value.reflect_type_path().to_owned(),
        type_path: "a value",
    };

    if let Some(info) = shape.enum_info() {
        let ReflectRef::Enum(e) = value.reflect_ref() else {
            return Err(unsupported());
        };
        let variant = info.variant_at(e.variant_index()).ok_or_else(unsupported)?;
        return Ok(Value::Str(
            variant_name(variant, options.enum_naming()).into_owned(),
        ));
    }

    let kind = shape.scalar().ok_or_else(unsupported)?;
    scalar_to_value(value, kind).ok_or_else(unsupported)
}

fn scalar_to_value(value: &dyn Reflect, kind: ScalarKind) -> Option<Value> {
    let value = match kind {
        ScalarKind::String => Value::Str(value.downcast_ref::<String>()?.clone()),
        ScalarKind::Char => Value::Str(value.downcast_ref::<char>()?.to_string()),
        ScalarKind::Bool => Value::Bool(*value.downcast_ref::<bool>()?),
        ScalarKind::I8 => Value::from(*value.downcast_ref::<i8>()?),
        ScalarKind::I16 => Value::from(*value.downcast_ref::<i16>()?),
        ScalarKind::I32 => Value::from(*value.downcast_ref::<i32>()?),
        ScalarKind::I64 => Value::from(*value.downcast_ref::<i64>()?),
        ScalarKind::Isize => Value::Int(i64::try_from(*value.downcast_ref::<isize>()?).ok()?),
        ScalarKind::U8 => Value::from(*value.downcast_ref::<u8>()?),
        ScalarKind::U16 => Value::from(*value.downcast_ref::<u16>()?),
        ScalarKind::U32 => Value::from(*value.downcast_ref::<u32>()?),
        ScalarKind::U64 => Value::from(*value.downcast_ref::<u64>()?),
        ScalarKind::Usize => Value::UInt(u64::try_from(*value.downcast_ref::<usize>()?).ok()?),
        // Widened through the shortest text form, so 0.1f32 stays 0.1.
        ScalarKind::F32 => {
            let n = *value.downcast_ref::<f32>()?;
            Value::Float(n.to_string().parse().unwrap_or(f64::from(n)))
        }
        ScalarKind::F64 => Value::Float(*value.downcast_ref::<f64>()?),
        ScalarKind::Duration => Value::Float(value.downcast_ref::<Duration>()?.as_secs_f64()),
        ScalarKind::DateTime => Value::Str(
            value
                .downcast_ref::<DateTime<Utc>>()?
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ),
        ScalarKind::NaiveDate => {
            Value::Str(value.downcast_ref::<NaiveDate>()?.format("%Y-%m-%d").to_string())
        }
        ScalarKind::NaiveDateTime => Value::Str(
            value
                .downcast_ref::<NaiveDateTime>()?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        ScalarKind::Uuid => Value::Str(value.downcast_ref::<uuid::Uuid>()?.hyphenated().to_string()),
        ScalarKind::Url => Value::Str(value.downcast_ref::<url::Url>()?.as_str().to_owned()),
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use tl_reflect::derive::Reflect;

    use super::{coerce, parse, to_value};
    use crate::{Error, NamingConvention, Options, Value};

    #[derive(Reflect, Debug, PartialEq)]
    enum Level {
        Low = 1,
        #[reflect(rename = "HIGH")]
        High = 5,
    }

    #[test]
    fn enums_by_name_and_discriminant() {
        let options = Options::default();
        let shape = options.shapes().get_type::<Level>();

        let low = parse("Low", &shape, &options).unwrap();
        assert_eq!(low.take::<Level>().ok(), Some(Level::Low));

        let high = coerce(Value::Int(5), &shape, &options).unwrap().unwrap();
        assert_eq!(high.take::<Level>().ok(), Some(Level::High));

        let err = parse("low", &shape, &options).unwrap_err();
        assert_eq!(
            err.friendly_message(),
            Some("'low' is not a valid option, must be one of the following: Low, HIGH.")
        );
    }

    #[test]
    fn enum_names_follow_convention() {
        let options = Options::builder()
            .enum_naming(NamingConvention::LowerCase)
            .build();
        let shape = options.shapes().get_type::<Level>();

        assert_eq!(to_value(&Level::Low, &shape, &options).unwrap(), Value::from("low"));
        assert_eq!(to_value(&Level::High, &shape, &options).unwrap(), Value::from("HIGH"));
    }

    #[test]
    fn friendly_template_override() {
        let options = Options::builder()
            .friendly_message::<u8>("{value} is not a {type}!")
            .build();
        let shape = options.shapes().get_type::<u8>();

        let err = parse("300", &shape, &options).unwrap_err();
        assert_eq!(err.friendly_message(), Some("300 is not a u8!"));
    }

    #[test]
    fn bool_text_is_literal() {
        let options = Options::default();
        let shape = options.shapes().get_type::<bool>();

        let value = parse(" true ", &shape, &options).unwrap();
        assert_eq!(value.take::<bool>().ok(), Some(true));

        let err = parse("TRUE", &shape, &options).unwrap_err();
        assert_eq!(
            err.friendly_message(),
            Some("Boolean 'TRUE' not formatted correctly, must be 'true' or 'false'.")
        );
    }

    #[test]
    fn null_needs_nullable_shape() {
        let options = Options::default();
        let shape = options.shapes().get_type::<i32>();
        let err = coerce(Value::Null, &shape, &options).unwrap_err();
        assert!(matches!(err, Error::ValueCannotBeNull { .. }));

        // Empty text is not null for a non-nullable string.
        let shape = options.shapes().get_type::<String>();
        let value = coerce(Value::from(""), &shape, &options).unwrap().unwrap();
        assert_eq!(value.take::<String>().ok(), Some(String::new()));
    }

    #[test]
    fn numeric_conversions() {
        let options = Options::default();
        let float = options.shapes().get_type::<f32>();
        let int = options.shapes().get_type::<i16>();

        let value = coerce(Value::Int(3), &float, &options).unwrap().unwrap();
        assert_eq!(value.take::<f32>().ok(), Some(3.0));

        let value = coerce(Value::Float(12.0), &int, &options).unwrap().unwrap();
        assert_eq!(value.take::<i16>().ok(), Some(12));

        let err = coerce(Value::Float(1.5), &int, &options).unwrap_err();
        assert!(matches!(err, Error::ValueConversion { .. }));
        assert_eq!(to_value(&0.1_f32, &float, &options).unwrap(), Value::Float(0.1));
    }

    #[test]
    fn calendar_and_duration_text() {
        let options = Options::default();
        let date = options.shapes().get_type::<NaiveDate>();
        let value = parse("2024-02-29", &date, &options).unwrap();
        let parsed = value.take::<NaiveDate>().unwrap();
        assert_eq!(to_value(&parsed, &date, &options).unwrap(), Value::from("2024-02-29"));

        let span = options.shapes().get_type::<Duration>();
        let value = parse("1.5", &span, &options).unwrap();
        assert_eq!(value.take::<Duration>().ok(), Some(Duration::from_millis(1500)));

        let err = parse("2024-13-01", &date, &options).unwrap_err();
        assert!(err.friendly_message().unwrap().starts_with("Date '2024-13-01'"));
    }
}
