use core::fmt;

use thiserror::Error;

use crate::node::NodeType;

/// Error type returned by convention callbacks.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// Error

/// Everything that can go wrong while mapping two trees.
///
/// Errors leaving [`Mapper::map`](crate::Mapper::map) are always one of the
/// two wrapper kinds, [`Error::Mapping`] or [`Error::FriendlyMapping`], which
/// carry the position of the failure in both trees. The wrapped error is
/// available through [`Error::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("the node type of `{path}` cannot be changed")]
    NodeTypeReadonly { path: String },

    #[error("node `{path}` has no name")]
    NameNotSupported { path: String },

    #[error("{node_type} node `{path}` does not hold a value")]
    ValueNotSupported { path: String, node_type: NodeType },

    #[error("node `{path}` is read-only")]
    ReadOnly { path: String },

    #[error("value node `{path}` cannot have children")]
    ChildrenNotSupported { path: String },

    #[error("object node `{path}` cannot adopt an unnamed child")]
    UnnamedChild { path: String },

    #[error("cannot map {from_type} node `{from_path}` onto {to_type} node `{to_path}`")]
    NodeTypeMismatch {
        from_type: NodeType,
        from_path: String,
        to_type: NodeType,
        to_path: String,
    },

    #[error("missing required node(s) {} in `{path}`", names.join(", "))]
    MissingNode { path: String, names: Vec<String> },

    #[error("unrecognized node `{name}` in `{path}`")]
    UnrecognizedNode { path: String, name: String },

    #[error("could not parse '{value}' as {type_path}")]
    ValueParse {
        value: String,
        type_path: &'static str,
        friendly: String,
    },

    #[error("cannot convert {value} to {type_path}")]
    ValueConversion { value: String, type_path: &'static str },

    #[error("{type_path} cannot be null")]
    ValueCannotBeNull { type_path: &'static str },

    #[error("could not create an instance of {type_path}")]
    ObjectCreation { type_path: &'static str },

    #[error("custom reader failed: {0}")]
    Reader(#[source] BoxError),

    #[error("custom writer failed: {0}")]
    Writer(#[source] BoxError),

    /// An error meant to be shown to an end user as is.
    #[error("{0}")]
    Friendly(String),

    /// Syntax or I/O failure inside a format adapter.
    #[error("{0}")]
    Format(String),

    #[error(transparent)]
    Mapping(Box<MappingError>),

    #[error(transparent)]
    FriendlyMapping(Box<MappingError>),
}

impl Error {
    /// Returns the end-user message carried by this error, if any.
    ///
    /// ```
    /// use tl_map::Error;
    ///
    /// let err = Error::Friendly("Pick a colour.".into());
    /// assert_eq!(err.friendly_message(), Some("Pick a colour."));
    ///
    /// let err = Error::ObjectCreation { type_path: "demo::Thing" };
    /// assert_eq!(err.friendly_message(), None);
    /// ```
    pub fn friendly_message(&self) -> Option<&str> {
        match self {
            Self::ValueParse { friendly, .. } => Some(friendly.as_str()),
            Self::Friendly(message) => Some(message.as_str()),
            Self::Mapping(inner) | Self::FriendlyMapping(inner) => inner.error.friendly_message(),
            Self::Reader(inner) | Self::Writer(inner) => inner
                .downcast_ref::<Error>()
                .and_then(Error::friendly_message),
            _ => None,
        }
    }

    /// Returns the innermost error, looking through the mapping wrappers.
    pub fn kind(&self) -> &Error {
        match self {
            Self::Mapping(inner) | Self::FriendlyMapping(inner) => inner.error.kind(),
            _ => self,
        }
    }

    /// Returns the positional context if this is a wrapper.
    pub fn context(&self) -> Option<&MappingError> {
        match self {
            Self::Mapping(inner) | Self::FriendlyMapping(inner) => Some(inner),
            _ => None,
        }
    }

    #[inline]
    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Mapping(_) | Self::FriendlyMapping(_))
    }

    /// Returns `true` for children a target did not expect.
    #[inline]
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::UnrecognizedNode { .. })
    }

    /// Wraps a callback error, passing friendly errors through untouched.
    pub(crate) fn from_callback(err: BoxError, wrap: fn(BoxError) -> Error) -> Error {
        match err.downcast::<Error>() {
            Ok(err) if err.friendly_message().is_some() => *err,
            Ok(err) => wrap(err),
            Err(err) => wrap(err),
        }
    }
}

// -----------------------------------------------------------------------------
// MappingError

/// One side of a failed mapping step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub format: String,
    pub node_type: NodeType,
    pub path: String,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} `{}`", self.format, self.node_type, self.path)
    }
}

/// Context added exactly once to an error on its way out of the mapper.
#[derive(Debug)]
pub struct MappingError {
    pub source: Position,
    pub target: Position,
    pub error: Error,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (while mapping {} to {})",
            self.error, self.source, self.target
        )
    }
}

impl core::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl MappingError {
    /// Wraps `error` unless it already carries a position.
    pub(crate) fn wrap(error: Error, source: Position, target: Position) -> Error {
        if error.is_wrapped() {
            return error;
        }
        let friendly = error.friendly_message().is_some();
        let inner = Box::new(MappingError {
            source,
            target,
            error,
        });
        if friendly {
            Error::FriendlyMapping(inner)
        } else {
            Error::Mapping(inner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoxError, Error, MappingError, Position};
    use crate::node::NodeType;

    fn position(path: &str) -> Position {
        Position {
            format: "test".into(),
            node_type: NodeType::Value,
            path: path.into(),
        }
    }

    #[test]
    fn wraps_once() {
        let err = Error::ObjectCreation { type_path: "a::B" };
        let err = MappingError::wrap(err, position("inner"), position("inner"));
        let err = MappingError::wrap(err, position("outer"), position("outer"));

        let ctx = err.context().unwrap();
        assert_eq!(ctx.source.path, "inner");
        assert!(matches!(err.kind(), Error::ObjectCreation { .. }));
        assert!(matches!(err, Error::Mapping(_)));
    }

    #[test]
    fn friendly_errors_get_friendly_wrapper() {
        let err = Error::ValueParse {
            value: "abc".into(),
            type_path: "i32",
            friendly: "nope".into(),
        };
        let err = MappingError::wrap(err, position("a"), position("b"));
        assert!(matches!(err, Error::FriendlyMapping(_)));
        assert_eq!(err.friendly_message(), Some("nope"));
        assert!(err.to_string().contains("test value `a`"));
    }

    #[test]
    fn callback_errors_are_translated() {
        let plain: BoxError = "boom".into();
        let err = Error::from_callback(plain, Error::Reader);
        assert!(matches!(err, Error::Reader(_)));

        let friendly: BoxError = Box::new(Error::Friendly("Try again.".into()));
        let err = Error::from_callback(friendly, Error::Writer);
        assert!(matches!(err, Error::Friendly(_)));
    }
}
