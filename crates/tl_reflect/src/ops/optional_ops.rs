use crate::Reflect;

/// A value that may be absent, such as `Option<T>`.
///
/// ```
/// use tl_reflect::{Reflect, ops::Optional};
///
/// let mut value: Option<String> = None;
/// value.set_some("x".to_string().into_boxed_reflect()).unwrap();
/// assert_eq!(value.as_deref(), Some("x"));
///
/// value.set_none();
/// assert!(Optional::value(&value).is_none());
/// ```
pub trait Optional: Reflect {
    /// The wrapped value, if present.
    fn value(&self) -> Option<&dyn Reflect>;

    /// The wrapped value mutably, if present.
    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Stores `value`, handing it back if its type is wrong.
    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Clears the value.
    fn set_none(&mut self);
}
