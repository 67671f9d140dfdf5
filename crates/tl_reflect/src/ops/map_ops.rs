use core::fmt;

use crate::Reflect;

/// Iterator over the entries of a [`Map`].
pub type MapIter<'a> = Box<dyn Iterator<Item = (&'a dyn Reflect, &'a dyn Reflect)> + 'a>;

/// A key-value collection.
///
/// ```
/// use std::collections::BTreeMap;
/// use tl_reflect::{Reflect, ops::Map};
///
/// let mut map = BTreeMap::<String, i32>::new();
/// map.insert_boxed("a".to_string().into_boxed_reflect(), 1_i32.into_boxed_reflect())
///     .unwrap();
///
/// assert_eq!(map["a"], 1);
/// assert_eq!(Map::len(&map), 1);
/// ```
pub trait Map: Reflect {
    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no entries.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(key, value)` pairs in the map's own order.
    fn iter(&self) -> MapIter<'_>;

    /// Inserts an entry, handing both parts back if a type is wrong.
    ///
    /// An existing entry for the same key is replaced.
    #[allow(clippy::type_complexity, reason = "both halves are returned on failure")]
    fn insert_boxed(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)>;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Debug helper for [`Map`] implementations.
pub(crate) fn map_debug(value: &dyn Map, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(value.iter()).finish()
}
