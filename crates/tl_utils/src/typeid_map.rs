use core::any::TypeId;
use core::fmt;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map from [`TypeId`] to `V`.
///
/// `TypeId`s are hashes already, so they are used as is through
/// [`NoOpHashState`].
///
/// ```
/// use tl_utils::TypeIdMap;
///
/// let mut templates = TypeIdMap::new();
/// templates.insert_type::<u8>("{value} is not a byte");
///
/// assert_eq!(templates.get_type::<u8>(), Some(&"{value} is not a byte"));
/// assert_eq!(templates.get_type::<i8>(), None);
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    #[inline]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Returns the stored value, calling `f` to create it only if there is
    /// none yet. An existing value is never replaced.
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        match self.0.entry(type_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(f()),
        }
    }

    /// Stores `value`, returning the one it replaced.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.0.insert(type_id, value)
    }

    #[inline]
    pub fn insert_type<T: ?Sized + 'static>(&mut self, value: V) -> Option<V> {
        self.insert(TypeId::of::<T>(), value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn first_value_is_kept() {
        let mut map = TypeIdMap::new();
        *map.get_or_insert(TypeId::of::<u8>(), || 10) += 1;
        *map.get_or_insert(TypeId::of::<u8>(), || 100) += 1;

        assert_eq!(map.get_type::<u8>(), Some(&12));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn insert_replaces() {
        let mut map = TypeIdMap::new();
        assert_eq!(map.insert_type::<String>("a"), None);
        assert_eq!(map.insert_type::<String>("b"), Some("a"));
        assert!(!map.is_empty());
    }
}
