use std::sync::{Arc, PoisonError, RwLock};

use tl_reflect::info::{TypeInfo, Typed};
use tl_utils::TypeIdMap;

use crate::naming::NamingConvention;
use crate::shape::TypeShape;

/// The settings a [`TypeShape`] depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShapePolicy {
    /// Spelling of member names and item names.
    pub member_naming: NamingConvention,
    /// Map custom list types with declared members as complex objects.
    pub treat_list_impls_as_objects: bool,
    /// Map custom map types with declared members as complex objects.
    pub treat_map_impls_as_objects: bool,
}

/// Memoized [`TypeShape`]s for one [`ShapePolicy`].
///
/// Safe to share between threads. Two threads asking for the same unknown
/// type may both compute it; the first one stored is kept and returned to
/// both.
///
/// ```
/// use std::sync::Arc;
/// use tl_map::shape::{ShapeCache, ShapePolicy};
///
/// let cache = ShapeCache::new(ShapePolicy::default());
/// let a = cache.get_type::<Vec<u8>>();
/// let b = cache.get_type::<Vec<u8>>();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug)]
pub struct ShapeCache {
    policy: ShapePolicy,
    shapes: RwLock<TypeIdMap<Arc<TypeShape>>>,
}

impl ShapeCache {
    pub fn new(policy: ShapePolicy) -> Self {
        Self {
            policy,
            shapes: RwLock::new(TypeIdMap::new()),
        }
    }

    #[inline]
    pub fn policy(&self) -> &ShapePolicy {
        &self.policy
    }

    #[inline]
    pub fn get_type<T: Typed>(&self) -> Arc<TypeShape> {
        self.get(T::type_info())
    }

    /// Returns the shape of the type described by `info`.
    pub fn get(&self, info: &'static TypeInfo) -> Arc<TypeShape> {
        let type_id = info.ty_id();
        if let Some(shape) = self
            .shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return Arc::clone(shape);
        }

        // Computed outside the lock so member naming never blocks readers.
        log::trace!("computing shape of {}", info.type_path());
        let shape = Arc::new(TypeShape::compute(info, &self.policy));

        let mut shapes = self.shapes.write().unwrap_or_else(PoisonError::into_inner);
        let mut raced = true;
        let stored = shapes.get_or_insert(type_id, || {
            raced = false;
            shape
        });
        if raced {
            log::trace!("shape of {} was computed concurrently", info.type_path());
        }
        Arc::clone(stored)
    }

    /// Number of cached shapes.
    pub fn len(&self) -> usize {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::{ShapeCache, ShapePolicy};

    #[test]
    fn concurrent_first_access_keeps_one_shape() {
        let cache = Arc::new(ShapeCache::new(ShapePolicy::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_type::<Option<String>>())
            })
            .collect();

        let shapes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(shapes.iter().all(|s| Arc::ptr_eq(s, &shapes[0])));
        assert_eq!(cache.len(), 1);
    }
}
