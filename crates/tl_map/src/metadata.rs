use core::any::Any;
use core::fmt;
use std::sync::Arc;

// -----------------------------------------------------------------------------
// Metadata

/// An open bag of annotations attached to a node by the adapter that made it.
///
/// Tags are looked up by type, so adapters can define their own without
/// touching this crate. The core reacts to [`AsAttribute`], [`ItemName`]
/// and [`MemberName`].
///
/// ```
/// use tl_map::metadata::{AsAttribute, ItemName, Metadata};
///
/// let meta = Metadata::new()
///     .with(ItemName("Phone".into()))
///     .with(AsAttribute);
///
/// assert!(meta.contains::<AsAttribute>());
/// assert_eq!(meta.get::<ItemName>().map(|t| t.0.as_str()), Some("Phone"));
/// ```
#[derive(Clone, Default)]
pub struct Metadata {
    tags: Vec<Arc<dyn Any + Send + Sync>>,
}

impl Metadata {
    #[inline]
    pub const fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Appends a tag.
    pub fn push<T: Any + Send + Sync>(&mut self, tag: T) {
        self.tags.push(Arc::new(tag));
    }

    /// Appends a tag, builder style.
    #[inline]
    pub fn with<T: Any + Send + Sync>(mut self, tag: T) -> Self {
        self.push(tag);
        self
    }

    /// Returns the first tag of type `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.get_all::<T>().next()
    }

    /// Returns every tag of type `T`, in insertion order.
    pub fn get_all<T: Any>(&self) -> impl Iterator<Item = &T> {
        self.tags.iter().filter_map(|tag| tag.downcast_ref::<T>())
    }

    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Appends every tag of `other`.
    pub fn extend(&mut self, other: &Metadata) {
        self.tags.extend(other.tags.iter().cloned());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("len", &self.tags.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tags

/// The node prefers attribute placement in formats that have attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsAttribute;

/// Overrides the name given to each item of a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemName(pub String);

/// The in-memory name of the member a node was produced for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberName(pub String);

#[cfg(test)]
mod tests {
    use super::{AsAttribute, ItemName, Metadata};

    #[test]
    fn get_all_keeps_order() {
        let mut meta = Metadata::new();
        meta.push(ItemName("a".into()));
        meta.push(AsAttribute);
        meta.push(ItemName("b".into()));

        let names: Vec<_> = meta.get_all::<ItemName>().map(|t| t.0.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(meta.len(), 3);
    }

    #[test]
    fn adapters_can_define_tags() {
        struct Namespace(&'static str);

        let meta = Metadata::new().with(Namespace("urn:x"));
        assert_eq!(meta.get::<Namespace>().map(|n| n.0), Some("urn:x"));
        assert!(!meta.contains::<AsAttribute>());
    }
}
