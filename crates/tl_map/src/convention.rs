//! Caller supplied overrides of the default mapping.
//!
//! A convention is a predicate over the current (source, target) node pair
//! plus an action. [`MappingRegistry`] picks the first matching action and
//! runs it *instead of* structural mapping. [`VisitingRegistry`] runs every
//! matching action, in registration order, *after* the mapping of the pair.
//!
//! Registries are filled through [`OptionsBuilder`](crate::OptionsBuilder)
//! and are read-only once the [`Options`](crate::Options) are built.

use core::fmt;

use crate::error::BoxError;
use crate::node::Node;

/// Decides whether a convention applies to a node pair.
pub type Predicate = dyn Fn(&dyn Node, &dyn Node) -> bool + Send + Sync;

/// Maps or visits a node pair.
pub type Action = dyn Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync;

struct Convention {
    predicate: Box<Predicate>,
    action: Box<Action>,
}

impl Convention {
    fn new<P, A>(predicate: P, action: A) -> Self
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            action: Box::new(action),
        }
    }

    #[inline]
    fn matches(&self, source: &dyn Node, target: &dyn Node) -> bool {
        (self.predicate)(source, target)
    }
}

// -----------------------------------------------------------------------------
// MappingRegistry

/// First-match-wins overrides.
///
/// Fallback entries are only consulted after every regular entry, whatever
/// the order they were added in.
///
/// ```
/// use tl_map::convention::MappingRegistry;
///
/// let mut registry = MappingRegistry::new();
/// registry.add(|_, _| false, |_, _| Ok(()));
/// registry.add_fallback(|_, _| true, |_, _| Ok(()));
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Default)]
pub struct MappingRegistry {
    entries: Vec<Convention>,
    fallbacks: Vec<Convention>,
}

impl MappingRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            fallbacks: Vec::new(),
        }
    }

    pub fn add<P, A>(&mut self, predicate: P, action: A)
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.entries.push(Convention::new(predicate, action));
    }

    pub fn add_fallback<P, A>(&mut self, predicate: P, action: A)
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.fallbacks.push(Convention::new(predicate, action));
    }

    /// Returns the action of the first entry matching the pair.
    pub fn find(&self, source: &dyn Node, target: &dyn Node) -> Option<&Action> {
        self.entries
            .iter()
            .chain(&self.fallbacks)
            .find(|c| c.matches(source, target))
            .map(|c| &*c.action)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len() + self.fallbacks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("entries", &self.entries.len())
            .field("fallbacks", &self.fallbacks.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// VisitingRegistry

/// Every-match hooks run after a node pair is mapped.
#[derive(Default)]
pub struct VisitingRegistry {
    visitors: Vec<Convention>,
}

impl VisitingRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    pub fn add<P, A>(&mut self, predicate: P, action: A)
    where
        P: Fn(&dyn Node, &dyn Node) -> bool + Send + Sync + 'static,
        A: Fn(&dyn Node, &mut dyn Node) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.visitors.push(Convention::new(predicate, action));
    }

    /// Returns the actions of all entries matching the pair, in order.
    pub fn matching(&self, source: &dyn Node, target: &dyn Node) -> Vec<&Action> {
        self.visitors
            .iter()
            .filter(|c| c.matches(source, target))
            .map(|c| &*c.action)
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl fmt::Debug for VisitingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitingRegistry")
            .field("visitors", &self.visitors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{MappingRegistry, VisitingRegistry};
    use crate::{GraphNode, Options};

    #[test]
    fn explicit_entries_beat_earlier_fallbacks() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut registry = MappingRegistry::new();

        let h = Arc::clone(&hits);
        registry.add_fallback(|_, _| true, move |_, _| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let h = Arc::clone(&hits);
        registry.add(|_, _| true, move |_, _| {
            h.fetch_add(10, Ordering::SeqCst);
            Ok(())
        });

        let options = Options::default();
        let source = GraphNode::source(&1_u8, &options);
        let mut target = GraphNode::target::<u8>(&options);

        let action = registry.find(&source, &target).unwrap();
        action(&source, &mut target).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn visitors_all_match_in_order() {
        let mut registry = VisitingRegistry::new();
        registry.add(|_, _| true, |_, _| Ok(()));
        registry.add(|_, _| false, |_, _| Err("unused".into()));
        registry.add(|_, _| true, |_, _| Err("second".into()));

        let options = Options::default();
        let source = GraphNode::source(&1_u8, &options);
        let mut target = GraphNode::target::<u8>(&options);

        let actions = registry.matching(&source, &target);
        assert_eq!(actions.len(), 2);
        assert!(actions[0](&source, &mut target).is_ok());
        assert_eq!(actions[1](&source, &mut target).unwrap_err().to_string(), "second");
    }
}
