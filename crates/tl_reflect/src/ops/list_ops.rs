use core::fmt;

use crate::Reflect;

/// A growable, ordered sequence.
///
/// ```
/// use tl_reflect::{Reflect, ops::List};
///
/// let mut list: Vec<u8> = vec![1];
/// List::push(&mut list, 2_u8.into_boxed_reflect()).unwrap();
///
/// assert!(List::push(&mut list, "x".to_string().into_boxed_reflect()).is_err());
/// assert_eq!(list, [1, 2]);
/// ```
pub trait List: Reflect {
    /// Returns the item at `index`.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the item at `index` mutably.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Appends an item, handing it back if its type is wrong.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Returns `true` if the list holds no items.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every item.
    fn clear(&mut self);
}

impl dyn List {
    /// Iterates the items in order.
    #[inline]
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            list: self,
            index: 0,
        }
    }
}

/// Iterator over the items of a [`List`].
pub struct ListIter<'a> {
    list: &'a dyn List,
    index: usize,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a dyn Reflect;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.list.get(self.index)?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ListIter<'_> {}

/// Debug helper for [`List`] implementations.
pub(crate) fn list_debug(value: &dyn List, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(value.iter()).finish()
}
