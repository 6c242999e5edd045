//! Iterators over the live region and the cursor handed to tolerant visitors.

use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use core::slice;

use alloc::vec;

use crate::{Identity, SliceMap};

/// Borrowing iterator over live elements in store order.
///
/// Created by [`SliceMap::iter`]. Stops at the first empty slot.
#[derive(Debug)]
pub struct Iter<'a, T> {
    pub(crate) slots: slice::Iter<'a, Option<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<Self::Item> {
        match self.slots.next()? {
            Some(element) => Some(element),
            None => {
                self.slots = Default::default();
                None
            }
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

/// Mutable iterator over live elements in store order.
///
/// Created by [`SliceMap::iter_mut`]. Elements may be modified in place but
/// their identity must stay the same.
#[derive(Debug)]
pub struct IterMut<'a, T> {
    pub(crate) slots: slice::IterMut<'a, Option<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<Self::Item> {
        match self.slots.next()? {
            Some(element) => Some(element),
            None => {
                self.slots = Default::default();
                None
            }
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over live elements in store order.
///
/// Created by the `IntoIterator` impl of [`SliceMap`].
#[derive(Debug)]
pub struct IntoIter<T> {
    pub(crate) slots: vec::IntoIter<Option<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<Self::Item> {
        match self.slots.next()? {
            Some(element) => Some(element),
            None => {
                self.slots = Default::default();
                None
            }
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

/// Handle passed to the visitor of [`SliceMap::iter_tolerant`].
///
/// Points at the element being visited and allows deleting it, or any other
/// element, without invalidating the traversal. Insertion is not offered,
/// which is what bounds the traversal.
pub struct Cursor<'a, T: Identity, S> {
    pub(crate) map: &'a mut SliceMap<T, S>,
    pub(crate) id: T::Id,
}

impl<T, S> Cursor<'_, T, S>
where
    T: Identity,
    S: BuildHasher,
{
    /// Identity of the element being visited.
    #[inline(always)]
    pub fn id(&self) -> T::Id {
        self.id
    }

    /// The element being visited, or `None` once it has been removed.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.map.get(&self.id)
    }

    /// Mutable access to the element being visited.
    ///
    /// The element's identity must not be changed.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.map.get_mut(&self.id)
    }

    /// Looks up any live element.
    #[inline]
    pub fn lookup(&self, id: &T::Id) -> Option<&T> {
        self.map.get(id)
    }

    /// Removes the element being visited.
    ///
    /// The former tail element, if it is swapped into this position, is
    /// visited next.
    #[inline]
    pub fn remove(&mut self) -> Option<T> {
        self.map.remove(&self.id)
    }

    /// Removes an arbitrary element.
    ///
    /// Removing elements other than the current one may cause some elements
    /// to be skipped or visited twice.
    #[inline]
    pub fn remove_id(&mut self, id: &T::Id) -> Option<T> {
        self.map.remove(id)
    }

    /// Number of live elements in the map right now.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map has become empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<T, S> fmt::Debug for Cursor<'_, T, S>
where
    T: Identity,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("id", &self.id)
            .field("live", &self.map.len())
            .finish()
    }
}
