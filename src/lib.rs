#![doc = include_str!("../README.md")]

#![cfg_attr(not(test), no_std)]

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

extern crate alloc;

mod error;
mod identity;
mod iter;
mod policy;

use core::fmt;
use core::hash::BuildHasher;
use core::mem;

use alloc::vec::Vec;

use hashbrown::hash_map::Entry;
use hashbrown::{DefaultHashBuilder, HashMap};

pub use error::SliceMapError;
pub use identity::Identity;
pub use iter::{Cursor, IntoIter, Iter, IterMut};
pub use policy::ShrinkPolicy;

/// An identity-keyed map whose elements live contiguously in one slice.
///
/// Elements are kept in a dense store of slots. The first [`len`](Self::len)
/// slots hold every live element with no gaps; slots past that are stale
/// capacity that the next insertion reuses. A hash map records, for every
/// identity, the position of its element in the store.
///
/// Removing an element moves the last live element into the hole, so
/// removal is O(1) but the store is not kept in insertion order once
/// anything has been removed. After each removal the [`ShrinkPolicy`]
/// decides whether the stale tail is truncated.
///
/// The map is not synchronized; share it behind a lock if needed.
pub struct SliceMap<T: Identity, S = DefaultHashBuilder> {
    index_map: HashMap<T::Id, usize, S>, // identity -> position in store
    store: Vec<Option<T>>, // live region followed by stale slots

    live_count: usize,
    policy: ShrinkPolicy,
}

impl<T: Identity> SliceMap<T, DefaultHashBuilder> {
    /// Creates an empty `SliceMap`.
    ///
    /// The map does not allocate until it is first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::SliceMap;
    ///
    /// let map: SliceMap<u32> = SliceMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty `SliceMap` able to hold `n` elements without
    /// reallocating.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self::with_capacity_and_hasher(n, DefaultHashBuilder::default())
    }

    /// Creates an empty `SliceMap` that shrinks according to `policy`.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::{ShrinkPolicy, SliceMap};
    ///
    /// let map: SliceMap<u64> = SliceMap::with_policy(ShrinkPolicy::never());
    /// assert_eq!(map.policy(), ShrinkPolicy::never());
    /// ```
    #[inline]
    pub fn with_policy(policy: ShrinkPolicy) -> Self {
        let mut map = Self::new();
        map.policy = policy;
        map
    }
}

impl<T: Identity, S> SliceMap<T, S> {
    /// Creates an empty `SliceMap` using the hasher `h` for the index map.
    #[inline]
    pub fn with_hasher(h: S) -> Self {
        Self::with_capacity_and_hasher(0, h)
    }

    /// Creates an empty `SliceMap` with room for `n` elements, using the
    /// hasher `h` for the index map.
    #[inline]
    pub fn with_capacity_and_hasher(n: usize, h: S) -> Self {
        Self {
            index_map: HashMap::with_capacity_and_hasher(n, h),
            store: Vec::with_capacity(n),
            live_count: 0,
            policy: ShrinkPolicy::default(),
        }
    }

    /// Returns the number of live elements.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.live_count
    }

    /// Returns `true` if the map holds no live elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Returns the number of physical slots in the store, live and stale.
    ///
    /// Always at least [`len`](Self::len), and equal to it right after
    /// [`shrink`](Self::shrink).
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.store.len()
    }

    /// Returns the policy consulted after every removal.
    #[inline(always)]
    pub const fn policy(&self) -> ShrinkPolicy {
        self.policy
    }

    /// Replaces the shrink policy. Takes effect on the next removal.
    #[inline]
    pub fn set_policy(&mut self, policy: ShrinkPolicy) {
        self.policy = policy;
    }

    /// Truncates the store to the live count, releasing every stale slot.
    ///
    /// Unlike the automatic shrink after a removal, this ignores the
    /// policy thresholds. Does nothing if there are no stale slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::SliceMap;
    ///
    /// let mut map: SliceMap<u32> = (0..10).collect();
    /// map.remove(&9);
    /// map.remove(&8);
    /// assert_eq!(map.capacity(), 10);
    ///
    /// map.shrink();
    /// assert_eq!(map.capacity(), map.len());
    /// ```
    pub fn shrink(&mut self) {
        if self.live_count < self.store.len() {
            tracing::trace!(
                live = self.live_count,
                slots = self.store.len(),
                "truncating stale slots"
            );
            self.truncate_store();
        }
    }

    /// Removes every element. No slots are kept.
    #[inline]
    pub fn clear(&mut self) {
        self.index_map.clear();
        self.store.clear();
        self.live_count = 0;
    }

    /// Returns an iterator over live elements in store order.
    ///
    /// Store order is insertion order until the first removal swaps the
    /// tail element into a hole.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.store[..self.live_count].iter(),
        }
    }

    /// Returns a mutable iterator over live elements in store order.
    ///
    /// Identities must not be changed through the returned references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slots: self.store[..self.live_count].iter_mut(),
        }
    }

    /// Calls `visit` on every live element in store order.
    ///
    /// This is the fast traversal: the map is borrowed for the whole
    /// traversal so it cannot change underneath. Use
    /// [`iter_tolerant`](Self::iter_tolerant) to remove elements while
    /// visiting.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::SliceMap;
    ///
    /// let map: SliceMap<u32> = [3, 1, 2].into_iter().collect();
    /// let mut sum = 0;
    /// map.fast_iter(|id| sum += id);
    /// assert_eq!(sum, 6);
    /// ```
    #[inline]
    pub fn fast_iter<F>(&self, visit: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(visit)
    }

    #[inline]
    fn truncate_store(&mut self) {
        self.store.truncate(self.live_count);
        self.store.shrink_to_fit();
    }

    #[inline]
    fn id_at(&self, pos: usize) -> Option<T::Id> {
        self.store.get(pos)?.as_ref().map(Identity::identity)
    }
}

impl<T, S> SliceMap<T, S>
where
    T: Identity,
    S: BuildHasher,
{
    /// Returns the element whose identity is `id`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        let &pos = self.index_map.get(id)?;
        self.store[pos].as_ref()
    }

    /// Returns a mutable reference to the element whose identity is `id`.
    ///
    /// The element's identity must not be changed through the reference.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        let &pos = self.index_map.get(id)?;
        self.store[pos].as_mut()
    }

    /// Returns `true` if an element with identity `id` is live.
    #[inline]
    pub fn contains_id(&self, id: &T::Id) -> bool {
        self.index_map.contains_key(id)
    }

    /// Inserts an element under its own identity.
    ///
    /// If an element with the same identity is already live it is replaced
    /// in place and returned; the live count does not change. Otherwise the
    /// element takes the first slot past the live region, reusing a stale
    /// slot when one exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::{Identity, SliceMap};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct User { id: u32, name: &'static str }
    ///
    /// impl Identity for User {
    ///     type Id = u32;
    ///     fn identity(&self) -> u32 { self.id }
    /// }
    ///
    /// let mut map = SliceMap::new();
    /// assert_eq!(map.insert(User { id: 1, name: "a" }), None);
    /// let old = map.insert(User { id: 1, name: "b" });
    /// assert_eq!(old, Some(User { id: 1, name: "a" }));
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&1).map(|u| u.name), Some("b"));
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn insert(&mut self, element: T) -> Option<T> {
        match self.index_map.entry(element.identity()) {
            Entry::Occupied(entry) => self.store[*entry.get()].replace(element),
            Entry::Vacant(entry) => {
                let pos = self.live_count;
                entry.insert(pos);
                if pos < self.store.len() {
                    self.store[pos] = Some(element)
                } else {
                    self.store.push(Some(element))
                }
                self.live_count += 1;
                None
            }
        }
    }

    /// Removes the element whose identity is `id` and returns it.
    ///
    /// Removing an absent identity is a no-op. If the element is not the
    /// last live one, the last live element is moved into its slot. The
    /// [`ShrinkPolicy`] is evaluated afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::SliceMap;
    ///
    /// let mut map: SliceMap<u32> = (1..=5).collect();
    /// assert_eq!(map.remove(&2), Some(2));
    /// assert_eq!(map.remove(&2), None);
    ///
    /// // the tail element took the freed slot
    /// assert_eq!(map.iter().copied().collect::<Vec<_>>(), vec![1, 5, 3, 4]);
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let pos = self.index_map.remove(id)?;

        self.live_count -= 1;
        let tail = self.live_count;

        let removed = if pos == tail {
            self.store[pos].take()
        } else {
            let moved = self.store[tail].take();
            if let Some(moved) = &moved {
                self.index_map.insert(moved.identity(), pos);
            }
            mem::replace(&mut self.store[pos], moved)
        };

        if self.policy.should_shrink(self.live_count, self.store.len()) {
            tracing::debug!(
                live = self.live_count,
                slots = self.store.len(),
                "shrink policy triggered"
            );
            self.truncate_store();
        }

        removed
    }

    /// Visits every live element while allowing removals.
    ///
    /// The visitor receives a [`Cursor`] for the current element. Positions
    /// are walked by index; when a removal swaps a different element into
    /// the position just visited, that element is visited before moving on.
    ///
    /// Removing only the current element visits every element exactly
    /// once. Removing other elements gives a weaker guarantee: the
    /// traversal terminates and never panics, but elements moved into
    /// positions already passed are not visited, and elements moved ahead
    /// of the walk may be visited twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::SliceMap;
    ///
    /// let mut map: SliceMap<u32> = (0..10).collect();
    /// let mut seen = 0;
    /// map.iter_tolerant(|cursor| {
    ///     seen += 1;
    ///     if cursor.id() % 3 == 0 {
    ///         cursor.remove();
    ///     }
    /// });
    /// assert_eq!(seen, 10);
    /// assert_eq!(map.len(), 6);
    /// ```
    pub fn iter_tolerant<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Cursor<'_, T, S>),
    {
        let mut pos = 0;
        while let Some(mut last) = self.id_at(pos) {
            visit(&mut Cursor { map: self, id: last });

            // a removal may have swapped the former tail into this slot
            while let Some(next) = self.id_at(pos) {
                if next == last {
                    break;
                }
                visit(&mut Cursor { map: self, id: next });
                last = next;
            }

            pos += 1;
        }
    }

    /// Keeps only the elements for which `keep` returns `true`.
    ///
    /// Each element is passed to `keep` exactly once.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.iter_tolerant(|cursor| {
            let discard = cursor.get().is_some_and(|element| !keep(element));
            if discard {
                cursor.remove();
            }
        });
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new allocation size overflows `usize`.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.index_map.reserve(additional);
        self.store.reserve(additional);
    }

    /// Tries to reserve room for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// Returns [`SliceMapError::CapacityOverflow`] if either the store or
    /// the index map cannot grow.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), SliceMapError> {
        let overflow = SliceMapError::CapacityOverflow { additional };
        self.store
            .try_reserve(additional)
            .map_err(|_| overflow.clone())?;
        self.index_map.try_reserve(additional).map_err(|_| overflow)
    }
}

impl<'a, T: Identity, S> IntoIterator for &'a SliceMap<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Identity, S> IntoIterator for &'a mut SliceMap<T, S> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: Identity, S> IntoIterator for SliceMap<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let mut store = self.store;
        store.truncate(self.live_count);
        IntoIter {
            slots: store.into_iter(),
        }
    }
}

impl<T, S> FromIterator<T> for SliceMap<T, S>
where
    T: Identity,
    S: Default + BuildHasher,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());
        iter.for_each(|element| _ = map.insert(element));
        map
    }
}

impl<T, S> Extend<T> for SliceMap<T, S>
where
    T: Identity,
    S: BuildHasher,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };
        self.reserve(reserve);
        iter.for_each(move |element| _ = self.insert(element));
    }
}

impl<T, S> Default for SliceMap<T, S>
where
    T: Identity,
    S: Default,
{
    #[inline]
    fn default() -> Self {
        Self::with_capacity_and_hasher(0, S::default())
    }
}

impl<T, S> Clone for SliceMap<T, S>
where
    T: Identity + Clone,
    S: Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            index_map: self.index_map.clone(),
            store: self.store.clone(),
            live_count: self.live_count,
            policy: self.policy,
        }
    }
}

impl<T, S> PartialEq for SliceMap<T, S>
where
    T: Identity + PartialEq,
    S: BuildHasher,
{
    /// Two maps are equal when they hold equal elements under the same
    /// identities, regardless of store order.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|element| {
            other
                .get(&element.identity())
                .is_some_and(|theirs| element == theirs)
        })
    }
}

impl<T, S> Eq for SliceMap<T, S>
where
    T: Identity + Eq,
    S: BuildHasher,
{
}

impl<T, S> fmt::Debug for SliceMap<T, S>
where
    T: Identity + fmt::Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|element| (element.identity(), element)))
            .finish()
    }
}
