//! The identity capability every element stored in a [`SliceMap`] exposes.
//!
//! [`SliceMap`]: crate::SliceMap

use core::fmt;
use core::hash::Hash;

use alloc::boxed::Box;
use alloc::rc::Rc;
#[cfg(target_has_atomic = "ptr")]
use alloc::sync::Arc;

/// A value that carries its own, caller-defined key.
///
/// The map reads the identity when an element is inserted and whenever the
/// element is relocated by a swap-delete. It never assigns identities itself.
///
/// The identity of an element must not change while the element is held by
/// a map; doing so silently desynchronizes the index map from the store.
///
/// # Examples
///
/// ```
/// use slice_map::Identity;
///
/// struct Session {
///     id: u32,
///     user: &'static str,
/// }
///
/// impl Identity for Session {
///     type Id = u32;
///
///     fn identity(&self) -> u32 {
///         self.id
///     }
/// }
///
/// let s = Session { id: 7, user: "ann" };
/// assert_eq!(s.identity(), 7);
/// # let _ = s.user;
/// ```
pub trait Identity {
    /// The key type, usually an integer.
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Returns the identity of this element.
    fn identity(&self) -> Self::Id;
}

macro_rules! impl_identity_for_integers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identity for $ty {
                type Id = $ty;

                #[inline(always)]
                fn identity(&self) -> $ty {
                    *self
                }
            }
        )*
    };
}

// an integer is its own identity, which turns `SliceMap<u32>` into a dense id set
impl_identity_for_integers!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<T: Identity + ?Sized> Identity for &T {
    type Id = T::Id;

    #[inline(always)]
    fn identity(&self) -> T::Id {
        (**self).identity()
    }
}

impl<T: Identity + ?Sized> Identity for Box<T> {
    type Id = T::Id;

    #[inline(always)]
    fn identity(&self) -> T::Id {
        (**self).identity()
    }
}

impl<T: Identity + ?Sized> Identity for Rc<T> {
    type Id = T::Id;

    #[inline(always)]
    fn identity(&self) -> T::Id {
        (**self).identity()
    }
}

#[cfg(target_has_atomic = "ptr")]
impl<T: Identity + ?Sized> Identity for Arc<T> {
    type Id = T::Id;

    #[inline(always)]
    fn identity(&self) -> T::Id {
        (**self).identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        id: i64,
    }

    impl Identity for Named {
        type Id = i64;

        fn identity(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_integers_are_their_own_identity() {
        assert_eq!(5u8.identity(), 5);
        assert_eq!((-3i64).identity(), -3);
        assert_eq!(usize::MAX.identity(), usize::MAX);
    }

    #[test]
    fn test_pointer_wrappers_delegate() {
        let named = Named { id: 42 };
        assert_eq!((&named).identity(), 42);
        assert_eq!(Box::new(Named { id: 1 }).identity(), 1);
        assert_eq!(Rc::new(Named { id: 2 }).identity(), 2);
        assert_eq!(Arc::new(Named { id: 3 }).identity(), 3);
    }
}
