//! When a map gives back the trailing slots left behind by deletions.

use crate::error::SliceMapError;

/// Thresholds for the automatic shrink performed after a removal.
///
/// The store is truncated to the live count when the map holds more than
/// [`min_live`](Self::min_live) elements and the unused trailing slots
/// exceed [`max_free_ratio`](Self::max_free_ratio) of the live count.
/// Small maps and lightly fragmented ones are never reallocated.
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShrinkPolicy {
    min_live: usize,
    max_free_ratio: f32,
}

impl ShrinkPolicy {
    /// Live count at or below which a map is never shrunk automatically.
    pub const DEFAULT_MIN_LIVE: usize = 1024;

    /// Free-to-live ratio above which the store is truncated.
    pub const DEFAULT_MAX_FREE_RATIO: f32 = 0.10;

    /// Creates a policy with custom thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`SliceMapError::InvalidShrinkRatio`] if `max_free_ratio` is
    /// NaN, infinite or negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use slice_map::ShrinkPolicy;
    ///
    /// let policy = ShrinkPolicy::new(64, 0.5).unwrap();
    /// assert_eq!(policy.min_live(), 64);
    /// assert!(ShrinkPolicy::new(64, f32::NAN).is_err());
    /// ```
    pub fn new(min_live: usize, max_free_ratio: f32) -> Result<Self, SliceMapError> {
        if !max_free_ratio.is_finite() || max_free_ratio < 0.0 {
            return Err(SliceMapError::InvalidShrinkRatio {
                ratio: max_free_ratio,
            });
        }
        Ok(Self {
            min_live,
            max_free_ratio,
        })
    }

    /// A policy that never fires. [`SliceMap::shrink`] still works.
    ///
    /// [`SliceMap::shrink`]: crate::SliceMap::shrink
    #[inline]
    pub const fn never() -> Self {
        Self {
            min_live: usize::MAX,
            max_free_ratio: f32::INFINITY,
        }
    }

    /// Returns the live-count threshold.
    #[inline(always)]
    pub const fn min_live(&self) -> usize {
        self.min_live
    }

    /// Returns the free-to-live ratio threshold.
    #[inline(always)]
    pub const fn max_free_ratio(&self) -> f32 {
        self.max_free_ratio
    }

    /// Decides whether a store with `slots` physical slots, of which `live`
    /// are occupied, should be truncated.
    pub fn should_shrink(&self, live: usize, slots: usize) -> bool {
        let free = slots.saturating_sub(live);
        live > self.min_live && free > 0 && (free as f32 / live as f32) > self.max_free_ratio
    }
}

impl Default for ShrinkPolicy {
    #[inline]
    fn default() -> Self {
        Self {
            min_live: Self::DEFAULT_MIN_LIVE,
            max_free_ratio: Self::DEFAULT_MAX_FREE_RATIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let policy = ShrinkPolicy::default();
        assert_eq!(policy.min_live(), 1024);
        assert_eq!(policy.max_free_ratio(), 0.10);
    }

    #[test]
    fn test_small_maps_never_shrink() {
        let policy = ShrinkPolicy::default();
        // 1900 free slots against 100 live is way past the ratio
        assert!(!policy.should_shrink(100, 2000));
        assert!(!policy.should_shrink(1024, 4096));
    }

    #[test]
    fn test_ratio_must_be_exceeded() {
        let policy = ShrinkPolicy::default();
        assert!(policy.should_shrink(1090, 1200));
        assert!(!policy.should_shrink(1091, 1200));
        assert!(!policy.should_shrink(2000, 2000));
    }

    #[test]
    fn test_never_fires() {
        let policy = ShrinkPolicy::never();
        assert!(!policy.should_shrink(usize::MAX - 1, usize::MAX));
        assert!(!policy.should_shrink(5000, 1_000_000));
    }

    #[test]
    fn test_new_rejects_bad_ratios() {
        assert_eq!(
            ShrinkPolicy::new(10, -0.1),
            Err(SliceMapError::InvalidShrinkRatio { ratio: -0.1 })
        );
        assert!(ShrinkPolicy::new(10, f32::INFINITY).is_err());
        assert!(ShrinkPolicy::new(10, f32::NAN).is_err());
        assert!(ShrinkPolicy::new(10, 0.0).is_ok());
    }

    #[test]
    fn test_zero_ratio_shrinks_on_any_slack() {
        let policy = ShrinkPolicy::new(0, 0.0).unwrap();
        assert!(policy.should_shrink(1, 2));
        assert!(!policy.should_shrink(1, 1));
        assert!(!policy.should_shrink(0, 10));
    }
}
