//! Errors reported by the fallible parts of the API.
//!
//! The core map operations never fail; only configuration and explicit
//! reservation can.

use thiserror::Error;

/// Errors that can occur while configuring or pre-sizing a [`SliceMap`].
///
/// [`SliceMap`]: crate::SliceMap
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SliceMapError {
    /// The free-slot ratio of a [`ShrinkPolicy`] was NaN, infinite or negative.
    ///
    /// [`ShrinkPolicy`]: crate::ShrinkPolicy
    #[error("invalid shrink ratio {ratio}: must be finite and non-negative")]
    InvalidShrinkRatio {
        /// The rejected ratio.
        ratio: f32,
    },

    /// The store or the index map could not grow by the requested amount.
    #[error("cannot reserve room for {additional} more elements")]
    CapacityOverflow {
        /// Number of additional elements requested.
        additional: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_values() {
        let err = SliceMapError::InvalidShrinkRatio { ratio: -1.5 };
        assert_eq!(
            err.to_string(),
            "invalid shrink ratio -1.5: must be finite and non-negative"
        );

        let err = SliceMapError::CapacityOverflow { additional: 12 };
        assert!(err.to_string().contains("12"));
    }
}
