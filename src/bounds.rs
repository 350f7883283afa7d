//! Word-count bounds for chunking.
//!
//! ## The Problem
//!
//! A fixed word count per chunk forces awkward splits: a 104-word paragraph
//! with a target of 100 would lose its last sentence to the next chunk.
//!
//! ## The Solution: Target with Flexibility
//!
//! `WordBounds` turns a target and a fractional tolerance into a window:
//!
//! ```text
//! target = 100, flexibility = 0.25
//!
//!   min = floor(100 * 0.75) = 75    chunk may be finalized
//!   max = floor(100 * 1.25) = 125   soft ceiling when appending
//! ```
//!
//! The segmenter keeps appending paragraphs or sentences until the running
//! count reaches `min`, and refuses to append a piece that would cross
//! `max`. A single sentence longer than `max` is still emitted whole, so the
//! ceiling is soft.

use std::cmp::Ordering;

use crate::{Error, Result};

/// Default target words per chunk.
pub const DEFAULT_TARGET_WORDS: usize = 100;

/// Default fractional tolerance around the target.
pub const DEFAULT_FLEXIBILITY: f64 = 0.25;

/// Minimum and maximum words per chunk.
///
/// # Examples
///
/// ```rust
/// use precis::WordBounds;
///
/// let bounds = WordBounds::from_target(100, 0.25).unwrap();
/// assert_eq!(bounds.min(), 75);
/// assert_eq!(bounds.max(), 125);
///
/// // Explicit window
/// let bounds = WordBounds::from(40..=60);
/// assert_eq!(bounds.min(), 40);
/// assert_eq!(bounds.max(), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBounds {
    min: usize,
    max: usize,
}

impl WordBounds {
    /// Derive bounds from a target word count and a flexibility in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `flexibility` is outside `[0, 1)` or not
    /// finite, or if `target_words == 0`.
    pub fn from_target(target_words: usize, flexibility: f64) -> Result<Self> {
        if target_words == 0 {
            return Err(Error::Config("target_words must be > 0".into()));
        }
        if !flexibility.is_finite() || !(0.0..1.0).contains(&flexibility) {
            return Err(Error::Config(format!(
                "chunk flexibility {flexibility} must be in [0, 1)"
            )));
        }
        let target = target_words as f64;
        Ok(Self {
            min: (target * (1.0 - flexibility)).floor() as usize,
            max: (target * (1.0 + flexibility)).floor() as usize,
        })
    }

    /// Words a chunk needs before it may be finalized.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Soft ceiling on words per chunk.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Where a word count falls relative to the window.
    ///
    /// - `Ordering::Less`: below `min`, keep accumulating
    /// - `Ordering::Equal`: within `min..=max`
    /// - `Ordering::Greater`: above `max`
    #[must_use]
    pub fn fits(&self, words: usize) -> Ordering {
        if words < self.min {
            Ordering::Less
        } else if words > self.max {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Whether the running count has reached `min`.
    #[must_use]
    pub fn is_satisfied(&self, words: usize) -> bool {
        words >= self.min
    }

    /// Whether adding `additional` words to `current` would cross `max`.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.max
    }
}

impl Default for WordBounds {
    fn default() -> Self {
        // 100 words, 25% either way
        Self { min: 75, max: 125 }
    }
}

impl From<std::ops::RangeInclusive<usize>> for WordBounds {
    fn from(range: std::ops::RangeInclusive<usize>) -> Self {
        Self {
            min: *range.start(),
            max: (*range.end()).max(*range.start()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_default_target() {
        let derived = WordBounds::from_target(DEFAULT_TARGET_WORDS, DEFAULT_FLEXIBILITY).unwrap();
        assert_eq!(derived, WordBounds::default());
    }

    #[test]
    fn test_floor_rounding() {
        let bounds = WordBounds::from_target(10, 0.33).unwrap();
        assert_eq!(bounds.min(), 6); // 6.7
        assert_eq!(bounds.max(), 13); // 13.3
    }

    #[test]
    fn test_zero_flexibility() {
        let bounds = WordBounds::from_target(50, 0.0).unwrap();
        assert_eq!(bounds.min(), 50);
        assert_eq!(bounds.max(), 50);
    }

    #[test]
    fn test_fits() {
        let bounds = WordBounds::default();
        assert_eq!(bounds.fits(74), Ordering::Less);
        assert_eq!(bounds.fits(75), Ordering::Equal);
        assert_eq!(bounds.fits(125), Ordering::Equal);
        assert_eq!(bounds.fits(126), Ordering::Greater);
    }

    #[test]
    fn test_would_overflow() {
        let bounds = WordBounds::default();
        assert!(!bounds.would_overflow(100, 25));
        assert!(bounds.would_overflow(100, 26));
        assert!(bounds.would_overflow(usize::MAX, 1));
    }

    #[test]
    fn test_invalid_flexibility() {
        assert!(WordBounds::from_target(100, 1.0).is_err());
        assert!(WordBounds::from_target(100, -0.1).is_err());
        assert!(WordBounds::from_target(100, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_target() {
        assert!(matches!(
            WordBounds::from_target(0, 0.25),
            Err(Error::Config(_))
        ));
    }
}
