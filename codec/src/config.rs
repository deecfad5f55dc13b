//! Types for use as [crate::Read::Cfg].

use crate::Error;
use core::ops::{Bound, RangeBounds};

/// Configuration bounding a length or count read from an untrusted peer.
///
/// Counts and lengths decoded from the wire are checked against a `RangeCfg` before anything
/// is allocated for them.
///
/// # Examples
///
/// ```
/// use smbwire_codec::RangeCfg;
///
/// let cfg = RangeCfg::from(..=64);
/// assert!(cfg.contains(64));
/// assert!(!cfg.contains(65));
///
/// let exact = RangeCfg::exact(3);
/// assert!(exact.check(3).is_ok());
/// assert!(exact.check(4).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    start: Bound<usize>,
    end: Bound<usize>,
}

impl RangeCfg {
    /// Creates a new `RangeCfg` from any type implementing `RangeBounds<usize>`.
    pub fn new(r: impl RangeBounds<usize>) -> Self {
        RangeCfg {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Creates a `RangeCfg` that only accepts exactly `value`.
    pub fn exact(value: usize) -> Self {
        Self {
            start: Bound::Included(value),
            end: Bound::Included(value),
        }
    }

    /// Returns true if the value is within this range.
    pub fn contains(&self, value: usize) -> bool {
        let above_start = match self.start {
            Bound::Included(s) => value >= s,
            Bound::Excluded(s) => value > s,
            Bound::Unbounded => true,
        };
        let below_end = match self.end {
            Bound::Included(e) => value <= e,
            Bound::Excluded(e) => value < e,
            Bound::Unbounded => true,
        };
        above_start && below_end
    }

    /// Returns true if the value is past the upper bound, so no larger value can be in range.
    ///
    /// Lets a decoder that counts entries as it reads them stop at the first one too many.
    pub fn exceeds(&self, value: usize) -> bool {
        match self.end {
            Bound::Included(e) => value > e,
            Bound::Excluded(e) => value >= e,
            Bound::Unbounded => false,
        }
    }

    /// Returns [`Error::InvalidLength`] if the value is outside of this range.
    pub fn check(&self, value: usize) -> Result<(), Error> {
        if !self.contains(value) {
            return Err(Error::InvalidLength(value));
        }
        Ok(())
    }
}

impl Default for RangeCfg {
    fn default() -> Self {
        Self::new(..)
    }
}

impl RangeBounds<usize> for RangeCfg {
    fn start_bound(&self) -> Bound<&usize> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&usize> {
        self.end.as_ref()
    }
}

macro_rules! impl_from_range {
    ($($range:ty),* $(,)?) => {
        $(
            impl From<$range> for RangeCfg {
                fn from(r: $range) -> Self {
                    Self::new(r)
                }
            }
        )*
    };
}

impl_from_range!(
    core::ops::Range<usize>,
    core::ops::RangeInclusive<usize>,
    core::ops::RangeFrom<usize>,
    core::ops::RangeTo<usize>,
    core::ops::RangeToInclusive<usize>,
    core::ops::RangeFull,
);
