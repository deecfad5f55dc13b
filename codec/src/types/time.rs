//! Codec implementation for FILETIME timestamps.

use crate::{Error, FixedSize, Read, ReadExt, Write};
use bytes::{Buf, BufMut};
use chrono::{DateTime, TimeZone, Utc};

/// Seconds between 1601-01-01 (the FILETIME epoch) and 1970-01-01.
const EPOCH_DIFFERENCE_SECS: i64 = 11_644_473_600;

/// FILETIME ticks (100 ns) per second.
const TICKS_PER_SEC: i64 = 10_000_000;

/// A timestamp in 100 ns ticks since 1601-01-01 UTC.
///
/// The raw tick count is kept so decoding and re-encoding is lossless even for values that do
/// not map to a [`DateTime`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTime(pub u64);

impl FileTime {
    /// Returns the current time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Converts a UTC timestamp, saturating to zero for instants before 1601 and to
    /// `u64::MAX` for instants past the last representable tick.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp() + EPOCH_DIFFERENCE_SECS;
        if secs < 0 {
            return Self(0);
        }
        let Some(whole) = (secs as u64).checked_mul(TICKS_PER_SEC as u64) else {
            return Self(u64::MAX);
        };
        Self(whole.saturating_add(u64::from(dt.timestamp_subsec_nanos()) / 100))
    }

    /// Converts to a UTC timestamp, or `None` if the tick count is out of range for [`DateTime`].
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let ticks = i64::try_from(self.0).ok()?;
        let secs = ticks / TICKS_PER_SEC - EPOCH_DIFFERENCE_SECS;
        let nanos = (ticks % TICKS_PER_SEC) as u32 * 100;
        Utc.timestamp_opt(secs, nanos).single()
    }
}

impl From<DateTime<Utc>> for FileTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Write for FileTime {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        self.0.write(buf);
    }
}

impl Read for FileTime {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        Ok(Self(u64::read(buf)?))
    }
}

impl FixedSize for FileTime {
    const SIZE: usize = u64::SIZE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodeExt, Encode};

    #[test]
    fn test_unix_epoch() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let ft = FileTime::from_datetime(epoch);
        assert_eq!(ft.0, 116_444_736_000_000_000);
        assert_eq!(ft.to_datetime(), Some(epoch));
    }

    #[test]
    fn test_sub_second_precision() {
        let dt = Utc.timestamp_opt(1_500_000_000, 123_456_700).unwrap();
        let ft = FileTime::from(dt);
        assert_eq!(ft.to_datetime(), Some(dt));
    }

    #[test]
    fn test_before_1601_saturates() {
        let dt = Utc.with_ymd_and_hms(1500, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(FileTime::from_datetime(dt), FileTime(0));
    }

    #[test]
    fn test_far_future_saturates() {
        assert_eq!(FileTime::from_datetime(DateTime::<Utc>::MAX_UTC), FileTime(u64::MAX));
        let late = Utc.with_ymd_and_hms(30_000, 1, 1, 0, 0, 0).unwrap();
        assert!(FileTime::from_datetime(late) < FileTime(u64::MAX));
    }

    #[test]
    fn test_out_of_range_is_lossless() {
        let ft = FileTime(u64::MAX);
        assert_eq!(ft.to_datetime(), None);
        let decoded = FileTime::decode(ft.encode()).unwrap();
        assert_eq!(decoded, ft);
    }
}
