use crate::{Error, TickRate};

/// 2 MHz / 50 Hz, exact.
pub const TICKS_50HZ: Period = Period::new(40_000);
/// 2 MHz / 60 Hz is 33,333.33.., truncated: each period undershoots by a
/// third of a tick.
pub const TICKS_60HZ: Period = Period::new(33_333);

/// Largest value the free-running counter can hold before it wraps.
pub const COUNTER_MAX: u16 = u16::MAX;

/// Checks that a period of `ticks` can be used for `rate`: it needs a low
/// and a high half, and the loop only notices the end of a period once the
/// counter is past it, so the counter must be able to hold `ticks + 1`.
pub(crate) const fn check_ticks(rate: TickRate, ticks: u32) -> Result<(), Error> {
    if ticks < 2 {
        Err(Error::PeriodTooShort { rate, ticks })
    } else if ticks >= COUNTER_MAX as u32 {
        Err(Error::PeriodOverflow { rate, ticks })
    } else {
        Ok(())
    }
}

/// What to do with the fractional tick when the counter rate is not an exact
/// multiple of the tick rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeriodRounding {
    /// Overshoot: the period is up to one tick too long.
    Ceil,
    /// Undershoot: the period is up to one tick too short.
    #[default]
    Truncate,
}

impl PeriodRounding {
    #[must_use]
    #[inline]
    pub const fn divide(self, dividend: u32, divisor: u32) -> u32 {
        match self {
            Self::Ceil => dividend.div_ceil(divisor),
            Self::Truncate => dividend / divisor,
        }
    }
}

/// Length of one tick period, in counter ticks.
///
/// The counter is compared against the period every loop iteration: values
/// up to and including [`Period::midpoint`] drive the output low, values
/// above it drive it high, and values above [`Period::ticks`] end the period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Period(u16);

impl Period {
    #[must_use]
    #[inline]
    pub const fn new(ticks: u16) -> Self {
        Self(ticks)
    }

    #[must_use]
    #[inline]
    pub const fn ticks(self) -> u16 {
        self.0
    }

    /// Floor of half the period. For odd periods the high half is one tick
    /// longer than the low half.
    #[must_use]
    #[inline]
    pub const fn midpoint(self) -> u16 {
        self.0 / 2
    }

    #[must_use]
    #[inline]
    pub const fn is_elapsed(self, count: u16) -> bool {
        count > self.0
    }

    #[must_use]
    #[inline]
    pub const fn is_high(self, count: u16) -> bool {
        count > self.midpoint()
    }

    /// Number of counter values in `1..=ticks` that drive the output high.
    #[must_use]
    #[inline]
    pub const fn high_ticks(self) -> u16 {
        self.0 - self.midpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoints() {
        assert_eq!(TICKS_50HZ.midpoint(), 20_000);
        assert_eq!(TICKS_60HZ.midpoint(), 16_666);
    }

    #[test]
    fn output_is_high_only_above_midpoint() {
        for period in [TICKS_50HZ, TICKS_60HZ] {
            for count in 0..period.ticks() {
                assert_eq!(period.is_high(count), count > period.ticks() / 2);
            }
        }
    }

    #[test]
    fn period_ends_strictly_after_its_length() {
        assert!(!TICKS_50HZ.is_elapsed(40_000));
        assert!(TICKS_50HZ.is_elapsed(40_001));
        assert!(!TICKS_60HZ.is_elapsed(33_333));
        assert!(TICKS_60HZ.is_elapsed(33_334));
        assert!(TICKS_60HZ.is_elapsed(COUNTER_MAX));
    }

    #[test]
    fn high_ticks() {
        assert_eq!(TICKS_50HZ.high_ticks(), 20_000);
        assert_eq!(TICKS_60HZ.high_ticks(), 16_667);
    }

    #[test]
    fn rounding() {
        assert_eq!(PeriodRounding::Truncate.divide(2_000_000, 60), 33_333);
        assert_eq!(PeriodRounding::Ceil.divide(2_000_000, 60), 33_334);
        assert_eq!(PeriodRounding::Truncate.divide(2_000_000, 50), 40_000);
        assert_eq!(PeriodRounding::Ceil.divide(2_000_000, 50), 40_000);
    }
}
