use crate::{
    ClockConfig, Error, Period, PeriodRounding, TickRate,
    period::{TICKS_50HZ, TICKS_60HZ, check_ticks},
};

/// Everything the generator needs to know at startup: the counter clock
/// and one period per supported rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickConfig {
    pub clock: ClockConfig,
    pub period_50hz: Period,
    pub period_60hz: Period,
}

impl TickConfig {
    /// The values flashed into the device: 16 MHz, divide-by-8, 40,000 and
    /// 33,333 ticks.
    pub const DEFAULT: Self = Self {
        clock: ClockConfig::DEFAULT,
        period_50hz: TICKS_50HZ,
        period_60hz: TICKS_60HZ,
    };

    /// Derives both periods from `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if either period cannot be represented by the
    /// counter.
    #[inline]
    pub const fn derive(clock: ClockConfig, rounding: PeriodRounding) -> Result<Self, Error> {
        let period_50hz = match clock.period_for(TickRate::Hz50, rounding) {
            Ok(period) => period,
            Err(err) => return Err(err),
        };

        let period_60hz = match clock.period_for(TickRate::Hz60, rounding) {
            Ok(period) => period,
            Err(err) => return Err(err),
        };

        Ok(Self {
            clock,
            period_50hz,
            period_60hz,
        })
    }

    #[must_use]
    #[inline]
    pub const fn period(&self, rate: TickRate) -> Period {
        match rate {
            TickRate::Hz50 => self.period_50hz,
            TickRate::Hz60 => self.period_60hz,
        }
    }

    /// Checks hand-written periods against the counter limits.
    ///
    /// # Errors
    ///
    /// Returns the first period that cannot be used.
    #[inline]
    pub fn validate(&self) -> Result<(), Error> {
        if self.clock.base_hz == 0 {
            return Err(Error::ZeroBaseClock);
        }

        for rate in TickRate::ALL {
            check_ticks(rate, u32::from(self.period(rate).ticks()))?;
        }

        Ok(())
    }
}

impl Default for TickConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{COUNTER_MAX, Prescaler};

    #[test]
    fn default_matches_derivation() {
        assert_eq!(
            TickConfig::derive(ClockConfig::DEFAULT, PeriodRounding::Truncate),
            Ok(TickConfig::DEFAULT)
        );
        assert_eq!(TickConfig::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn period_lookup() {
        let config = TickConfig::DEFAULT;
        assert_eq!(config.period(TickRate::Hz50).ticks(), 40_000);
        assert_eq!(config.period(TickRate::Hz60).ticks(), 33_333);
    }

    #[test]
    fn derive_rejects_unfit_clock() {
        let clock = ClockConfig::new(8_000_000, Prescaler::from_register(1));
        assert_eq!(
            TickConfig::derive(clock, PeriodRounding::Truncate),
            Err(Error::PeriodOverflow {
                rate: TickRate::Hz50,
                ticks: 80_000
            })
        );
    }

    #[test]
    fn validate_rejects_full_range_period() {
        let config = TickConfig {
            period_60hz: Period::new(COUNTER_MAX),
            ..TickConfig::DEFAULT
        };
        assert_eq!(
            config.validate(),
            Err(Error::PeriodOverflow {
                rate: TickRate::Hz60,
                ticks: 65_535
            })
        );
    }

    #[test]
    fn validate_rejects_degenerate_period() {
        let config = TickConfig {
            period_50hz: Period::new(1),
            ..TickConfig::DEFAULT
        };
        assert_eq!(
            config.validate(),
            Err(Error::PeriodTooShort {
                rate: TickRate::Hz50,
                ticks: 1
            })
        );
    }

    #[test]
    fn validate_agrees_with_derivation_at_counter_limit() {
        // 65,534 ticks at 50 Hz is the longest period the counter can hold
        let longest = ClockConfig::new(3_276_700, Prescaler::from_register(0));
        let longest = TickConfig {
            clock: longest,
            period_50hz: longest
                .period_for(TickRate::Hz50, PeriodRounding::Truncate)
                .unwrap(),
            ..TickConfig::DEFAULT
        };
        assert_eq!(longest.period_50hz.ticks(), COUNTER_MAX - 1);
        assert_eq!(longest.validate(), Ok(()));

        // one tick longer fails both ways
        let clock = ClockConfig::new(3_276_750, Prescaler::from_register(0));
        let overflow = Error::PeriodOverflow {
            rate: TickRate::Hz50,
            ticks: u32::from(COUNTER_MAX),
        };
        assert_eq!(
            clock.period_for(TickRate::Hz50, PeriodRounding::Truncate),
            Err(overflow)
        );
        let config = TickConfig {
            clock,
            period_50hz: Period::new(COUNTER_MAX),
            ..TickConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(overflow));
    }
}
