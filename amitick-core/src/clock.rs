use crate::{
    Error, Period, PeriodRounding, TickRate,
    period::{COUNTER_MAX, check_ticks},
};

/// Internal high-speed oscillator of the STM8S105, undivided.
pub const BASE_CLOCK_HZ: u32 = 16_000_000;
/// 16 MHz / 8 = 2 MHz counter rate.
pub const PRESCALER: Prescaler = Prescaler::from_register(8 - 1);

/// Counter prescaler, stored as the value written to the prescaler
/// register. The hardware divides by `register + 1`, so 0 means divide-by-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prescaler(u16);

impl Prescaler {
    /// # Errors
    ///
    /// Returns an error if `divisor` is zero or larger than the register can
    /// encode.
    #[inline]
    pub const fn from_divisor(divisor: u32) -> Result<Self, Error> {
        if divisor == 0 {
            return Err(Error::ZeroPrescaler);
        }

        if divisor > COUNTER_MAX as u32 + 1 {
            return Err(Error::PrescalerTooLarge { divisor });
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "divisor - 1 was checked to fit 16 bits"
        )]
        let register = (divisor - 1) as u16;

        Ok(Self(register))
    }

    #[must_use]
    #[inline]
    pub const fn from_register(register: u16) -> Self {
        Self(register)
    }

    #[must_use]
    #[inline]
    pub const fn register(self) -> u16 {
        self.0
    }

    #[must_use]
    #[inline]
    pub const fn divisor(self) -> u32 {
        self.0 as u32 + 1
    }
}

/// Base clock feeding the free-running counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockConfig {
    pub base_hz: u32,
    pub prescaler: Prescaler,
}

impl ClockConfig {
    pub const DEFAULT: Self = Self {
        base_hz: BASE_CLOCK_HZ,
        prescaler: PRESCALER,
    };

    #[must_use]
    #[inline]
    pub const fn new(base_hz: u32, prescaler: Prescaler) -> Self {
        Self { base_hz, prescaler }
    }

    /// Counter increments per second.
    #[must_use]
    #[inline]
    pub const fn counter_hz(&self) -> u32 {
        self.base_hz / self.prescaler.divisor()
    }

    /// Derives the period of `rate` in counter ticks.
    ///
    /// # Errors
    ///
    /// Returns an error if the base clock is zero, if the period is too
    /// short to have a low and a high half, or if the counter would wrap on
    /// its own before the period ends.
    #[inline]
    pub const fn period_for(
        &self,
        rate: TickRate,
        rounding: PeriodRounding,
    ) -> Result<Period, Error> {
        if self.base_hz == 0 {
            return Err(Error::ZeroBaseClock);
        }

        let ticks = rounding.divide(self.counter_hz(), rate.hz());

        if let Err(err) = check_ticks(rate, ticks) {
            return Err(err);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "ticks was checked to be below COUNTER_MAX"
        )]
        let ticks = ticks as u16;

        Ok(Period::new(ticks))
    }
}

impl Default for ClockConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
