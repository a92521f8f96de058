use crate::{Period, TickConfig, TickHal, TickRate, trace};

/// What one loop iteration saw and did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Counter value after the boundary check, zero if the period ended.
    pub count: u16,
    pub level: bool,
    pub period: Period,
    pub rate: TickRate,
    /// Counter value as read from the hardware.
    pub raw_count: u16,
    pub wrapped: bool,
}

/// Polling square-wave generator.
///
/// Every iteration samples the select input, reads the counter, resets the
/// counter once it is past the selected period and drives the output high
/// for the second half of the period.
pub struct TickGenerator<H: TickHal> {
    config: TickConfig,
    hal: H,
    level: bool,
    rate: Option<TickRate>,
}

impl<H: TickHal> TickGenerator<H> {
    /// Runs the startup sequence: clock, counter, pins, then the output is
    /// forced low.
    #[inline]
    pub fn new(mut hal: H, config: TickConfig) -> Self {
        hal.start_counter(&config.clock);
        hal.configure_pins();
        hal.set_output(false);

        trace::startup(&config);

        Self {
            config,
            hal,
            level: false,
            rate: None,
        }
    }

    #[must_use]
    #[inline]
    pub const fn config(&self) -> &TickConfig {
        &self.config
    }

    #[must_use]
    #[inline]
    pub const fn hal(&self) -> &H {
        &self.hal
    }

    #[inline]
    pub const fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    #[must_use]
    #[inline]
    pub fn into_hal(self) -> H {
        self.hal
    }

    /// Level written to the output by the last iteration.
    #[must_use]
    #[inline]
    pub const fn level(&self) -> bool {
        self.level
    }

    /// Rate used by the last iteration, `None` before the first one.
    #[must_use]
    #[inline]
    pub const fn rate(&self) -> Option<TickRate> {
        self.rate
    }

    /// Loops forever. This is the whole firmware after startup.
    #[inline]
    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// One iteration of the control loop.
    #[inline]
    pub fn step(&mut self) -> Step {
        let rate = TickRate::from_select(self.hal.read_select_input());
        let period = self.config.period(rate);

        if self.rate != Some(rate) {
            trace::rate_selected(rate, period);
            self.rate = Some(rate);
        }

        let raw_count = self.hal.read_counter();
        let count = self.sync_period(raw_count, period);
        let level = period.is_high(count);

        self.hal.set_output(level);
        self.level = level;

        Step {
            count,
            level,
            period,
            rate,
            raw_count,
            wrapped: period.is_elapsed(raw_count),
        }
    }

    /// Period-boundary check on its own: past the period the counter is
    /// reset and the iteration continues as if it read zero, otherwise
    /// nothing happens.
    #[inline]
    pub fn sync_period(&mut self, count: u16, period: Period) -> u16 {
        if !period.is_elapsed(count) {
            return count;
        }

        self.hal.reset_counter();
        trace::period_boundary(period, count);

        0
    }
}
