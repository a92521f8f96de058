use crate::{Error, WaveformReport};
use amitick_core::{
    Step, TickConfig, TickGenerator, TickRate,
    sim::{Edge, Stm8Peripherals},
    stm8::{SELECT_PIN, Stm8Hal},
};

/// Oscillator cycles one pass of the control loop takes unless told
/// otherwise: four counter ticks at the flashed configuration.
pub const LOOP_CYCLES: u32 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationOptions {
    pub config: TickConfig,
    /// Oscillator cycles between two reads of the counter.
    pub loop_cycles: u32,
    /// Level of the select pin at power-on.
    pub rate: TickRate,
}

impl SimulationOptions {
    pub const DEFAULT: Self = Self {
        config: TickConfig::DEFAULT,
        loop_cycles: LOOP_CYCLES,
        rate: TickRate::Hz50,
    };
}

impl Default for SimulationOptions {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The control loop running against an emulated STM8S.
///
/// Every [`Simulation::step`] runs one loop iteration on the emulated
/// registers, records a change of the tick pin, then lets the peripherals
/// run for the length of the iteration. The oscillator of the emulated chip
/// runs at the base clock of the configuration.
pub struct Simulation {
    edges: Vec<Edge>,
    loop_cycles: u32,
    rate: TickRate,
    ticker: TickGenerator<Stm8Hal<Stm8Peripherals>>,
}

impl Simulation {
    /// Powers on the emulated chip and runs the startup sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration doesn't validate.
    pub fn new(options: SimulationOptions) -> Result<Self, Error> {
        options.config.validate()?;

        let mut peripherals = Stm8Peripherals::with_oscillator(options.config.clock.base_hz);
        peripherals.set_input(SELECT_PIN, options.rate.select_level());

        Ok(Self {
            edges: Vec::new(),
            loop_cycles: options.loop_cycles.max(1),
            rate: options.rate,
            ticker: TickGenerator::new(Stm8Hal::new(peripherals), options.config),
        })
    }

    /// Every change of the tick pin so far, in oscillator cycles since
    /// power-on.
    #[must_use]
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    #[inline]
    pub const fn elapsed(&self) -> u64 {
        self.peripherals().elapsed()
    }

    #[must_use]
    #[inline]
    pub const fn peripherals(&self) -> &Stm8Peripherals {
        self.ticker.hal().bus()
    }

    /// Level currently applied to the select pin.
    #[must_use]
    #[inline]
    pub const fn rate(&self) -> TickRate {
        self.rate
    }

    /// Drives the select pin. The loop picks it up on its next iteration.
    #[inline]
    pub fn set_select(&mut self, rate: TickRate) {
        self.rate = rate;
        self.ticker
            .hal_mut()
            .bus_mut()
            .set_input(SELECT_PIN, rate.select_level());
    }

    /// One iteration of the control loop.
    #[inline]
    pub fn step(&mut self) -> Step {
        let step = self.ticker.step();
        let level = self.peripherals().tick_level();

        if self.edges.last().is_some_and(|edge| edge.level) != level {
            let at = self.elapsed();
            self.edges.push(Edge { at, level });
        }

        let loop_cycles = self.loop_cycles;
        self.ticker.hal_mut().bus_mut().advance(loop_cycles);

        step
    }

    /// Runs for at least `cycles` oscillator cycles.
    pub fn run_cycles(&mut self, cycles: u64) {
        let end = self.elapsed() + cycles;

        while self.elapsed() < end {
            self.step();
        }
    }

    /// Runs until `periods` full periods were seen at the current select
    /// level and measures them. The measurement only covers this call, so
    /// a run after [`Simulation::set_select`] isn't mixed with the previous
    /// rate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEdges`] if the output didn't toggle, which happens
    /// for `periods == 0` or a loop too slow to ever see the midpoint.
    pub fn run_periods(&mut self, periods: u32) -> Result<WaveformReport, Error> {
        let start = self.edges.len();
        let config = *self.ticker.config();
        let period = config.period(self.rate);

        // give up after twice the time the periods should take
        let period_cycles = (u64::from(period.ticks()) + 2)
            * u64::from(config.clock.prescaler.divisor())
            + u64::from(self.loop_cycles);
        let deadline = self.elapsed() + (u64::from(periods) + 2) * 2 * period_cycles;
        let mut rising = 0;

        while rising <= periods && self.elapsed() < deadline {
            let edges = self.edges.len();
            self.step();

            if self.edges.len() > edges && self.ticker.level() {
                rising += 1;
            }
        }

        let peripherals = self.peripherals();
        let report = WaveformReport::measure(
            &self.edges[start..],
            peripherals.oscillator_hz(),
            self.rate,
            period,
            peripherals.counter_hz(),
        )?;

        tracing::debug!(
            rate = %self.rate,
            periods = report.periods(),
            frequency_hz = report.frequency_hz,
            elapsed = self.elapsed(),
            "simulation run finished"
        );

        Ok(report)
    }
}
