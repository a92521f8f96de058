use crate::{Error, LOOP_CYCLES, SimulationOptions};
use amitick_core::{
    BASE_CLOCK_HZ, ClockConfig, PRESCALER, PeriodRounding, Prescaler, TickConfig, TickRate,
};
pub use clap;

pub const AMITICK_BIN: &str = "amitick";
const ABOUT: &str = "Runs the Amiga 50/60 Hz tick firmware on an emulated STM8S and measures \
                     the output.";
const AFTER_HELP: &str = "Select pin:

    | Level | Rate  | Period at 2 MHz |
    | ----- | ----- | --------------- |
    | low   | 50 Hz | 40000 ticks     |
    | high  | 60 Hz | 33333 ticks     |
";

#[derive(Default, Clone, Copy, clap::ValueEnum)]
enum Rate {
    #[default]
    #[value(name = "50")]
    Hz50,
    #[value(name = "60")]
    Hz60,
}

impl Rate {
    const fn str(self) -> &'static str {
        match self {
            Self::Hz50 => "50",
            Self::Hz60 => "60",
        }
    }
}

impl From<Rate> for TickRate {
    #[inline]
    fn from(rate: Rate) -> Self {
        match rate {
            Rate::Hz50 => Self::Hz50,
            Rate::Hz60 => Self::Hz60,
        }
    }
}

#[derive(Default, Clone, Copy, clap::ValueEnum)]
enum Rounding {
    #[default]
    Truncate,
    Ceil,
}

impl Rounding {
    const fn str(self) -> &'static str {
        match self {
            Self::Truncate => "truncate",
            Self::Ceil => "ceil",
        }
    }
}

impl From<Rounding> for PeriodRounding {
    #[inline]
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Truncate => Self::Truncate,
            Rounding::Ceil => Self::Ceil,
        }
    }
}

#[derive(clap::Parser)]
#[command(name = AMITICK_BIN, about = ABOUT, after_help = AFTER_HELP)]
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Level of the select pin, as the rate it selects",
        default_value = Rate::default().str(),
        value_enum
    )]
    rate: Rate,
    #[arg(
        short,
        long,
        help = "Number of periods to measure",
        default_value_t = 10
    )]
    periods: u32,
    #[arg(
        long,
        help = "Oscillator cycles per pass of the control loop",
        default_value_t = LOOP_CYCLES
    )]
    loop_cycles: u32,
    #[arg(
        long,
        help = "Oscillator frequency in Hz",
        default_value_t = BASE_CLOCK_HZ
    )]
    base_hz: u32,
    #[arg(
        long,
        help = "Counter prescale divisor",
        long_help = "Counter prescale divisor. The periods are derived from the base clock and \
           this divisor, and must fit the 16-bit counter.",
        default_value_t = PRESCALER.divisor()
    )]
    prescaler: u32,
    #[arg(
        long,
        help = "How a period that isn't a whole number of ticks is rounded",
        default_value = Rounding::default().str(),
        value_enum
    )]
    rounding: Rounding,
    #[arg(long, help = "Print the report as JSON")]
    json: bool,
    #[arg(
        long,
        help = "Log filter, e.g. amitick_core=trace. Defaults to RUST_LOG, then warn"
    )]
    log: Option<String>,
}

impl Cli {
    /// Counter clock from `--base-hz` and `--prescaler`.
    ///
    /// # Errors
    ///
    /// Returns an error if the divisor isn't a valid prescaler.
    #[inline]
    pub const fn clock(&self) -> Result<ClockConfig, amitick_core::Error> {
        match Prescaler::from_divisor(self.prescaler) {
            Ok(prescaler) => Ok(ClockConfig::new(self.base_hz, prescaler)),
            Err(err) => Err(err),
        }
    }

    /// Periods derived from the clock options.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock is invalid or a period doesn't fit the
    /// counter.
    #[inline]
    pub fn config(&self) -> Result<TickConfig, Error> {
        Ok(TickConfig::derive(self.clock()?, self.rounding())?)
    }

    #[must_use]
    #[inline]
    pub const fn json(&self) -> bool {
        self.json
    }

    #[must_use]
    #[inline]
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    #[must_use]
    #[inline]
    pub const fn loop_cycles(&self) -> u32 {
        self.loop_cycles
    }

    /// Everything needed to start a [`crate::Simulation`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration can't be derived.
    #[inline]
    pub fn options(&self) -> Result<SimulationOptions, Error> {
        Ok(SimulationOptions {
            config: self.config()?,
            loop_cycles: self.loop_cycles,
            rate: self.rate(),
        })
    }

    #[must_use]
    #[inline]
    pub const fn periods(&self) -> u32 {
        self.periods
    }

    #[must_use]
    #[inline]
    pub fn rate(&self) -> TickRate {
        self.rate.into()
    }

    #[must_use]
    #[inline]
    pub fn rounding(&self) -> PeriodRounding {
        self.rounding.into()
    }
}
