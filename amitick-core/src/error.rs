use crate::TickRate;
use core::{error, fmt};
use fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    PeriodOverflow { rate: TickRate, ticks: u32 },
    PeriodTooShort { rate: TickRate, ticks: u32 },
    PrescalerTooLarge { divisor: u32 },
    ZeroBaseClock,
    ZeroPrescaler,
}

impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeriodOverflow { rate, ticks } => write!(
                f,
                "{rate} period of {ticks} ticks does not fit the 16-bit counter, increase the prescaler"
            ),
            Self::PeriodTooShort { rate, ticks } => write!(
                f,
                "{rate} period of {ticks} ticks is too short to split into two halves, decrease the prescaler"
            ),
            Self::PrescalerTooLarge { divisor } => {
                write!(f, "prescale divisor {divisor} exceeds the 16-bit register (maximum is 65536)")
            }
            Self::ZeroBaseClock => write!(f, "base clock frequency must be non-zero"),
            Self::ZeroPrescaler => write!(f, "prescale divisor must be at least 1"),
        }
    }
}

impl error::Error for Error {}
