use core::fmt;

/// Tick frequency selected by the frequency-select pin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickRate {
    /// Selected by holding the select pin low.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "50"))]
    Hz50,
    /// Selected by holding the select pin high.
    #[cfg_attr(feature = "serde", serde(rename = "60"))]
    Hz60,
}

impl TickRate {
    pub const ALL: [Self; 2] = [Self::Hz50, Self::Hz60];

    /// Maps the sampled level of the select pin to a rate. No latching, the
    /// level is taken as-is every time it is sampled.
    #[must_use]
    #[inline]
    pub const fn from_select(high: bool) -> Self {
        if high { Self::Hz60 } else { Self::Hz50 }
    }

    #[must_use]
    #[inline]
    pub const fn hz(self) -> u32 {
        match self {
            Self::Hz50 => 50,
            Self::Hz60 => 60,
        }
    }

    /// Level the select pin must be held at to pick this rate.
    #[must_use]
    #[inline]
    pub const fn select_level(self) -> bool {
        matches!(self, Self::Hz60)
    }
}

impl fmt::Display for TickRate {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_low_is_50hz() {
        assert_eq!(TickRate::from_select(false), TickRate::Hz50);
        assert_eq!(TickRate::from_select(true), TickRate::Hz60);
    }

    #[test]
    fn select_level_round_trips() {
        for rate in TickRate::ALL {
            assert_eq!(TickRate::from_select(rate.select_level()), rate);
        }
    }

    #[test]
    fn display() {
        assert_eq!(TickRate::Hz50.to_string(), "50 Hz");
        assert_eq!(TickRate::Hz60.to_string(), "60 Hz");
    }
}
