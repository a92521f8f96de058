use crate::Error;
use amitick_core::{Period, TickRate, sim::Edge};
use serde::Serialize;
use std::fmt;

/// What the output looked like over a simulated run.
///
/// Times are in oscillator cycles of the emulated microcontroller. The
/// measurement spans from the first to the last rising edge, so a run that
/// saw `rising_edges` rising edges covers `rising_edges - 1` periods.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaveformReport {
    pub rate: TickRate,
    pub period_ticks: u16,
    pub midpoint: u16,
    pub counter_hz: u32,
    /// Rate the board expects, 50 or 60.
    pub expected_hz: u32,
    pub rising_edges: usize,
    pub mean_period_cycles: f64,
    pub frequency_hz: f64,
    /// Fraction of the measured span the output was high.
    pub duty_cycle: f64,
    /// Deviation of the measured frequency from [`Self::expected_hz`].
    pub error_ppm: f64,
}

impl WaveformReport {
    /// Measures `edges`, timestamped in cycles of a `clock_hz` clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEdges`] if there are fewer than two rising edges.
    #[expect(
        clippy::cast_precision_loss,
        reason = "cycle counts stay far below 2^52 in any run"
    )]
    pub fn measure(
        edges: &[Edge],
        clock_hz: u32,
        rate: TickRate,
        period: Period,
        counter_hz: u32,
    ) -> Result<Self, Error> {
        let mut rising = edges.iter().filter(|edge| edge.level).map(|edge| edge.at);
        let first = rising.next().ok_or(Error::NoEdges)?;
        let (last, cycles) = rising.fold((first, 0), |(_, cycles), at| (at, cycles + 1_usize));

        if cycles == 0 {
            return Err(Error::NoEdges);
        }

        let span = last - first;
        let high: u64 = edges
            .windows(2)
            .filter(|pair| pair[0].level && !pair[1].level)
            .filter(|pair| pair[0].at >= first && pair[1].at <= last)
            .map(|pair| pair[1].at - pair[0].at)
            .sum();

        let mean_period_cycles = span as f64 / cycles as f64;
        let frequency_hz = f64::from(clock_hz) / mean_period_cycles;
        let expected_hz = rate.hz();

        Ok(Self {
            rate,
            period_ticks: period.ticks(),
            midpoint: period.midpoint(),
            counter_hz,
            expected_hz,
            rising_edges: cycles + 1,
            mean_period_cycles,
            frequency_hz,
            duty_cycle: high as f64 / span as f64,
            error_ppm: (frequency_hz / f64::from(expected_hz) - 1.0) * 1e6,
        })
    }

    /// Periods between the first and the last rising edge.
    #[must_use]
    #[inline]
    pub const fn periods(&self) -> usize {
        self.rising_edges - 1
    }
}

impl fmt::Display for WaveformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rate:      {}", self.rate)?;
        writeln!(
            f,
            "period:    {} ticks at {} Hz, high past {}",
            self.period_ticks, self.counter_hz, self.midpoint
        )?;
        writeln!(
            f,
            "measured:  {:.4} Hz over {} periods ({:+.1} ppm)",
            self.frequency_hz,
            self.periods(),
            self.error_ppm
        )?;
        write!(f, "duty:      {:.4} %", self.duty_cycle * 100.0)
    }
}

/// Pretty-printed JSON of `report`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(report: &WaveformReport) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amitick_core::{TICKS_50HZ, TICKS_60HZ};

    fn square(period: u64, high: u64, count: u64) -> Vec<Edge> {
        (0..count)
            .flat_map(|n| {
                let start = n * period;
                [
                    Edge {
                        at: start + period - high,
                        level: true,
                    },
                    Edge {
                        at: start + period,
                        level: false,
                    },
                ]
            })
            .collect()
    }

    #[test]
    fn ideal_square_wave() {
        // 16 MHz oscillator, 320_000 cycles is exactly 50 Hz
        let edges = square(320_000, 160_000, 11);
        let report =
            WaveformReport::measure(&edges, 16_000_000, TickRate::Hz50, TICKS_50HZ, 2_000_000)
                .unwrap();

        assert_eq!(report.rising_edges, 11);
        assert_eq!(report.periods(), 10);
        assert!((report.mean_period_cycles - 320_000.0).abs() < 1e-9);
        assert!((report.frequency_hz - 50.0).abs() < 1e-9);
        assert!((report.duty_cycle - 0.5).abs() < 1e-9);
        assert!(report.error_ppm.abs() < 1e-3);
        assert_eq!(report.period_ticks, 40_000);
        assert_eq!(report.midpoint, 20_000);
    }

    #[test]
    fn slow_wave_has_negative_error() {
        let edges = square(320_032, 160_000, 3);
        let report =
            WaveformReport::measure(&edges, 16_000_000, TickRate::Hz50, TICKS_50HZ, 2_000_000)
                .unwrap();

        assert!((report.error_ppm + 99.99).abs() < 0.01);
        assert!(report.duty_cycle < 0.5);
    }

    #[test]
    fn needs_two_rising_edges() {
        let one = square(320_000, 160_000, 1);
        for edges in [&[][..], &one[..]] {
            assert!(matches!(
                WaveformReport::measure(edges, 16_000_000, TickRate::Hz50, TICKS_50HZ, 2_000_000),
                Err(Error::NoEdges)
            ));
        }
    }

    #[test]
    fn json_fields() {
        let edges = square(320_000, 160_000, 2);
        let report =
            WaveformReport::measure(&edges, 16_000_000, TickRate::Hz50, TICKS_50HZ, 2_000_000)
                .unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

        assert_eq!(json["rate"], "50");
        assert_eq!(json["period_ticks"], 40_000);
        assert_eq!(json["expected_hz"], 50);
        assert_eq!(json["rising_edges"], 2);

        let report = WaveformReport::measure(
            &square(266_664, 133_332, 2),
            16_000_000,
            TickRate::Hz60,
            TICKS_60HZ,
            2_000_000,
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

        assert_eq!(json["rate"], "60");
        assert_eq!(json["expected_hz"], 60);
    }
}
