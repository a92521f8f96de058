//! Structured events emitted by the tick generator.
//!
//! Events go through the `tracing` crate, which compiles in `no_std`. On
//! the device nothing subscribes and each callsite costs one relaxed load;
//! on the host a subscriber can be installed to follow the loop:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, EnvFilter};
//!
//! tracing::subscriber::with_default(
//!     fmt::Subscriber::builder()
//!         .with_env_filter(EnvFilter::new("amitick_core=trace"))
//!         .finish(),
//!     || {
//!         // build and step a TickGenerator here
//!     },
//! );
//! ```
//!
//! Levels: `info` once at startup, `debug` when the select input changes,
//! `trace` on every period boundary.

use crate::{Period, TickConfig, TickRate};

#[inline]
pub fn startup(config: &TickConfig) {
    tracing::info!(
        base_hz = config.clock.base_hz,
        prescaler = config.clock.prescaler.divisor(),
        counter_hz = config.clock.counter_hz(),
        period_50hz = config.period_50hz.ticks(),
        period_60hz = config.period_60hz.ticks(),
        "tick generator started"
    );
}

#[inline]
pub fn rate_selected(rate: TickRate, period: Period) {
    tracing::debug!(
        rate = rate.hz(),
        period = period.ticks(),
        midpoint = period.midpoint(),
        "tick rate selected"
    );
}

/// `overshoot` is how far past the period the counter was when the loop
/// noticed the boundary.
#[inline]
pub fn period_boundary(period: Period, raw_count: u16) {
    tracing::trace!(
        period = period.ticks(),
        raw_count,
        overshoot = raw_count.saturating_sub(period.ticks()),
        "period boundary"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn startup_logs_configuration() {
        startup(&TickConfig::DEFAULT);
        assert!(logs_contain("tick generator started"));
        assert!(logs_contain("counter_hz=2000000"));
    }

    #[test]
    #[traced_test]
    fn boundary_logs_overshoot() {
        period_boundary(crate::TICKS_60HZ, 33_336);
        assert!(logs_contain("period boundary"));
        assert!(logs_contain("overshoot=3"));
    }
}
