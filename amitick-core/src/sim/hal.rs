use crate::{ClockConfig, TickHal};
use heapless::{HistoryBuffer, Vec};

/// Number of output edges kept by [`SimulatedHal`].
pub const EDGE_HISTORY: usize = 64;

/// Startup hook calls, in the order they were made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartupEvent {
    ConfigurePins,
    /// First output write after the pins were configured.
    Output(bool),
    StartCounter(ClockConfig),
}

/// A change of the output level. [`SimulatedHal`] timestamps in counter
/// ticks since it was created; other simulations use their own time unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub at: u64,
    pub level: bool,
}

/// Counter and pins in plain memory. Time only moves when
/// [`SimulatedHal::advance`] is called, one unit per counter tick.
///
/// Resetting the counter parks it at its maximum so that it rolls over to
/// zero on the next tick, the way the STM8 timer is reset.
pub struct SimulatedHal {
    counter: u16,
    edges: HistoryBuffer<Edge, EDGE_HISTORY>,
    elapsed: u64,
    output: bool,
    resets: u32,
    running: bool,
    select: bool,
    startup: Vec<StartupEvent, 3>,
}

impl SimulatedHal {
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self {
            counter: 0,
            edges: HistoryBuffer::new(),
            elapsed: 0,
            output: false,
            resets: 0,
            running: false,
            select: false,
            startup: Vec::new(),
        }
    }

    /// Moves time forward by `ticks` counter ticks. The counter only moves
    /// once it has been started and wraps at its maximum.
    #[inline]
    pub fn advance(&mut self, ticks: u32) {
        self.elapsed += u64::from(ticks);

        if self.running {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "the counter wraps, only the low 16 bits matter"
            )]
            let ticks = ticks as u16;
            self.counter = self.counter.wrapping_add(ticks);
        }
    }

    #[must_use]
    #[inline]
    pub const fn counter_running(&self) -> bool {
        self.running
    }

    /// Most recent output edges, oldest first.
    #[inline]
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.oldest_ordered()
    }

    #[must_use]
    #[inline]
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    #[must_use]
    #[inline]
    pub const fn output(&self) -> bool {
        self.output
    }

    /// Number of times the counter was reset.
    #[must_use]
    #[inline]
    pub const fn resets(&self) -> u32 {
        self.resets
    }

    #[inline]
    pub const fn set_counter(&mut self, count: u16) {
        self.counter = count;
    }

    #[inline]
    pub const fn set_select(&mut self, high: bool) {
        self.select = high;
    }

    #[must_use]
    #[inline]
    pub fn startup(&self) -> &[StartupEvent] {
        &self.startup
    }

    fn record(&mut self, event: StartupEvent) {
        if let Err(event) = self.startup.push(event) {
            tracing::warn!(?event, "startup hook called after startup");
        }
    }
}

impl Default for SimulatedHal {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TickHal for SimulatedHal {
    #[inline]
    fn start_counter(&mut self, clock: &ClockConfig) {
        self.record(StartupEvent::StartCounter(*clock));
        self.running = true;
    }

    #[inline]
    fn configure_pins(&mut self) {
        self.record(StartupEvent::ConfigurePins);
    }

    #[inline]
    fn read_counter(&mut self) -> u16 {
        self.counter
    }

    #[inline]
    fn reset_counter(&mut self) {
        self.counter = u16::MAX;
        self.resets += 1;
    }

    #[inline]
    fn set_output(&mut self, high: bool) {
        if self.startup.last() == Some(&StartupEvent::ConfigurePins) {
            self.record(StartupEvent::Output(high));
        }

        if high != self.output {
            self.edges.write(Edge {
                at: self.elapsed,
                level: high,
            });
        }

        self.output = high;
    }

    #[inline]
    fn read_select_input(&mut self) -> bool {
        self.select
    }
}
