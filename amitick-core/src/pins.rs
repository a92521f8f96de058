//! [`TickHal`] on top of `embedded-hal` pins.
//!
//! Pin direction and drive are encoded in the pin types of most HALs, so
//! [`TickHal::configure_pins`] has nothing to do here: hand over pins that
//! are already a push-pull output and an input. Only infallible pins are
//! accepted, the control loop has nowhere to report an error to.

use crate::{ClockConfig, TickHal};
use core::convert::Infallible;
use embedded_hal::digital::{InputPin, OutputPin};

/// A hardware counter that counts up on its own and wraps at `u16::MAX`.
pub trait FreeRunningCounter {
    /// Programs the prescaler from `clock` and starts counting.
    fn start(&mut self, clock: &ClockConfig);

    fn count(&mut self) -> u16;

    /// Sends the counter back to zero, immediately or on its next count.
    fn reset(&mut self);
}

pub struct PinHal<C, O, I> {
    counter: C,
    output: O,
    select: I,
}

impl<C, O, I> PinHal<C, O, I>
where
    C: FreeRunningCounter,
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
{
    #[must_use]
    #[inline]
    pub const fn new(counter: C, output: O, select: I) -> Self {
        Self {
            counter,
            output,
            select,
        }
    }

    #[inline]
    pub const fn parts_mut(&mut self) -> (&mut C, &mut O, &mut I) {
        (&mut self.counter, &mut self.output, &mut self.select)
    }

    #[must_use]
    #[inline]
    pub fn release(self) -> (C, O, I) {
        (self.counter, self.output, self.select)
    }
}

impl<C, O, I> TickHal for PinHal<C, O, I>
where
    C: FreeRunningCounter,
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
{
    fn start_counter(&mut self, clock: &ClockConfig) {
        self.counter.start(clock);
    }

    fn configure_pins(&mut self) {}

    fn read_counter(&mut self) -> u16 {
        self.counter.count()
    }

    fn reset_counter(&mut self) {
        self.counter.reset();
    }

    fn set_output(&mut self, high: bool) {
        let result = if high {
            self.output.set_high()
        } else {
            self.output.set_low()
        };

        infallible(result);
    }

    fn read_select_input(&mut self) -> bool {
        infallible(self.select.is_high())
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(val) => val,
        Err(never) => match never {},
    }
}
