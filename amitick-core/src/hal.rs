use crate::ClockConfig;

/// Hardware the tick generator runs on: one free-running counter, one
/// output pin and one select input.
///
/// The startup hooks are called exactly once, in declaration order, before
/// the first loop iteration. None of the operations can fail.
pub trait TickHal {
    /// Runs the core at full speed, programs the counter prescaler and
    /// starts the counter.
    fn start_counter(&mut self, clock: &ClockConfig);

    /// Makes the tick pin a push-pull output and the select pin an input.
    fn configure_pins(&mut self);

    fn read_counter(&mut self) -> u16;

    /// Sends the counter back to zero. The wrap may happen on the next
    /// counter increment rather than immediately.
    fn reset_counter(&mut self);

    fn set_output(&mut self, high: bool);

    fn read_select_input(&mut self) -> bool;
}

impl<H: TickHal + ?Sized> TickHal for &mut H {
    #[inline]
    fn start_counter(&mut self, clock: &ClockConfig) {
        (**self).start_counter(clock);
    }

    #[inline]
    fn configure_pins(&mut self) {
        (**self).configure_pins();
    }

    #[inline]
    fn read_counter(&mut self) -> u16 {
        (**self).read_counter()
    }

    #[inline]
    fn reset_counter(&mut self) {
        (**self).reset_counter();
    }

    #[inline]
    fn set_output(&mut self, high: bool) {
        (**self).set_output(high);
    }

    #[inline]
    fn read_select_input(&mut self) -> bool {
        (**self).read_select_input()
    }
}
