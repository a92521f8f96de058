use crate::stm8::{RegisterBus, TICK_PIN, addr};

const CKDIVR_RESET: u8 = 0x18;
const CR1_CEN: u8 = 0x01;
const EGR_UG: u8 = 0x01;

/// Emulated subset of an STM8S105: the clock divider, TIM1 counting up from
/// a prescaled master clock, and port B.
///
/// Time is counted in oscillator cycles, 16 MHz unless built with
/// [`Stm8Peripherals::with_oscillator`]. The timer is
/// clocked from the master clock (oscillator / HSIDIV); CPUDIV only slows the
/// core and is not modelled. Registers not listed in [`addr`] read as zero
/// and ignore writes.
#[derive(Clone, Debug)]
pub struct Stm8Peripherals {
    ckdivr: u8,
    elapsed: u64,
    oscillator_hz: u32,
    port_b: Port,
    tim1: Tim1,
}

#[derive(Clone, Debug, Default)]
struct Port {
    cr1: u8,
    cr2: u8,
    ddr: u8,
    external: u8,
    odr: u8,
}

impl Port {
    const fn idr(&self) -> u8 {
        (self.odr & self.ddr) | (self.external & !self.ddr)
    }
}

#[derive(Clone, Debug, Default)]
struct Tim1 {
    counter: u16,
    cr1: u8,
    // low byte frozen by a read of the high byte
    latched_low: Option<u8>,
    // oscillator cycles accumulated towards the next count
    phase: u64,
    prescaler: u16,
    prescaler_high: u8,
    prescaler_preload: u16,
    updates: u32,
}

impl Tim1 {
    const fn update_event(&mut self) {
        self.prescaler = self.prescaler_preload;
        self.phase = 0;
        self.updates += 1;
    }
}

impl Stm8Peripherals {
    /// Internal high-speed oscillator.
    pub const HSI_HZ: u32 = 16_000_000;

    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::with_oscillator(Self::HSI_HZ)
    }

    /// Peripherals clocked from an oscillator other than the internal one.
    #[must_use]
    #[inline]
    pub fn with_oscillator(oscillator_hz: u32) -> Self {
        Self {
            ckdivr: CKDIVR_RESET,
            elapsed: 0,
            oscillator_hz,
            port_b: Port::default(),
            tim1: Tim1::default(),
        }
    }

    /// Moves time forward by `cycles` oscillator cycles, counting TIM1 if
    /// it is enabled. An overflow past 0xFFFF is an update event and loads
    /// the preloaded prescaler.
    #[inline]
    pub fn advance(&mut self, cycles: u32) {
        self.elapsed += u64::from(cycles);

        if self.tim1.cr1 & CR1_CEN == 0 {
            return;
        }

        let mut cycles = u64::from(cycles) + self.tim1.phase;

        loop {
            let per_count = u64::from(self.master_divisor()) * (u64::from(self.tim1.prescaler) + 1);
            let counts = cycles / per_count;
            let to_overflow = 0x1_0000 - u64::from(self.tim1.counter);

            if counts < to_overflow {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "counts is below the distance to overflow"
                )]
                let counts = counts as u16;
                self.tim1.counter += counts;
                self.tim1.phase = cycles % per_count;
                return;
            }

            cycles -= to_overflow * per_count;
            self.tim1.counter = 0;
            self.tim1.update_event();
        }
    }

    #[must_use]
    #[inline]
    pub const fn ckdivr(&self) -> u8 {
        self.ckdivr
    }

    #[must_use]
    #[inline]
    pub const fn counter(&self) -> u16 {
        self.tim1.counter
    }

    #[must_use]
    #[inline]
    pub const fn counter_enabled(&self) -> bool {
        self.tim1.cr1 & CR1_CEN != 0
    }

    /// Counter increments per second with the current dividers.
    #[must_use]
    #[inline]
    pub const fn counter_hz(&self) -> u32 {
        self.oscillator_hz / self.master_divisor() / (self.tim1.prescaler as u32 + 1)
    }

    /// Oscillator cycles since power-on.
    #[must_use]
    #[inline]
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// HSIDIV field of CKDIVR: the oscillator is divided by 1, 2, 4 or 8.
    #[must_use]
    #[inline]
    pub const fn master_divisor(&self) -> u32 {
        1 << ((self.ckdivr >> 3) & 0x03)
    }

    #[must_use]
    #[inline]
    pub const fn oscillator_hz(&self) -> u32 {
        self.oscillator_hz
    }

    /// Level seen on a port B pin: the output latch for outputs, the
    /// external level for inputs.
    #[must_use]
    #[inline]
    pub const fn pin_level(&self, pin: u8) -> bool {
        self.port_b.idr() & pin != 0
    }

    #[must_use]
    #[inline]
    pub const fn port_b_cr1(&self) -> u8 {
        self.port_b.cr1
    }

    #[must_use]
    #[inline]
    pub const fn port_b_ddr(&self) -> u8 {
        self.port_b.ddr
    }

    #[must_use]
    #[inline]
    pub const fn port_b_odr(&self) -> u8 {
        self.port_b.odr
    }

    /// Prescaler register value the counter is running with.
    #[must_use]
    #[inline]
    pub const fn prescaler(&self) -> u16 {
        self.tim1.prescaler
    }

    /// Level of the tick output, PB0.
    #[must_use]
    #[inline]
    pub const fn tick_level(&self) -> bool {
        self.pin_level(TICK_PIN)
    }

    /// Drives a port B pin from outside. Only visible while the pin is an
    /// input.
    #[inline]
    pub const fn set_input(&mut self, pin: u8, high: bool) {
        if high {
            self.port_b.external |= pin;
        } else {
            self.port_b.external &= !pin;
        }
    }

    /// Number of TIM1 update events so far.
    #[must_use]
    #[inline]
    pub const fn updates(&self) -> u32 {
        self.tim1.updates
    }
}

impl Default for Stm8Peripherals {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for Stm8Peripherals {
    #[inline]
    #[expect(
        clippy::big_endian_bytes,
        reason = "TIM1 registers are laid out high byte first"
    )]
    fn read(&mut self, address: u16) -> u8 {
        let [high, low] = self.tim1.counter.to_be_bytes();
        let [psc_high, psc_low] = self.tim1.prescaler_preload.to_be_bytes();

        match address {
            addr::CLK_CKDIVR => self.ckdivr,
            addr::PB_ODR => self.port_b.odr,
            addr::PB_IDR => self.port_b.idr(),
            addr::PB_DDR => self.port_b.ddr,
            addr::PB_CR1 => self.port_b.cr1,
            addr::PB_CR2 => self.port_b.cr2,
            addr::TIM1_CR1 => self.tim1.cr1,
            addr::TIM1_CNTRH => {
                self.tim1.latched_low = Some(low);
                high
            }
            addr::TIM1_CNTRL => self.tim1.latched_low.take().unwrap_or(low),
            addr::TIM1_PSCRH => psc_high,
            addr::TIM1_PSCRL => psc_low,
            _ => 0,
        }
    }

    #[inline]
    #[expect(
        clippy::big_endian_bytes,
        reason = "TIM1 registers are laid out high byte first"
    )]
    fn write(&mut self, address: u16, val: u8) {
        match address {
            addr::CLK_CKDIVR => self.ckdivr = val & 0x1F,
            addr::PB_ODR => self.port_b.odr = val,
            addr::PB_DDR => self.port_b.ddr = val,
            addr::PB_CR1 => self.port_b.cr1 = val,
            addr::PB_CR2 => self.port_b.cr2 = val,
            addr::TIM1_CR1 => self.tim1.cr1 = val,
            addr::TIM1_EGR => {
                if val & EGR_UG != 0 {
                    self.tim1.counter = 0;
                    self.tim1.update_event();
                }
            }
            addr::TIM1_CNTRH => {
                self.tim1.counter = u16::from_be_bytes([val, self.tim1.counter.to_be_bytes()[1]]);
            }
            addr::TIM1_CNTRL => {
                self.tim1.counter = u16::from_be_bytes([self.tim1.counter.to_be_bytes()[0], val]);
            }
            // the preload only changes once the low byte is written
            addr::TIM1_PSCRH => self.tim1.prescaler_high = val,
            addr::TIM1_PSCRL => {
                self.tim1.prescaler_preload = u16::from_be_bytes([self.tim1.prescaler_high, val]);
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_state() {
        let per = Stm8Peripherals::new();
        assert_eq!(per.ckdivr(), 0x18);
        assert_eq!(per.master_divisor(), 8);
        assert!(!per.counter_enabled());
        assert_eq!(per.counter_hz(), 2_000_000);
    }

    #[test]
    fn external_oscillator() {
        let mut per = Stm8Peripherals::with_oscillator(8_000_000);
        assert_eq!(per.counter_hz(), 1_000_000);

        per.write(addr::CLK_CKDIVR, 0);
        assert_eq!(per.counter_hz(), 8_000_000);
    }

    #[test]
    fn stopped_counter_does_not_count() {
        let mut per = Stm8Peripherals::new();
        per.advance(1_000);
        assert_eq!(per.counter(), 0);
        assert_eq!(per.elapsed(), 1_000);
    }

    #[test]
    fn prescaler_waits_for_update_event() {
        let mut per = Stm8Peripherals::new();
        per.write(addr::CLK_CKDIVR, 0);
        per.write(addr::TIM1_PSCRH, 0);
        per.write(addr::TIM1_PSCRL, 7);
        per.write(addr::TIM1_CR1, CR1_CEN);

        // still undivided
        per.advance(16);
        assert_eq!(per.counter(), 16);
        assert_eq!(per.prescaler(), 0);

        per.write(addr::TIM1_EGR, EGR_UG);
        assert_eq!(per.counter(), 0);
        assert_eq!(per.prescaler(), 7);

        per.advance(16);
        assert_eq!(per.counter(), 2);
    }

    #[test]
    fn overflow_loads_prescaler() {
        let mut per = Stm8Peripherals::new();
        per.write(addr::CLK_CKDIVR, 0);
        per.write(addr::TIM1_PSCRL, 1);
        per.write(addr::TIM1_CR1, CR1_CEN);

        per.advance(0x1_0000);
        assert_eq!(per.counter(), 0);
        assert_eq!(per.updates(), 1);

        per.advance(10);
        assert_eq!(per.counter(), 5);
    }

    #[test]
    fn fractional_counts_carry_over() {
        let mut per = Stm8Peripherals::new();
        per.write(addr::CLK_CKDIVR, 0);
        per.write(addr::TIM1_PSCRL, 7);
        per.write(addr::TIM1_EGR, EGR_UG);
        per.write(addr::TIM1_CR1, CR1_CEN);

        for _ in 0..8 {
            per.advance(3);
        }
        assert_eq!(per.counter(), 3);
    }

    #[test]
    fn high_byte_read_latches_low_byte() {
        let mut per = Stm8Peripherals::new();
        per.write(addr::CLK_CKDIVR, 0);
        per.write(addr::TIM1_CR1, CR1_CEN);
        per.advance(0x01FF);

        assert_eq!(per.read(addr::TIM1_CNTRH), 0x01);
        per.advance(1);
        assert_eq!(per.read(addr::TIM1_CNTRL), 0xFF);
        assert_eq!(per.read(addr::TIM1_CNTRL), 0x00);
    }

    #[test]
    fn counter_writes_are_bytewise() {
        let mut per = Stm8Peripherals::new();
        per.write(addr::TIM1_CNTRH, 0xFF);
        per.write(addr::TIM1_CNTRL, 0xFF);
        assert_eq!(per.counter(), 0xFFFF);

        per.write(addr::CLK_CKDIVR, 0);
        per.write(addr::TIM1_CR1, CR1_CEN);
        per.advance(1);
        assert_eq!(per.counter(), 0);
        assert_eq!(per.updates(), 1);
    }

    #[test]
    fn port_input_and_output() {
        let mut per = Stm8Peripherals::new();
        per.write(addr::PB_DDR, 0x01);
        per.write(addr::PB_ODR, 0x03);
        per.set_input(0x02, false);

        assert!(per.pin_level(0x01));
        assert!(!per.pin_level(0x02));

        per.set_input(0x02, true);
        per.set_input(0x01, false);
        assert_eq!(per.read(addr::PB_IDR), 0x03);
    }
}
