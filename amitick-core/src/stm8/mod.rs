//! Register-level backend for the STM8S105.
//!
//! The tick is driven on PB0 and the rate is selected on PB1. TIM1 is the
//! free-running counter: the oscillator runs undivided at 16 MHz and the
//! TIM1 prescaler brings it down to the counter rate.

#[cfg(feature = "mmio")]
mod mmio;

#[cfg(feature = "mmio")]
pub use mmio::{Mmio, firmware_main};

use crate::{ClockConfig, TickHal};

/// Memory-mapped register addresses.
pub mod addr {
    pub const CLK_CKDIVR: u16 = 0x50C6;

    pub const PB_ODR: u16 = 0x5005;
    pub const PB_IDR: u16 = 0x5006;
    pub const PB_DDR: u16 = 0x5007;
    pub const PB_CR1: u16 = 0x5008;
    pub const PB_CR2: u16 = 0x5009;

    pub const TIM1_CR1: u16 = 0x5250;
    pub const TIM1_EGR: u16 = 0x5257;
    pub const TIM1_CNTRH: u16 = 0x525E;
    pub const TIM1_CNTRL: u16 = 0x525F;
    pub const TIM1_PSCRH: u16 = 0x5260;
    pub const TIM1_PSCRL: u16 = 0x5261;
}

pub const TICK_PIN: u8 = 1 << 0;
pub const SELECT_PIN: u8 = 1 << 1;

const TIM1_CR1_CEN: u8 = 0x01;
const TIM1_EGR_UG: u8 = 0x01;

/// Byte-wide access to the peripheral register space.
pub trait RegisterBus {
    fn read(&mut self, address: u16) -> u8;
    fn write(&mut self, address: u16, val: u8);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    #[inline]
    fn read(&mut self, address: u16) -> u8 {
        (**self).read(address)
    }

    #[inline]
    fn write(&mut self, address: u16, val: u8) {
        (**self).write(address, val);
    }
}

/// [`TickHal`] over the STM8S105 registers.
pub struct Stm8Hal<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> Stm8Hal<B> {
    #[must_use]
    #[inline]
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    #[must_use]
    #[inline]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub const fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    #[must_use]
    #[inline]
    pub fn into_bus(self) -> B {
        self.bus
    }

    fn modify(&mut self, address: u16, set: u8, clear: u8) {
        let val = self.bus.read(address);
        self.bus.write(address, (val & !clear) | set);
    }
}

impl<B: RegisterBus> TickHal for Stm8Hal<B> {
    /// `clock.base_hz` is fixed by the oscillator, only the prescaler is
    /// programmed.
    #[expect(
        clippy::big_endian_bytes,
        reason = "TIM1 registers are laid out high byte first"
    )]
    fn start_counter(&mut self, clock: &ClockConfig) {
        // HSIDIV and CPUDIV to /1
        self.bus.write(addr::CLK_CKDIVR, 0x00);

        let [high, low] = clock.prescaler.register().to_be_bytes();
        self.bus.write(addr::TIM1_PSCRH, high);
        self.bus.write(addr::TIM1_PSCRL, low);

        // the prescaler is preloaded, an update event makes it take effect
        // now instead of at the first overflow
        self.bus.write(addr::TIM1_EGR, TIM1_EGR_UG);
        self.bus.write(addr::TIM1_CR1, TIM1_CR1_CEN);
    }

    fn configure_pins(&mut self) {
        self.modify(addr::PB_DDR, TICK_PIN, SELECT_PIN);
        // push-pull output, floating input
        self.modify(addr::PB_CR1, TICK_PIN, SELECT_PIN);
    }

    #[expect(
        clippy::big_endian_bytes,
        reason = "TIM1 registers are laid out high byte first"
    )]
    fn read_counter(&mut self) -> u16 {
        // high byte first, it latches the low byte
        let high = self.bus.read(addr::TIM1_CNTRH);
        let low = self.bus.read(addr::TIM1_CNTRL);
        u16::from_be_bytes([high, low])
    }

    fn reset_counter(&mut self) {
        // TIM1 has no way to zero the counter from software short of an
        // update event, so park it at the top of its range and let it roll
        // over on the next count.
        // TODO: program TIM1_ARRH/L with the period and drop the polling reset
        self.bus.write(addr::TIM1_CNTRH, 0xFF);
        self.bus.write(addr::TIM1_CNTRL, 0xFF);
    }

    fn set_output(&mut self, high: bool) {
        if high {
            self.modify(addr::PB_ODR, TICK_PIN, 0);
        } else {
            self.modify(addr::PB_ODR, 0, TICK_PIN);
        }
    }

    fn read_select_input(&mut self) -> bool {
        self.bus.read(addr::PB_IDR) & SELECT_PIN != 0
    }
}
