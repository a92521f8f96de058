#![expect(unsafe_code, reason = "volatile access to the peripheral registers")]

use super::{RegisterBus, Stm8Hal};
use crate::{TickConfig, TickGenerator};
use core::ptr;

/// The real register space, accessed with volatile loads and stores.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Only one `Mmio` may exist, and only on an STM8S where the addresses
    /// in [`super::addr`] are peripheral registers.
    #[must_use]
    #[inline]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read(&mut self, address: u16) -> u8 {
        let reg = ptr::with_exposed_provenance::<u8>(usize::from(address));
        // SAFETY: `Mmio::new` guarantees `address` is a mapped register.
        unsafe { ptr::read_volatile(reg) }
    }

    #[inline]
    fn write(&mut self, address: u16, val: u8) {
        let reg = ptr::with_exposed_provenance_mut::<u8>(usize::from(address));
        // SAFETY: `Mmio::new` guarantees `address` is a mapped register.
        unsafe { ptr::write_volatile(reg, val) }
    }
}

/// Firmware entry point: starts the generator with the compiled-in
/// configuration and never returns.
///
/// # Safety
///
/// Must be called once, from the reset handler of an STM8S105.
#[inline]
pub unsafe fn firmware_main() -> ! {
    // SAFETY: forwarded from the caller.
    let bus = unsafe { Mmio::new() };
    TickGenerator::new(Stm8Hal::new(bus), TickConfig::DEFAULT).run()
}
