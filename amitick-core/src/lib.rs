//! # Amitick core
//!
//! Replacement for the mains-derived 50/60 Hz tick of the Amiga 1000, 2000
//! and 3000 mainboards. A free-running 16-bit counter clocked at 2 MHz is
//! polled in a tight loop: the output pin is low for the first half of the
//! selected period and high for the second half, and the counter is sent
//! back to zero once it passes the end of the period. A second pin selects
//! the rate, low for 50 Hz and high for 60 Hz.
//!
//! The loop only talks to the hardware through [`TickHal`]. The crate ships
//! a register backend for the STM8S105 ([`stm8::Stm8Hal`]), an emulated
//! STM8S peripheral block and a plain software HAL for tests
//! ([`sim`]), and, with the `embedded-hal` feature, an adapter for
//! `embedded-hal` pins ([`pins`]).
//!
//! ## Tracing
//!
//! The generator reports startup, rate changes and period boundaries
//! through the `tracing` crate, see [`trace`].

#![cfg_attr(not(test), no_std)]

mod clock;
mod config;
mod error;
mod generator;
mod hal;
mod period;
#[cfg(feature = "embedded-hal")]
pub mod pins;
mod rate;
pub mod sim;
pub mod stm8;
pub mod trace;

pub use {
    clock::{BASE_CLOCK_HZ, ClockConfig, PRESCALER, Prescaler},
    config::TickConfig,
    error::Error,
    generator::{Step, TickGenerator},
    hal::TickHal,
    period::{COUNTER_MAX, Period, PeriodRounding, TICKS_50HZ, TICKS_60HZ},
    rate::TickRate,
};
