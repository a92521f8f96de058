//! Software stand-ins for the hardware: a HAL with a counter in memory, and
//! an emulated STM8S timer/port block for the register backend.

mod hal;
mod stm8;

pub use hal::{EDGE_HISTORY, Edge, SimulatedHal, StartupEvent};
pub use stm8::Stm8Peripherals;
