//! Host side of the tick generator: runs the firmware's control loop on an
//! emulated STM8S, measures the waveform it produces and reports it.

#[cfg(feature = "cli")]
mod cli;
mod error;
mod logging;
pub mod report;
mod simulation;

#[cfg(feature = "cli")]
pub use cli::{AMITICK_BIN, Cli, clap};
pub use error::Error;
pub use logging::{DEFAULT_FILTER, env_filter, init_tracing};
pub use report::WaveformReport;
pub use simulation::{LOOP_CYCLES, Simulation, SimulationOptions};
