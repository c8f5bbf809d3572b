//! Hardware Abstraction Layer for the sine generator.
//!
//! Thin wrappers around ESP-IDF peripherals implementing the player's
//! `SampleOutput` and `PeriodicTimer` seams.
//! Business logic stays in core modules, HAL is just I/O.

pub mod dac;
pub mod timer;

pub use dac::{DacConfig, DAC_GPIO};
#[cfg(target_os = "espidf")]
pub use dac::EspDac;
#[cfg(target_os = "espidf")]
pub use timer::EspPeriodicTimer;
pub use timer::TimerConfig;
