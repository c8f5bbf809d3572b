//! # DAC sine generator
//!
//! Continuous sine output on an 8-bit DAC, frequency set at runtime from a
//! serial console.
//!
//! ## Architecture
//!
//! ```text
//! Console ──post──▶ RequestSlot ──take──▶ SamplePlayer::reconfigure
//!                                              │ mask / arm / unmask
//!                                              ▼
//!                       timer ISR ──▶ TickHandler::on_tick ──▶ DAC
//!                                       table[cursor], cursor += 1
//! ```
//!
//! - The wave table is built once and never written again
//! - The tick ISR is integer-only and touches nothing but the cursor
//! - Reconfiguration is bracketed by the tick gate; phase is preserved

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod control;
pub mod fault;
pub mod hal;
pub mod log_globals;
pub mod logging;
pub mod player;
pub mod uart_logger;
pub mod wave;

pub use config::CONFIG;
pub use control::{FrequencyRequest, RequestSlot};
pub use fault::{FaultCode, FaultState};
pub use log_globals::{BG_LOG_STREAM, RT_LOG_STREAM};
pub use player::{PlaybackState, PlayerState, SamplePlayer, TickHandler};
pub use wave::{Envelope, TableError, WaveTable};

/// Startup failure: the generator cannot run
#[derive(Debug)]
pub enum StartupError<E> {
    /// Wave table could not be built
    Table(TableError),
    /// DAC channel unavailable
    Output(E),
    /// Timer unavailable or refused the initial period
    Timer(E),
    /// Console or log UART unavailable
    Uart(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for StartupError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Table(err) => write!(f, "wave table: {}", err),
            Self::Output(err) => write!(f, "dac init: {:?}", err),
            Self::Timer(err) => write!(f, "timer init: {:?}", err),
            Self::Uart(err) => write!(f, "uart init: {:?}", err),
        }
    }
}

impl<E> From<TableError> for StartupError<E> {
    fn from(err: TableError) -> Self {
        Self::Table(err)
    }
}
