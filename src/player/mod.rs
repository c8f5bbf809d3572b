//! Sample player subsystem
//!
//! Architecture:
//! - Tick ISR: table lookup + cursor advance, integer only
//! - Reconfigure: period arithmetic, timer reprogram under the tick gate
//! - Shared state: atomics, single writer per field

pub mod period;
pub mod sample_player;
pub mod state;
pub mod timer;

pub use period::{achieved_frequency, period_for, MIN_PERIOD_US};
pub use sample_player::{SamplePlayer, TickHandler};
pub use state::{PlaybackState, PlayerState, TickGate};
pub use timer::{PeriodicTimer, SampleOutput};
