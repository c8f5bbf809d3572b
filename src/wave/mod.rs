//! Waveform lookup table
//!
//! One full sine cycle, quantized to 8-bit DAC codes.
//! Built once at startup (or at compile time), read-only afterwards.

pub mod table;

pub use table::{Envelope, TableError, WaveTable, CODE_MAX};
