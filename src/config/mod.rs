//! Module: config
//!
//! Purpose: Build-time defaults and runtime-visible settings for the
//! sine generator.
//!
//! Architecture:
//! - Table geometry and voltage envelope: compile-time constants, so the
//!   wave table can live in a `static`
//! - Last applied frequency: atomics in [`CONFIG`] (lock-free)
//!
//! Safety: RT-safe. All runtime access via atomics, no locks.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::wave::Envelope;

/// Wave table entries per cycle (power of two)
pub const TABLE_SIZE: usize = 64;

/// DAC reference voltage (code 255)
pub const DAC_VREF: f64 = 3.3;

/// Output envelope: 0.3 V trough, 3.0 V peak
pub const DEFAULT_ENVELOPE: Envelope = Envelope::new(0.3, 3.0, DAC_VREF);

/// Frequency applied at boot. 0 = start silent.
pub const INITIAL_FREQUENCY_HZ: f32 = 0.0;

/// Console UART baud rate
pub const CONSOLE_BAUD: u32 = 115_200;

/// Log UART configuration
pub const LOG_BAUD: u32 = 115_200;

/// Runtime-visible generator settings
pub struct GeneratorConfig {
    /// Last applied frequency (f32 bits)
    frequency_bits: AtomicU32,
    /// Last applied period in µs (0 = stopped)
    period_us: AtomicU32,
}

impl GeneratorConfig {
    /// Create config at the boot defaults
    pub const fn new() -> Self {
        Self {
            frequency_bits: AtomicU32::new(0),
            period_us: AtomicU32::new(0),
        }
    }

    /// Record a frequency change that was applied to the player
    pub fn record(&self, frequency_hz: f32, period_us: u32) {
        self.frequency_bits
            .store(frequency_hz.to_bits(), Ordering::Relaxed);
        self.period_us.store(period_us, Ordering::Relaxed);
    }

    /// Last applied frequency in Hz
    pub fn frequency_hz(&self) -> f32 {
        f32::from_bits(self.frequency_bits.load(Ordering::Relaxed))
    }

    /// Last applied period in µs
    pub fn period_us(&self) -> u32 {
        self.period_us.load(Ordering::Relaxed)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Global generator settings
pub static CONFIG: GeneratorConfig = GeneratorConfig::new();
