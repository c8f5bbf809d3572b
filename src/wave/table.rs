//! Sine lookup table for DAC output
//!
//! N entries covering one full cycle.
//! Values are u8 codes for direct use with the 8-bit DAC.

use core::f64::consts::PI;

/// Largest code the DAC accepts
pub const CODE_MAX: i32 = 255;

/// Output voltage envelope the table is built for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Lowest output voltage (trough of the sine)
    pub v_min: f64,
    /// Highest output voltage (peak of the sine)
    pub v_max: f64,
    /// DAC reference voltage (code 255)
    pub v_ref: f64,
}

impl Envelope {
    /// Create envelope from volts
    pub const fn new(v_min: f64, v_max: f64, v_ref: f64) -> Self {
        Self { v_min, v_max, v_ref }
    }

    /// DC offset in DAC codes: round((v_min + v_max) / 2 / v_ref * 255)
    pub const fn offset_code(&self) -> i32 {
        round_half_away((self.v_min + self.v_max) / 2.0 / self.v_ref * CODE_MAX as f64)
    }

    /// Peak amplitude in DAC codes: round((v_max - v_min) / 2 / v_ref * 255)
    pub const fn amplitude_code(&self) -> i32 {
        round_half_away((self.v_max - self.v_min) / 2.0 / self.v_ref * CODE_MAX as f64)
    }
}

/// Table construction error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// Table size is zero
    EmptyTable,
    /// Envelope is not finite or has a non-positive reference
    InvalidEnvelope,
    /// Sine peaks would leave the 0-255 code range
    OutOfRange,
}

impl TableError {
    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmptyTable => "table size must be non-zero",
            Self::InvalidEnvelope => "invalid voltage envelope",
            Self::OutOfRange => "envelope exceeds DAC range",
        }
    }
}

impl core::fmt::Display for TableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// Pre-computed sine wave table
///
/// Entry i = clamp(offset + round(amplitude * sin(2π * i / N)), 0, 255).
/// Index 0 = 0°, N/4 = 90°, N/2 = 180°, 3N/4 = 270°.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveTable<const N: usize> {
    samples: [u8; N],
    /// Zero-amplitude code, written when playback is stopped
    rest: u8,
}

impl<const N: usize> WaveTable<N> {
    /// Build table from a voltage envelope
    ///
    /// Offset/amplitude combinations that overshoot the code range are
    /// clamped per sample, not rejected. See [`WaveTable::build_strict`].
    pub const fn build(envelope: &Envelope) -> Result<Self, TableError> {
        Self::from_codes(envelope.offset_code(), envelope.amplitude_code())
    }

    /// Build table, rejecting envelopes that would need clamping
    pub fn build_strict(envelope: &Envelope) -> Result<Self, TableError> {
        let finite = envelope.v_min.is_finite()
            && envelope.v_max.is_finite()
            && envelope.v_ref.is_finite();
        if !finite || envelope.v_ref <= 0.0 || envelope.v_max < envelope.v_min {
            return Err(TableError::InvalidEnvelope);
        }

        let offset = envelope.offset_code();
        let amplitude = envelope.amplitude_code();
        if offset - amplitude < 0 || offset + amplitude > CODE_MAX {
            return Err(TableError::OutOfRange);
        }

        Self::from_codes(offset, amplitude)
    }

    /// Build table directly from offset and amplitude in DAC codes
    pub const fn from_codes(offset: i32, amplitude: i32) -> Result<Self, TableError> {
        if N == 0 {
            return Err(TableError::EmptyTable);
        }

        let mut samples = [0u8; N];
        let mut i = 0;
        while i < N {
            let angle = (i as f64) * 2.0 * PI / (N as f64);
            let swing = round_half_away(amplitude as f64 * const_sin(angle));
            samples[i] = clamp_code(offset.saturating_add(swing));
            i += 1;
        }

        Ok(Self {
            samples,
            rest: clamp_code(offset),
        })
    }

    /// Sample at `index` (caller keeps index in 0..N)
    #[inline]
    pub fn sample_at(&self, index: usize) -> u8 {
        self.samples[index]
    }

    /// Code held on the output while stopped
    #[inline]
    pub const fn rest_code(&self) -> u8 {
        self.rest
    }

    /// Number of entries
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false: empty tables cannot be built
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Raw samples
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }
}

const fn clamp_code(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > CODE_MAX {
        CODE_MAX as u8
    } else {
        value as u8
    }
}

/// Round to nearest, halves away from zero (const-compatible)
const fn round_half_away(x: f64) -> i32 {
    if x >= 0.0 {
        (x + 0.5) as i32
    } else {
        (x - 0.5) as i32
    }
}

/// Const-compatible sine approximation using Taylor series
///
/// Folded into [-π/2, π/2] first, so the error stays below 1e-7.
const fn const_sin(x: f64) -> f64 {
    // Normalize to [-π, π]
    let mut x = x;
    while x > PI {
        x -= 2.0 * PI;
    }
    while x < -PI {
        x += 2.0 * PI;
    }

    // sin(π - x) = sin(x)
    if x > PI / 2.0 {
        x = PI - x;
    } else if x < -PI / 2.0 {
        x = -PI - x;
    }

    // Taylor series: sin(x) = x - x³/3! + x⁵/5! - x⁷/7! + ...
    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;
    let x11 = x9 * x2;

    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362880.0 - x11 / 39916800.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_sin_matches_std() {
        let mut i = 0;
        while i < 360 {
            let angle = i as f64 * PI / 180.0;
            let err = (const_sin(angle) - angle.sin()).abs();
            assert!(err < 1e-6, "sin({}°) off by {}", i, err);
            i += 1;
        }
    }

    #[test]
    fn test_round_half_away() {
        assert_eq!(round_half_away(0.5), 1);
        assert_eq!(round_half_away(-0.5), -1);
        assert_eq!(round_half_away(127.49), 127);
        assert_eq!(round_half_away(-2.6), -3);
    }

    #[test]
    fn test_clamp_code() {
        assert_eq!(clamp_code(-40), 0);
        assert_eq!(clamp_code(300), 255);
        assert_eq!(clamp_code(128), 128);
    }
}
