//! Timer period arithmetic
//!
//! Float only at this boundary; everything downstream is integer.

/// Microseconds per second
pub const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Shortest period the timer is asked for (fastest achievable output)
pub const MIN_PERIOD_US: u32 = 1;

/// Tick period for one table entry at `freq_hz`
///
/// period = floor(1_000_000 / (freq_hz * size))
///
/// Returns 0 ("stopped") for non-positive or NaN frequencies and for an
/// empty table. A valid request that truncates to 0 is clamped to
/// [`MIN_PERIOD_US`] so high frequencies still produce output.
pub fn period_for(freq_hz: f32, size: usize) -> u32 {
    if freq_hz.is_nan() || freq_hz <= 0.0 || size == 0 {
        return 0;
    }

    let period = MICROS_PER_SEC / (freq_hz as f64 * size as f64);

    // `as` truncates toward zero and saturates at u32::MAX
    (period as u32).max(MIN_PERIOD_US)
}

/// Output frequency actually produced by `period_us` over `size` entries
pub fn achieved_frequency(period_us: u32, size: usize) -> f32 {
    if period_us == 0 || size == 0 {
        return 0.0;
    }
    (MICROS_PER_SEC / (period_us as f64 * size as f64)) as f32
}
