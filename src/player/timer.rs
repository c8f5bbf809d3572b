//! Hardware seams used by the player.
//!
//! Implemented by `hal` on the ESP32 and by test doubles on the host.

use core::num::NonZeroU32;

/// Single-byte analog output (DAC)
///
/// `write` is called from the tick ISR, so it must be synchronous,
/// non-blocking and allocation-free. Takes `&self` so the ISR and the
/// control context can share one output; the player guarantees they never
/// write concurrently.
pub trait SampleOutput {
    /// Emit `code` (0 = low rail, 255 = high rail)
    fn write(&self, code: u8);
}

/// Periodic timer service driving the tick handler
///
/// The tick callback is attached once when the timer is created; these
/// methods only mask, unmask and reprogram it.
pub trait PeriodicTimer {
    /// Driver error
    type Error: core::fmt::Debug;

    /// Program `period_us` with auto-reload and reset the alarm counter to 0.
    ///
    /// Does not unmask the callback; see [`PeriodicTimer::enable`].
    fn arm(&mut self, period_us: NonZeroU32) -> Result<(), Self::Error>;

    /// Mask the tick callback. No callback starts after this returns.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Unmask the tick callback
    fn enable(&mut self) -> Result<(), Self::Error>;
}
