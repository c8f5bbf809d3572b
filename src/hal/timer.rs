//! Hardware timer driving the tick ISR.
//!
//! Wraps esp-idf-hal's `TimerDriver` (general purpose timer, auto-reload).
//! The tick callback is subscribed once; reconfiguration only masks,
//! reprograms and unmasks it.

#[cfg(target_os = "espidf")]
use core::num::NonZeroU32;

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::timer::{config, Timer, TimerDriver};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

#[cfg(target_os = "espidf")]
use crate::player::PeriodicTimer;

/// Timer configuration.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    /// APB clock divider (80 → 1 MHz tick on an 80 MHz APB)
    pub divider: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { divider: 80 }
    }
}

impl TimerConfig {
    /// Timer ticks for `period_us` at `tick_hz`, never 0
    pub fn ticks_for(period_us: u32, tick_hz: u64) -> u64 {
        (period_us as u64 * tick_hz / 1_000_000).max(1)
    }
}

/// Periodic timer backed by a TIMG timer
#[cfg(target_os = "espidf")]
pub struct EspPeriodicTimer<'d> {
    driver: TimerDriver<'d>,
    tick_hz: u64,
}

#[cfg(target_os = "espidf")]
impl<'d> EspPeriodicTimer<'d> {
    /// Claim `timer` with auto-reload enabled and its interrupt masked.
    ///
    /// Failure here is a startup failure.
    pub fn new<T: Timer>(
        timer: impl Peripheral<P = T> + 'd,
        cfg: &TimerConfig,
    ) -> Result<Self, EspError> {
        let driver_config = config::Config::new()
            .divider(cfg.divider)
            .auto_reload(true);
        let mut driver = TimerDriver::new(timer, &driver_config)?;
        driver.disable_interrupt()?;
        let tick_hz = driver.tick_hz();

        Ok(Self { driver, tick_hz })
    }

    /// Attach the tick callback. Runs in ISR context.
    pub fn attach<F>(&mut self, callback: F) -> Result<(), EspError>
    where
        F: FnMut() + Send + 'static,
    {
        // SAFETY: callback is 'static and only touches atomics and the DAC
        unsafe { self.driver.subscribe(callback) }?;
        self.driver.disable_interrupt()
    }

    /// Timer tick rate in Hz
    pub fn tick_hz(&self) -> u64 {
        self.tick_hz
    }
}

#[cfg(target_os = "espidf")]
impl PeriodicTimer for EspPeriodicTimer<'_> {
    type Error = EspError;

    fn arm(&mut self, period_us: NonZeroU32) -> Result<(), EspError> {
        let ticks = TimerConfig::ticks_for(period_us.get(), self.tick_hz);
        self.driver.enable(false)?;
        self.driver.set_alarm(ticks)?;
        self.driver.set_counter(0)?;
        self.driver.enable_alarm(true)?;
        self.driver.enable(true)
    }

    fn disable(&mut self) -> Result<(), EspError> {
        self.driver.disable_interrupt()
    }

    fn enable(&mut self) -> Result<(), EspError> {
        self.driver.enable_interrupt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_for_1mhz() {
        assert_eq!(TimerConfig::ticks_for(156, 1_000_000), 156);
    }

    #[test]
    fn test_ticks_for_never_zero() {
        // 1 µs on a 100 kHz tick would truncate to 0
        assert_eq!(TimerConfig::ticks_for(1, 100_000), 1);
    }

    #[test]
    fn test_ticks_for_no_overflow() {
        assert_eq!(TimerConfig::ticks_for(u32::MAX, 40_000_000), u32::MAX as u64 * 40);
    }
}
