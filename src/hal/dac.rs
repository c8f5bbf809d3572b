//! 8-bit DAC output via the ESP-IDF oneshot DAC driver.
//!
//! ```text
//! TickHandler ──write(code)──▶ dac_oneshot_output_voltage ──▶ GPIO25
//! ```
//!
//! Only the original ESP32 and the ESP32-S2 have a DAC.

#[cfg(target_os = "espidf")]
use core::ffi::c_void;
#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicPtr, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{self, EspError};

#[cfg(target_os = "espidf")]
use crate::player::SampleOutput;

/// GPIO driven by DAC channel 0 on the ESP32
pub const DAC_GPIO: u8 = 25;

/// DAC configuration.
#[derive(Debug, Clone, Copy)]
pub struct DacConfig {
    /// DAC channel index (0 = GPIO25, 1 = GPIO26)
    pub channel: u8,
}

impl Default for DacConfig {
    fn default() -> Self {
        Self { channel: 0 }
    }
}

/// Oneshot DAC channel, usable from a `static`
///
/// The handle is installed once by [`EspDac::init`]; until then writes are
/// ignored.
#[cfg(target_os = "espidf")]
pub struct EspDac {
    handle: AtomicPtr<c_void>,
}

#[cfg(target_os = "espidf")]
impl EspDac {
    /// Create uninitialized output
    pub const fn new() -> Self {
        Self {
            handle: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    /// Acquire the DAC channel. Call once at startup.
    pub fn init(&self, config: &DacConfig) -> Result<(), EspError> {
        let chan_id = match config.channel {
            0 => sys::dac_channel_t_DAC_CHAN_0,
            _ => sys::dac_channel_t_DAC_CHAN_1,
        };
        let oneshot_config = sys::dac_oneshot_config_t { chan_id };
        let mut handle: sys::dac_oneshot_handle_t = core::ptr::null_mut();

        // SAFETY: config and out-pointer are valid for the call
        sys::esp!(unsafe { sys::dac_oneshot_new_channel(&oneshot_config, &mut handle) })?;

        self.handle.store(handle as *mut c_void, Ordering::Release);
        Ok(())
    }

    /// True once [`EspDac::init`] succeeded
    pub fn is_ready(&self) -> bool {
        !self.handle.load(Ordering::Acquire).is_null()
    }
}

#[cfg(target_os = "espidf")]
impl SampleOutput for EspDac {
    #[inline]
    fn write(&self, code: u8) {
        let handle = self.handle.load(Ordering::Acquire);
        if handle.is_null() {
            return;
        }
        // SAFETY: handle came from dac_oneshot_new_channel and is never freed.
        // The player never writes from two contexts at once.
        unsafe {
            sys::dac_oneshot_output_voltage(handle as sys::dac_oneshot_handle_t, code);
        }
    }
}
