//! UART log output.
//!
//! Drains RT_LOG_STREAM and BG_LOG_STREAM to a TX-only UART from the main
//! loop. Requires an external USB-UART adapter on the log pin.
//!
//! ```text
//! ESP32 GPIO17 (U1TXD) ──────▶ USB-UART RX
//!                               └─▶ PC Serial Monitor
//! ```

use crate::logging::{format_to_buffer, LogEntry};

#[cfg(target_os = "espidf")]
use crate::{BG_LOG_STREAM, RT_LOG_STREAM};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Interval between dropped-message reports
pub const DROPPED_REPORT_INTERVAL_US: i64 = 10_000_000;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: crate::config::LOG_BAUD,
            tx_pin: 17,
        }
    }
}

/// Format log entry as `[timestamp_us] LEVEL: message\n`.
///
/// Returns the number of bytes written.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!(
            "[{:10}] {}: {}\n",
            entry.timestamp_us,
            entry.level.as_str(),
            core::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap_or("<invalid utf8>")
        ),
    )
}

/// Format the periodic dropped-message warning.
pub fn format_dropped_report(rt_dropped: u32, bg_dropped: u32, buf: &mut [u8]) -> usize {
    format_to_buffer(
        buf,
        format_args!("[WARN] Dropped: RT={}, BG={}\n", rt_dropped, bg_dropped),
    )
}

/// UART log drain, polled from the main loop
#[cfg(target_os = "espidf")]
pub struct UartLogger<'d> {
    uart: UartTxDriver<'d>,
    last_dropped_report: i64,
}

#[cfg(target_os = "espidf")]
impl<'d> UartLogger<'d> {
    /// Initialize UART1 TX-only for logging output.
    pub fn new(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        config: &UartLoggerConfig,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let uart_config = uart::config::Config::default()
            .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

        let uart = UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )?;

        Ok(Self {
            uart,
            last_dropped_report: 0,
        })
    }

    /// Write everything pending. Returns the number of entries written.
    pub fn drain(&mut self, now_us: i64) -> usize {
        let mut format_buf = [0u8; 256];
        let mut written = 0;

        // RT stream first: driver and fault messages
        for stream in [&RT_LOG_STREAM, &BG_LOG_STREAM] {
            while let Some(entry) = stream.drain() {
                let len = format_log_entry(&entry, &mut format_buf);
                let _ = self.uart.write(&format_buf[..len]);
                written += 1;
            }
        }

        if now_us - self.last_dropped_report > DROPPED_REPORT_INTERVAL_US {
            let rt_dropped = RT_LOG_STREAM.dropped();
            let bg_dropped = BG_LOG_STREAM.dropped();

            if rt_dropped > 0 || bg_dropped > 0 {
                let len = format_dropped_report(rt_dropped, bg_dropped, &mut format_buf);
                let _ = self.uart.write(&format_buf[..len]);

                RT_LOG_STREAM.reset_dropped();
                BG_LOG_STREAM.reset_dropped();
            }

            self.last_dropped_report = now_us;
        }

        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    fn entry(timestamp_us: i64, level: LogLevel, text: &[u8]) -> LogEntry {
        let mut msg = [0u8; MAX_MSG_LEN];
        msg[..text.len()].copy_from_slice(text);
        LogEntry {
            timestamp_us,
            level,
            len: text.len() as u8,
            msg,
        }
    }

    #[test]
    fn test_format_log_entry() {
        let entry = entry(1234567, LogLevel::Info, b"freq 100 Hz -> period 156 us");

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: freq 100 Hz -> period 156 us\n");
    }

    #[test]
    fn test_format_respects_len() {
        let mut entry = entry(999, LogLevel::Error, b"timer arm failedX");
        entry.len = 16;

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("timer arm failed"));
        assert!(!formatted.contains('X'));
    }

    #[test]
    fn test_format_dropped_report() {
        let mut buf = [0u8; 64];
        let len = format_dropped_report(0, 7, &mut buf);
        assert_eq!(&buf[..len], b"[WARN] Dropped: RT=0, BG=7\n");
    }
}
