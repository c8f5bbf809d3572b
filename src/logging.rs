//! ISR-safe logging for the sine generator.
//!
//! ```text
//! Control / ISR          LogStream            Main loop
//! ─────────────          ─────────            ─────────
//!
//! rt_info!() ─────────▶ [L0][L1][L2] ──────▶ UART TX
//! non-blocking            lock-free           blocking ok
//! ```
//!
//! # Rules
//!
//! - The tick handler never logs
//! - Reconfigure logs through `rt_*!` macros only, never `println!`
//! - Messages are dropped, not queued, when the ring is full

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 256;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            timestamp_us: 0,
            level: LogLevel::Info,
            len: 0,
            msg: [0; MAX_MSG_LEN],
        }
    }
}

/// Lock-free log stream (multiple producers, single consumer).
///
/// - Producers reserve a slot with compare-exchange on `reserved`
/// - Slots become visible to the reader in reservation order via `committed`
/// - Push never blocks on the reader (drops message if full)
/// - Drained from the main loop at leisure
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    /// Next slot handed to a producer
    reserved: AtomicU32,
    /// Slots below this index are fully written
    committed: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Producers own disjoint slots between reserve and commit.
// The single consumer only reads slots below `committed`.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry {
                timestamp_us: 0,
                level: LogLevel::Info,
                len: 0,
                msg: [0; MAX_MSG_LEN],
            }; N]),
            reserved: AtomicU32::new(0),
            committed: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (never waits for the reader).
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    /// Never call from the tick ISR.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        let mut slot = self.reserved.load(Ordering::Relaxed);
        loop {
            let read = self.read_idx.load(Ordering::Acquire);
            if slot.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.reserved.compare_exchange_weak(
                slot,
                slot.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => slot = current,
            }
        }

        let idx = (slot as usize) & Self::MASK;

        // SAFETY: slot reserved exclusively above; reader stays below `committed`.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        // Publish in reservation order
        while self
            .committed
            .compare_exchange_weak(slot, slot.wrapping_add(1), Ordering::Release, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }
        true
    }

    /// Drain next log entry (main loop only).
    ///
    /// Returns `None` if no entries available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let committed = self.committed.load(Ordering::Acquire);

        if read == committed {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer, slot committed
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let committed = self.committed.load(Ordering::Acquire);
        committed.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Non-blocking log macro.
///
/// Use this instead of println!, ESP_LOGx, etc.
///
/// # Example
///
/// ```ignore
/// rt_log!(LogLevel::Info, BG_LOG_STREAM, timestamp_us(), "period {} us", period);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Non-blocking info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Non-blocking warning log.
#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Non-blocking error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Non-blocking debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// Microseconds since boot, for log timestamps.
#[cfg(target_os = "espidf")]
#[inline]
pub fn timestamp_us() -> i64 {
    // SAFETY: esp_timer_get_time is always safe to call
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

/// Host builds have no boot clock; entries are stamped 0.
#[cfg(not(target_os = "espidf"))]
#[inline]
pub fn timestamp_us() -> i64 {
    0
}

/// Log stream for the calling core.
///
/// - Core 0 → RT_LOG_STREAM (main task, timer ISR allocated here)
/// - Core 1 → BG_LOG_STREAM (anything pinned to the app core)
#[cfg(target_os = "espidf")]
#[inline]
pub fn current_log_stream() -> &'static LogStream {
    // SAFETY: xTaskGetCoreID is always safe to call
    unsafe {
        let task = esp_idf_svc::sys::xTaskGetCurrentTaskHandle();
        if esp_idf_svc::sys::xTaskGetCoreID(task) == 0 {
            &crate::RT_LOG_STREAM
        } else {
            &crate::BG_LOG_STREAM
        }
    }
}

/// Single-core host: everything goes to the background stream.
#[cfg(not(target_os = "espidf"))]
#[inline]
pub fn current_log_stream() -> &'static LogStream {
    &crate::BG_LOG_STREAM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"freq 440 Hz -> period 35 us"));
        assert!(stream.has_entries());
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(&entry.msg[..entry.len as usize], b"freq 440 Hz -> period 35 us");

        assert!(!stream.has_entries());
    }

    #[test]
    fn test_log_stream_full_then_recovers() {
        let stream = LogStream::<4>::new();

        for t in 0..4 {
            assert!(stream.push(t, LogLevel::Info, b"x"));
        }

        // Ring full: dropped, not queued
        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);
        assert_eq!(stream.pending(), 4);

        // Drain one, room for exactly one more
        assert_eq!(stream.drain().map(|e| e.timestamp_us), Some(0));
        assert!(stream.push(6, LogLevel::Info, b"6"));
        assert!(!stream.push(7, LogLevel::Info, b"7"));
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<4>::new();
        let long = [b'a'; MAX_MSG_LEN + 40];
        assert!(stream.push(0, LogLevel::Warn, &long));
        assert_eq!(stream.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 32];
        let len = format_to_buffer(&mut buf, format_args!("period {} us", 156));
        assert_eq!(&buf[..len], b"period 156 us");
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("{}", 123456));
        assert_eq!(&buf[..len], b"1234");
    }

    #[test]
    fn test_rt_info_macro() {
        let stream = LogStream::<8>::new();
        crate::rt_info!(stream, 42, "stop: {} Hz", 0);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(&entry.msg[..entry.len as usize], b"stop: 0 Hz");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_concurrent_producers_account_for_every_message() {
        use std::thread;

        let stream = LogStream::<64>::new();

        thread::scope(|s| {
            for i in 0..4 {
                let stream = &stream;
                s.spawn(move || {
                    for j in 0..30 {
                        let msg = format!("producer {} msg {}", i, j);
                        stream.push(j, LogLevel::Debug, msg.as_bytes());
                    }
                });
            }
        });

        let mut received = 0;
        while let Some(entry) = stream.drain() {
            assert!(entry.msg[..entry.len as usize].starts_with(b"producer "));
            received += 1;
        }

        // 4 × 30 = 120 pushed into 64 slots
        assert_eq!(received + stream.dropped(), 120);
        assert_eq!(received, 64);
    }
}
