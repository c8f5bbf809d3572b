//! Global log stream instances.
//!
//! One stream per core, drained together by the main loop.

use crate::logging::LogStream;

/// Log stream for Core 0, where the main task reconfigures the player.
///
/// The tick handler itself never logs.
pub static RT_LOG_STREAM: LogStream = LogStream::new();

/// Log stream for Core 1, and for everything on host builds.
pub static BG_LOG_STREAM: LogStream = LogStream::new();
