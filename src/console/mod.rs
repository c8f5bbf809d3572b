//! Serial console: the frequency command source
//!
//! Polled from the main loop - no dedicated task.
//! Zero heap allocation - all static buffers.
//! Commands never touch the player directly; they post requests.

pub mod commands;
pub mod console;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{command_names, execute, parse_frequency, CommandContext, COMMANDS};
pub use console::Console;
pub use error::ConsoleError;
pub use line_buffer::{LineBuffer, LINE_SIZE};
pub use parser::{parse_line, ParsedCommand};
