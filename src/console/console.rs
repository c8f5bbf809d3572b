//! Main console struct: line editing plus dispatch

use core::fmt::Write;

use super::{execute, parse_line, CommandContext, ConsoleError, LineBuffer};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Console line editor
pub struct Console {
    line: LineBuffer,
}

impl Console {
    /// Create new console
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Process a single input byte
    ///
    /// Returns Some(result) when a non-empty line was executed, None if more
    /// input is needed. Errors are also printed to `out`.
    pub fn process_byte(
        &mut self,
        byte: u8,
        ctx: &CommandContext<'_>,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>> {
        match byte {
            // Enter
            b'\r' | b'\n' => {
                if self.line.is_empty() {
                    // Swallow the \n of a \r\n pair
                    if byte == b'\r' {
                        let _ = writeln!(out);
                        self.print_prompt(out);
                    }
                    return None;
                }

                let _ = writeln!(out);
                let result = execute(&parse_line(self.line.as_str()), ctx, out);
                if let Err(err) = result {
                    let _ = writeln!(out, "{}", err);
                }
                self.line.clear();
                self.print_prompt(out);
                Some(result)
            }

            // Backspace
            0x7F | 0x08 => {
                if !self.line.is_empty() {
                    self.line.backspace();
                    // Echo: backspace, space, backspace
                    let _ = write!(out, "\x08 \x08");
                }
                None
            }

            // Ctrl+C
            0x03 => {
                let _ = writeln!(out, "^C");
                self.line.clear();
                self.print_prompt(out);
                None
            }

            // Ctrl+U (clear line)
            0x15 => {
                for _ in 0..self.line.len() {
                    let _ = write!(out, "\x08 \x08");
                }
                self.line.clear();
                None
            }

            // Printable character
            0x20..=0x7E => {
                if self.line.push(byte) {
                    let _ = write!(out, "{}", byte as char);
                }
                None
            }

            _ => None,
        }
    }

    /// Current (unterminated) input
    pub fn pending_input(&self) -> &str {
        self.line.as_str()
    }

    /// Print the prompt
    pub fn print_prompt(&self, out: &mut dyn Write) {
        let _ = write!(out, "sine> ");
    }

    /// Print welcome banner
    pub fn print_banner(&self, out: &mut dyn Write) {
        let _ = writeln!(out, "\r\n{}", VERSION);
        let _ = writeln!(out, "Type 'help' for commands, or a frequency in Hz.\r");
        self.print_prompt(out);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
