//! Command handlers

use core::fmt::Write;

use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::config::GeneratorConfig;
use crate::control::{FrequencyRequest, RequestSlot};
use crate::fault::FaultState;
use crate::player::{achieved_frequency, PlaybackState};

/// Everything a command may read or post to
pub struct CommandContext<'a> {
    /// Mailbox drained by the main loop
    pub requests: &'a RequestSlot,
    /// Live playback state (read-only here)
    pub playback: &'a PlaybackState,
    /// Last applied settings
    pub config: &'a GeneratorConfig,
    pub fault: &'a FaultState,
    /// Wave table entries per cycle
    pub table_len: usize,
}

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub handler: fn(&ParsedCommand<'_>, &CommandContext<'_>, &mut dyn Write) -> Result<(), ConsoleError>,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "freq", brief: "Set output frequency in Hz (0 = stop)", handler: cmd_freq },
    CommandDescriptor { name: "stop", brief: "Hold output at rest", handler: cmd_stop },
    CommandDescriptor { name: "status", brief: "Show playback state", handler: cmd_status },
    CommandDescriptor { name: "stats", brief: "Faults and log counters", handler: cmd_stats },
];

/// Execute a parsed command
///
/// A line holding only a number is shorthand for `freq <number>`.
pub fn execute(
    cmd: &ParsedCommand<'_>,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    if starts_numeric(cmd.command) {
        let request = parse_frequency(cmd.command)?;
        return post_request(request, ctx, out);
    }

    let handler = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, ctx, out)
}

/// Get all command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

/// Parse a frequency token
///
/// Non-numeric, NaN and infinite values are `InvalidValue`;
/// negative values are `OutOfRange`.
pub fn parse_frequency(token: &str) -> Result<FrequencyRequest, ConsoleError> {
    let hz: f32 = token.parse().map_err(|_| ConsoleError::InvalidValue)?;
    if hz.is_nan() || hz.is_infinite() {
        return Err(ConsoleError::InvalidValue);
    }
    FrequencyRequest::new(hz).ok_or(ConsoleError::OutOfRange)
}

fn starts_numeric(token: &str) -> bool {
    matches!(token.as_bytes().first(), Some(b'0'..=b'9' | b'.' | b'-' | b'+'))
}

fn post_request(
    request: FrequencyRequest,
    ctx: &CommandContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let replaced = ctx.requests.post(request);
    if replaced {
        let _ = writeln!(out, "freq={} (replaces pending)", request.hz());
    } else {
        let _ = writeln!(out, "freq={}", request.hz());
    }
    Ok(())
}

// --- Command Implementations ---

fn cmd_help(cmd: &ParsedCommand<'_>, _ctx: &CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, "{}: {}", c.name, c.brief);
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  {:<8} {}", c.name, c.brief);
        }
        let _ = writeln!(out, "  <hz>     Same as 'freq <hz>'");
    }
    Ok(())
}

fn cmd_freq(cmd: &ParsedCommand<'_>, ctx: &CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let token = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let request = parse_frequency(token)?;
    post_request(request, ctx, out)
}

fn cmd_stop(_cmd: &ParsedCommand<'_>, ctx: &CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    ctx.requests.post(FrequencyRequest::STOP);
    let _ = writeln!(out, "stopping");
    Ok(())
}

fn cmd_status(_cmd: &ParsedCommand<'_>, ctx: &CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let period = ctx.playback.period_us();

    let _ = writeln!(out, "running={}", ctx.playback.is_running());
    let _ = writeln!(out, "freq={} Hz", ctx.config.frequency_hz());
    let _ = writeln!(out, "period={} us", period);
    let _ = writeln!(out, "achieved={} Hz", achieved_frequency(period, ctx.table_len));
    let _ = writeln!(out, "cursor={}/{}", ctx.playback.cursor(), ctx.table_len);
    if ctx.requests.is_pending() {
        let _ = writeln!(out, "request pending");
    }
    Ok(())
}

fn cmd_stats(_cmd: &ParsedCommand<'_>, ctx: &CommandContext<'_>, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let fault = ctx.fault.snapshot();
    if fault.active {
        let _ = writeln!(out, "fault: {} (data={})", fault.code.as_str(), fault.data);
    } else {
        let _ = writeln!(out, "fault: none");
    }
    let _ = writeln!(out, "faults since boot: {}", fault.count);
    let _ = writeln!(
        out,
        "log dropped: rt={} bg={}",
        crate::RT_LOG_STREAM.dropped(),
        crate::BG_LOG_STREAM.dropped()
    );
    Ok(())
}
