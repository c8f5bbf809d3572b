//! Command execution tests

use core::fmt::Write;

use rust_sine_dac::config::GeneratorConfig;
use rust_sine_dac::console::{
    command_names, execute, parse_frequency, parse_line, CommandContext, Console, ConsoleError,
};
use rust_sine_dac::{FaultCode, FaultState, FrequencyRequest, PlaybackState, RequestSlot};

/// Test output buffer
struct TestOutput {
    buf: String,
}

impl TestOutput {
    fn new() -> Self {
        Self { buf: String::new() }
    }
}

impl Write for TestOutput {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

struct Fixture {
    requests: RequestSlot,
    playback: PlaybackState,
    config: GeneratorConfig,
    fault: FaultState,
}

impl Fixture {
    fn new() -> Self {
        Self {
            requests: RequestSlot::new(),
            playback: PlaybackState::new(),
            config: GeneratorConfig::new(),
            fault: FaultState::new(),
        }
    }

    fn ctx(&self) -> CommandContext<'_> {
        CommandContext {
            requests: &self.requests,
            playback: &self.playback,
            config: &self.config,
            fault: &self.fault,
            table_len: 64,
        }
    }

    fn run(&self, line: &str) -> (Result<(), ConsoleError>, String) {
        let mut out = TestOutput::new();
        let result = execute(&parse_line(line), &self.ctx(), &mut out);
        (result, out.buf)
    }
}

#[test]
fn test_command_names() {
    let names: Vec<_> = command_names().collect();
    assert_eq!(names, ["help", "freq", "stop", "status", "stats"]);
}

#[test]
fn test_help_lists_commands() {
    let fx = Fixture::new();
    let (result, out) = fx.run("help");
    assert!(result.is_ok());
    for name in command_names() {
        assert!(out.contains(name), "missing {}", name);
    }
}

#[test]
fn test_help_single_command() {
    let fx = Fixture::new();
    let (result, out) = fx.run("help freq");
    assert!(result.is_ok());
    assert!(out.starts_with("freq:"));

    assert_eq!(fx.run("help nope").0, Err(ConsoleError::UnknownCommand));
}

#[test]
fn test_freq_posts_request() {
    let fx = Fixture::new();
    let (result, out) = fx.run("freq 440");
    assert!(result.is_ok());
    assert_eq!(out, "freq=440\n");
    assert_eq!(fx.requests.take().map(FrequencyRequest::hz), Some(440.0));
}

#[test]
fn test_bare_number_is_freq() {
    let fx = Fixture::new();
    assert!(fx.run("1000.5").0.is_ok());
    assert_eq!(fx.requests.take().map(FrequencyRequest::hz), Some(1000.5));
}

#[test]
fn test_freq_replaces_pending() {
    let fx = Fixture::new();
    fx.run("100");
    let (_, out) = fx.run("200");
    assert!(out.contains("replaces pending"));
    assert_eq!(fx.requests.take().map(FrequencyRequest::hz), Some(200.0));
}

#[test]
fn test_freq_zero_stops() {
    let fx = Fixture::new();
    assert!(fx.run("freq 0").0.is_ok());
    assert_eq!(fx.requests.take(), Some(FrequencyRequest::STOP));
}

#[test]
fn test_freq_errors() {
    let fx = Fixture::new();
    assert_eq!(fx.run("freq").0, Err(ConsoleError::MissingArg));
    assert_eq!(fx.run("freq abc").0, Err(ConsoleError::InvalidValue));
    assert_eq!(fx.run("freq -5").0, Err(ConsoleError::OutOfRange));
    assert_eq!(fx.run("-5").0, Err(ConsoleError::OutOfRange));
    assert_eq!(fx.run("freq NaN").0, Err(ConsoleError::InvalidValue));
    assert_eq!(fx.run("+inf").0, Err(ConsoleError::InvalidValue));

    // Rejected input never reaches the player
    assert!(!fx.requests.is_pending());
}

#[test]
fn test_parse_frequency() {
    assert_eq!(parse_frequency("50").map(FrequencyRequest::hz), Ok(50.0));
    assert_eq!(parse_frequency("1e3").map(FrequencyRequest::hz), Ok(1000.0));
    assert_eq!(parse_frequency("12x"), Err(ConsoleError::InvalidValue));
}

#[test]
fn test_stop_command() {
    let fx = Fixture::new();
    let (result, out) = fx.run("stop");
    assert!(result.is_ok());
    assert_eq!(out, "stopping\n");
    assert_eq!(fx.requests.take(), Some(FrequencyRequest::STOP));
}

#[test]
fn test_unknown_command() {
    let fx = Fixture::new();
    assert_eq!(fx.run("play").0, Err(ConsoleError::UnknownCommand));
}

#[test]
fn test_empty_line_is_ok() {
    let fx = Fixture::new();
    let (result, out) = fx.run("   ");
    assert!(result.is_ok());
    assert!(out.is_empty());
}

#[test]
fn test_status_stopped() {
    let fx = Fixture::new();
    let (result, out) = fx.run("status");
    assert!(result.is_ok());
    assert!(out.contains("running=false"));
    assert!(out.contains("period=0 us"));
    assert!(out.contains("cursor=0/64"));
    assert!(!out.contains("request pending"));
}

#[test]
fn test_status_shows_pending_and_applied() {
    let fx = Fixture::new();
    fx.config.record(100.0, 156);
    fx.run("440");

    let (_, out) = fx.run("status");
    assert!(out.contains("freq=100 Hz"));
    assert!(out.contains("request pending"));
}

#[test]
fn test_stats_reports_fault() {
    let fx = Fixture::new();
    let (_, out) = fx.run("stats");
    assert!(out.contains("fault: none"));
    assert!(out.contains("faults since boot: 0"));

    fx.fault.set(FaultCode::TimerFault, 440);
    let (_, out) = fx.run("stats");
    assert!(out.contains("fault: timer (data=440)"));
    assert!(out.contains("faults since boot: 1"));
}

#[test]
fn test_error_display() {
    assert_eq!(
        format!("{}", ConsoleError::OutOfRange),
        "E04: frequency must be >= 0"
    );
    assert_eq!(ConsoleError::UnknownCommand.code(), "E01");
}

#[test]
fn test_console_executes_on_enter() {
    let fx = Fixture::new();
    let ctx = fx.ctx();
    let mut console = Console::new();
    let mut out = TestOutput::new();

    for &b in b"freq 25" {
        assert!(console.process_byte(b, &ctx, &mut out).is_none());
    }
    assert_eq!(console.pending_input(), "freq 25");

    let result = console.process_byte(b'\r', &ctx, &mut out);
    assert_eq!(result, Some(Ok(())));
    assert_eq!(console.pending_input(), "");
    assert!(out.buf.ends_with("sine> "));
    assert_eq!(fx.requests.take().map(FrequencyRequest::hz), Some(25.0));
}

#[test]
fn test_console_prints_errors() {
    let fx = Fixture::new();
    let ctx = fx.ctx();
    let mut console = Console::new();
    let mut out = TestOutput::new();

    for &b in b"-3\n" {
        console.process_byte(b, &ctx, &mut out);
    }
    assert!(out.buf.contains("E04"));
}

#[test]
fn test_console_line_editing() {
    let fx = Fixture::new();
    let ctx = fx.ctx();
    let mut console = Console::default();
    let mut out = TestOutput::new();

    for &b in b"stopx\x7f" {
        console.process_byte(b, &ctx, &mut out);
    }
    assert_eq!(console.pending_input(), "stop");

    console.process_byte(0x15, &ctx, &mut out); // Ctrl+U
    assert_eq!(console.pending_input(), "");

    for &b in b"freq 9\x03" {
        console.process_byte(b, &ctx, &mut out);
    }
    assert_eq!(console.pending_input(), "");
    assert!(!fx.requests.is_pending());
}

#[test]
fn test_console_crlf_is_one_line() {
    let fx = Fixture::new();
    let ctx = fx.ctx();
    let mut console = Console::new();
    let mut out = TestOutput::new();

    let results: Vec<_> = b"stop\r\n"
        .iter()
        .filter_map(|&b| console.process_byte(b, &ctx, &mut out))
        .collect();
    assert_eq!(results, vec![Ok(())]);
    assert_eq!(out.buf.matches("sine> ").count(), 1);
}
