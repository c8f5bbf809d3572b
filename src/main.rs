//! Sine generator - main entry point
//!
//! On the ESP32:
//! 1. Initialize log UART, DAC channel and hardware timer
//! 2. Attach the tick handler to the timer ISR
//! 3. Start playback at the boot frequency
//! 4. Main loop: console input, frequency requests, log drain
//!
//! Elsewhere the same wiring runs as a hosted simulation: a thread plays the
//! timer, stdin is the console, and a counter stands in for the DAC.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use core::fmt::Write;

    use esp_idf_svc::hal::delay::NON_BLOCK;
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{config::Config as UartConfig, UartDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::{self as esp_idf_sys, EspError};

    use rust_sine_dac::config::{
        CONFIG, CONSOLE_BAUD, DEFAULT_ENVELOPE, INITIAL_FREQUENCY_HZ, TABLE_SIZE,
    };
    use rust_sine_dac::console::{CommandContext, Console};
    use rust_sine_dac::control::apply_request;
    use rust_sine_dac::hal::{DacConfig, EspDac, EspPeriodicTimer, TimerConfig};
    use rust_sine_dac::logging::timestamp_us;
    use rust_sine_dac::uart_logger::{UartLogger, UartLoggerConfig};
    use rust_sine_dac::{
        FaultState, PlaybackState, RequestSlot, SamplePlayer, StartupError, TickHandler,
        WaveTable, BG_LOG_STREAM,
    };

    // Built at compile time: an empty table fails the build, not the boot
    static TABLE: WaveTable<TABLE_SIZE> = match WaveTable::build(&DEFAULT_ENVELOPE) {
        Ok(table) => table,
        Err(_) => panic!("wave table must have at least one entry"),
    };

    static PLAYBACK: PlaybackState = PlaybackState::new();
    static DAC: EspDac = EspDac::new();
    static REQUESTS: RequestSlot = RequestSlot::new();
    static FAULT: FaultState = FaultState::new();

    /// Console output over UART0
    struct UartWriter<'a, 'd>(&'a UartDriver<'d>);

    impl Write for UartWriter<'_, '_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            self.0.write(s.as_bytes()).map(|_| ()).map_err(|_| core::fmt::Error)
        }
    }

    #[no_mangle]
    fn main() {
        esp_idf_sys::link_patches();

        if let Err(err) = run() {
            rust_sine_dac::rt_error!(BG_LOG_STREAM, timestamp_us(), "startup failed: {}", err);
            // Nothing can drive the output; halt with the DAC untouched
            loop {
                unsafe {
                    esp_idf_sys::vTaskDelay(1000);
                }
            }
        }
    }

    fn run() -> Result<(), StartupError<EspError>> {
        let peripherals = Peripherals::take().map_err(StartupError::Timer)?;
        let pins = peripherals.pins;

        let mut logger = UartLogger::new(peripherals.uart1, pins.gpio17, &UartLoggerConfig::default())
            .map_err(StartupError::Uart)?;

        DAC.init(&DacConfig::default()).map_err(StartupError::Output)?;

        let mut timer = EspPeriodicTimer::new(peripherals.timer00, &TimerConfig::default())
            .map_err(StartupError::Timer)?;
        let handler = TickHandler::new(&TABLE, &PLAYBACK, &DAC);
        timer
            .attach(move || handler.on_tick())
            .map_err(StartupError::Timer)?;

        let mut player = SamplePlayer::start(&TABLE, &PLAYBACK, &DAC, timer, INITIAL_FREQUENCY_HZ)
            .map_err(StartupError::Timer)?;
        CONFIG.record(INITIAL_FREQUENCY_HZ, PLAYBACK.period_us());

        let console_uart = UartDriver::new(
            peripherals.uart0,
            pins.gpio1,
            pins.gpio3,
            Option::<AnyIOPin>::None, // CTS
            Option::<AnyIOPin>::None, // RTS
            &UartConfig::default().baudrate(Hertz(CONSOLE_BAUD)),
        )
        .map_err(StartupError::Uart)?;

        let ctx = CommandContext {
            requests: &REQUESTS,
            playback: &PLAYBACK,
            config: &CONFIG,
            fault: &FAULT,
            table_len: TABLE_SIZE,
        };
        let mut out = UartWriter(&console_uart);
        let mut console = Console::new();
        console.print_banner(&mut out);

        let mut rx = [0u8; 32];
        loop {
            let n = console_uart.read(&mut rx, NON_BLOCK).unwrap_or(0);
            for &byte in &rx[..n] {
                console.process_byte(byte, &ctx, &mut out);
            }

            if let Some(request) = REQUESTS.take() {
                apply_request(&mut player, request, &CONFIG, &FAULT);
            }

            logger.drain(timestamp_us());

            unsafe {
                esp_idf_sys::vTaskDelay(1);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<(), rust_sine_dac::StartupError<core::convert::Infallible>> {
    host::run()
}

/// Hosted simulation of the firmware
#[cfg(not(target_os = "espidf"))]
mod host {
    use core::convert::Infallible;
    use core::num::NonZeroU32;
    use std::io::{self, Read};
    use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
    use std::thread;
    use std::time::Duration;

    use rust_sine_dac::config::{CONFIG, DEFAULT_ENVELOPE, INITIAL_FREQUENCY_HZ, TABLE_SIZE};
    use rust_sine_dac::console::{CommandContext, Console};
    use rust_sine_dac::control::apply_request;
    use rust_sine_dac::player::{PeriodicTimer, SampleOutput};
    use rust_sine_dac::uart_logger::format_log_entry;
    use rust_sine_dac::{
        FaultState, PlaybackState, RequestSlot, SamplePlayer, StartupError, TickHandler,
        WaveTable, BG_LOG_STREAM, RT_LOG_STREAM,
    };

    /// State shared between the simulated timer and its driver thread
    struct SimTimerShared {
        period_us: AtomicU32,
        armed: AtomicBool,
        unmasked: AtomicBool,
        shutdown: AtomicBool,
    }

    struct SimTimer<'a> {
        shared: &'a SimTimerShared,
    }

    impl PeriodicTimer for SimTimer<'_> {
        type Error = Infallible;

        fn arm(&mut self, period_us: NonZeroU32) -> Result<(), Infallible> {
            self.shared.period_us.store(period_us.get(), Ordering::Release);
            self.shared.armed.store(true, Ordering::Release);
            Ok(())
        }

        fn disable(&mut self) -> Result<(), Infallible> {
            self.shared.unmasked.store(false, Ordering::Release);
            Ok(())
        }

        fn enable(&mut self) -> Result<(), Infallible> {
            self.shared.unmasked.store(true, Ordering::Release);
            Ok(())
        }
    }

    /// DAC stand-in: last code and write count
    struct SimDac {
        last: AtomicU8,
        writes: AtomicU64,
    }

    impl SampleOutput for SimDac {
        fn write(&self, code: u8) {
            self.last.store(code, Ordering::Relaxed);
            self.writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct StdoutWriter;

    impl core::fmt::Write for StdoutWriter {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            print!("{}", s);
            Ok(())
        }
    }

    fn drain_logs() {
        let mut buf = [0u8; 256];
        for stream in [&RT_LOG_STREAM, &BG_LOG_STREAM] {
            while let Some(entry) = stream.drain() {
                let len = format_log_entry(&entry, &mut buf);
                eprint!("{}", String::from_utf8_lossy(&buf[..len]));
            }
        }
    }

    pub fn run() -> Result<(), StartupError<Infallible>> {
        let table = WaveTable::<TABLE_SIZE>::build(&DEFAULT_ENVELOPE)?;
        let playback = PlaybackState::new();
        let requests = RequestSlot::new();
        let fault = FaultState::new();
        let dac = SimDac {
            last: AtomicU8::new(0),
            writes: AtomicU64::new(0),
        };
        let shared = SimTimerShared {
            period_us: AtomicU32::new(0),
            armed: AtomicBool::new(false),
            unmasked: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        };

        thread::scope(|s| {
            let handler = TickHandler::new(&table, &playback, &dac);
            let timer_shared = &shared;
            s.spawn(move || {
                while !timer_shared.shutdown.load(Ordering::Acquire) {
                    let armed = timer_shared.armed.load(Ordering::Acquire)
                        && timer_shared.unmasked.load(Ordering::Acquire);
                    if armed {
                        handler.on_tick();
                        let period = timer_shared.period_us.load(Ordering::Acquire);
                        thread::sleep(Duration::from_micros(period as u64));
                    } else {
                        thread::sleep(Duration::from_millis(1));
                    }
                }
            });

            let timer = SimTimer { shared: &shared };
            let mut player =
                match SamplePlayer::start(&table, &playback, &dac, timer, INITIAL_FREQUENCY_HZ) {
                    Ok(player) => player,
                    Err(never) => match never {},
                };
            CONFIG.record(INITIAL_FREQUENCY_HZ, playback.period_us());

            let ctx = CommandContext {
                requests: &requests,
                playback: &playback,
                config: &CONFIG,
                fault: &fault,
                table_len: TABLE_SIZE,
            };
            let mut out = StdoutWriter;
            let mut console = Console::new();
            console.print_banner(&mut out);

            for byte in io::stdin().lock().bytes() {
                let Ok(byte) = byte else { break };
                console.process_byte(byte, &ctx, &mut out);

                if let Some(request) = requests.take() {
                    apply_request(&mut player, request, &CONFIG, &fault);
                    eprintln!(
                        "dac: {} writes, last code {}",
                        dac.writes.load(Ordering::Relaxed),
                        dac.last.load(Ordering::Relaxed)
                    );
                }
                drain_logs();
            }

            let _ = player.reconfigure(0.0);
            shared.shutdown.store(true, Ordering::Release);
        });

        Ok(())
    }
}
