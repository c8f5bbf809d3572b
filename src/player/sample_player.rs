//! Sample player: tick handler plus reconfiguration.
//!
//! ```text
//! Control context                 Tick ISR
//! ───────────────                 ────────
//! reconfigure(freq)
//!   timer.disable()  ───╮
//!   gate.close()        │ no tick  on_tick()
//!   timer.arm(period)   │ runs       gate.try_enter()
//!   gate.open()         │ here       write(table[cursor])
//!   timer.enable()   ───╯            cursor = (cursor + 1) % N
//! ```
//!
//! The cursor is never touched by reconfigure, so a running waveform keeps
//! its phase across frequency changes.

use core::num::NonZeroU32;

use super::period::period_for;
use super::state::{PlaybackState, PlayerState};
use super::timer::{PeriodicTimer, SampleOutput};
use crate::logging::{current_log_stream, timestamp_us};
use crate::wave::WaveTable;

/// Interrupt-side half of the player
///
/// No allocation, no blocking, no logging, no floating point.
pub struct TickHandler<'a, const N: usize, O: SampleOutput> {
    table: &'a WaveTable<N>,
    state: &'a PlaybackState,
    output: &'a O,
}

impl<'a, const N: usize, O: SampleOutput> TickHandler<'a, N, O> {
    /// Create handler over shared table, state and output
    pub const fn new(table: &'a WaveTable<N>, state: &'a PlaybackState, output: &'a O) -> Self {
        Self {
            table,
            state,
            output,
        }
    }

    /// Emit one sample and advance the cursor
    ///
    /// Does nothing while the player is reconfiguring or stopped.
    #[inline]
    pub fn on_tick(&self) {
        let gate = self.state.gate();
        if !gate.try_enter() {
            return;
        }

        let cursor = self.state.cursor();
        self.output.write(self.table.sample_at(cursor));

        let next = cursor + 1;
        self.state.advance(if next == N { 0 } else { next });

        gate.leave();
    }
}

impl<const N: usize, O: SampleOutput> Clone for TickHandler<'_, N, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const N: usize, O: SampleOutput> Copy for TickHandler<'_, N, O> {}

/// Control-side half of the player, owns the timer
pub struct SamplePlayer<'a, const N: usize, T: PeriodicTimer, O: SampleOutput> {
    table: &'a WaveTable<N>,
    state: &'a PlaybackState,
    output: &'a O,
    timer: T,
}

impl<'a, const N: usize, T: PeriodicTimer, O: SampleOutput> SamplePlayer<'a, N, T, O> {
    /// Take ownership of the timer and start playback at `initial_freq_hz`
    ///
    /// The cursor is reset to 0. A non-positive initial frequency leaves the
    /// timer masked and writes the rest code once.
    ///
    /// # Errors
    ///
    /// Timer failure while arming. The output is left at rest.
    pub fn start(
        table: &'a WaveTable<N>,
        state: &'a PlaybackState,
        output: &'a O,
        timer: T,
        initial_freq_hz: f32,
    ) -> Result<Self, T::Error> {
        let mut player = Self {
            table,
            state,
            output,
            timer,
        };

        player.timer.disable()?;
        state.gate().close();
        state.publish(0);
        // Gate closed and timer masked: nobody else writes the cursor now
        state.advance(0);

        player.reconfigure(initial_freq_hz)?;
        Ok(player)
    }

    /// Switch to `freq_hz`, or stop if it is not positive
    ///
    /// Atomic with respect to playback: no tick executes between masking and
    /// re-enabling. The phase cursor is preserved.
    ///
    /// # Errors
    ///
    /// Timer failure. The player falls back to [`PlayerState::Stopped`].
    pub fn reconfigure(&mut self, freq_hz: f32) -> Result<PlayerState, T::Error> {
        let masked = self.timer.disable();
        self.state.gate().close();
        if let Err(err) = masked {
            self.rest();
            return Err(err);
        }

        let Some(period) = NonZeroU32::new(period_for(freq_hz, N)) else {
            self.rest();
            crate::rt_info!(current_log_stream(), timestamp_us(), "stop: {} Hz, output at rest", freq_hz);
            return Ok(PlayerState::Stopped);
        };

        if let Err(err) = self.timer.arm(period) {
            self.rest();
            crate::rt_error!(current_log_stream(), timestamp_us(), "timer arm failed: {:?}", err);
            return Err(err);
        }

        self.state.publish(period.get());
        self.state.gate().open();

        if let Err(err) = self.timer.enable() {
            self.state.gate().close();
            let _ = self.timer.disable();
            self.rest();
            crate::rt_error!(current_log_stream(), timestamp_us(), "timer enable failed: {:?}", err);
            return Err(err);
        }

        crate::rt_info!(
            current_log_stream(),
            timestamp_us(),
            "freq {} Hz -> period {} us",
            freq_hz,
            period
        );
        Ok(PlayerState::Running {
            period_us: period.get(),
        })
    }

    /// Current state
    pub fn state(&self) -> PlayerState {
        self.state.player_state()
    }

    /// Current phase cursor
    pub fn cursor(&self) -> usize {
        self.state.cursor()
    }

    /// Table being played
    pub fn table(&self) -> &'a WaveTable<N> {
        self.table
    }

    /// Handler to attach to the timer interrupt
    pub fn tick_handler(&self) -> TickHandler<'a, N, O> {
        TickHandler::new(self.table, self.state, self.output)
    }

    /// Borrow the timer (diagnostics)
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Publish "stopped" and hold the output at the rest code.
    /// Caller has already closed the gate.
    fn rest(&mut self) {
        self.state.publish(0);
        self.output.write(self.table.rest_code());
    }
}
