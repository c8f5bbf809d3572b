//! Playback state shared between the tick ISR and the control context.
//!
//! # Ownership
//!
//! ```text
//! Field        Writer            Reader
//! ─────        ──────            ──────
//! cursor       tick ISR only     tick ISR, status
//! period_us    reconfigure       status
//! running      reconfigure       status
//! gate         both (CAS)        both
//! ```
//!
//! Single writer per field, so plain atomics suffice. The gate is the one
//! point of mutual exclusion: reconfigure closes it before touching the
//! timer and reopens it only once the new period is armed.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, AtomicUsize, Ordering};

/// Observable player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Timer disarmed, output held at the rest code
    Stopped,
    /// Timer armed, one table entry per `period_us`
    Running { period_us: u32 },
}

const GATE_CLOSED: u8 = 0;
const GATE_OPEN: u8 = 1;
const GATE_BUSY: u8 = 2;

/// Tick gate: Closed, Open, or Busy (a tick is executing).
///
/// Masks the tick handler cooperatively. On hardware this backs up the
/// interrupt mask and covers an ISR still running on the other core.
pub struct TickGate {
    state: AtomicU8,
}

impl TickGate {
    /// Create closed gate
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(GATE_CLOSED),
        }
    }

    /// Enter a tick. Returns false if the gate is closed.
    #[inline]
    pub fn try_enter(&self) -> bool {
        self.state
            .compare_exchange(GATE_OPEN, GATE_BUSY, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Leave a tick entered with [`TickGate::try_enter`]
    #[inline]
    pub fn leave(&self) {
        self.state.store(GATE_OPEN, Ordering::Release);
    }

    /// Close the gate, waiting for an in-flight tick to finish.
    pub fn close(&self) {
        loop {
            match self.state.compare_exchange_weak(
                GATE_OPEN,
                GATE_CLOSED,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(GATE_CLOSED) => return,
                Err(_) => core::hint::spin_loop(),
            }
        }
    }

    /// Open the gate
    #[inline]
    pub fn open(&self) {
        self.state.store(GATE_OPEN, Ordering::Release);
    }

    /// True if ticks are currently admitted
    #[inline]
    pub fn is_open(&self) -> bool {
        self.state.load(Ordering::Acquire) != GATE_CLOSED
    }
}

impl Default for TickGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared playback state
pub struct PlaybackState {
    /// Phase cursor, index into the wave table
    cursor: AtomicUsize,
    /// Current tick period, 0 = stopped
    period_us: AtomicU32,
    running: AtomicBool,
    gate: TickGate,
}

impl PlaybackState {
    /// Create stopped state at phase 0
    pub const fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
            period_us: AtomicU32::new(0),
            running: AtomicBool::new(false),
            gate: TickGate::new(),
        }
    }

    /// Current phase cursor
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Current period in µs (0 when stopped)
    #[inline]
    pub fn period_us(&self) -> u32 {
        self.period_us.load(Ordering::Acquire)
    }

    /// True while the timer is armed
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Snapshot as [`PlayerState`]
    pub fn player_state(&self) -> PlayerState {
        if self.is_running() {
            PlayerState::Running {
                period_us: self.period_us(),
            }
        } else {
            PlayerState::Stopped
        }
    }

    #[inline]
    pub(crate) fn gate(&self) -> &TickGate {
        &self.gate
    }

    /// Tick side: store the next cursor value. Only the tick handler calls this.
    #[inline]
    pub(crate) fn advance(&self, next: usize) {
        self.cursor.store(next, Ordering::Relaxed);
    }

    /// Control side: publish a new period (0 = stopped)
    pub(crate) fn publish(&self, period_us: u32) {
        self.period_us.store(period_us, Ordering::Release);
        self.running.store(period_us > 0, Ordering::Release);
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
