//! Frequency requests from the console to the main loop.
//!
//! The console posts, the main loop takes. Each request is consumed exactly
//! once; a newer request replaces one that was not yet taken.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::GeneratorConfig;
use crate::fault::{FaultCode, FaultState};
use crate::logging::{current_log_stream, timestamp_us};
use crate::player::{PeriodicTimer, PlayerState, SampleOutput, SamplePlayer};

/// Validated frequency request (finite, non-negative Hz)
///
/// 0 Hz means "silence output".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRequest(f32);

impl FrequencyRequest {
    /// Stop request
    pub const STOP: Self = Self(0.0);

    /// Validate a frequency. Negative, NaN and infinite values are refused.
    pub fn new(hz: f32) -> Option<Self> {
        if !hz.is_finite() || hz < 0.0 {
            return None;
        }
        // Fold -0.0 into 0.0
        Some(Self(if hz == 0.0 { 0.0 } else { hz }))
    }

    /// Frequency in Hz
    #[inline]
    pub fn hz(self) -> f32 {
        self.0
    }

    /// True for a stop request
    #[inline]
    pub fn is_stop(self) -> bool {
        self.0 == 0.0
    }
}

/// Empty-slot marker. A NaN bit pattern, so never a valid request.
const EMPTY: u32 = u32::MAX;

/// Single-slot, lock-free request mailbox
pub struct RequestSlot {
    slot: AtomicU32,
}

impl RequestSlot {
    /// Create empty slot
    pub const fn new() -> Self {
        Self {
            slot: AtomicU32::new(EMPTY),
        }
    }

    /// Post a request.
    ///
    /// Returns `true` if an unconsumed request was replaced.
    pub fn post(&self, request: FrequencyRequest) -> bool {
        self.slot.swap(request.0.to_bits(), Ordering::AcqRel) != EMPTY
    }

    /// Take the pending request, if any
    pub fn take(&self) -> Option<FrequencyRequest> {
        let bits = self.slot.swap(EMPTY, Ordering::AcqRel);
        if bits == EMPTY {
            return None;
        }
        Some(FrequencyRequest(f32::from_bits(bits)))
    }

    /// True if a request is waiting
    pub fn is_pending(&self) -> bool {
        self.slot.load(Ordering::Acquire) != EMPTY
    }
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one request to the player (main loop side)
///
/// Success clears any latched fault and records the new settings.
/// A timer failure latches [`FaultCode::TimerFault`]; the player has
/// already fallen back to rest.
pub fn apply_request<const N: usize, T: PeriodicTimer, O: SampleOutput>(
    player: &mut SamplePlayer<'_, N, T, O>,
    request: FrequencyRequest,
    config: &GeneratorConfig,
    fault: &FaultState,
) -> PlayerState {
    match player.reconfigure(request.hz()) {
        Ok(state) => {
            let period_us = match state {
                PlayerState::Running { period_us } => period_us,
                PlayerState::Stopped => 0,
            };
            config.record(request.hz(), period_us);
            fault.clear();
            state
        }
        Err(err) => {
            config.record(request.hz(), 0);
            fault.set(FaultCode::TimerFault, request.hz() as u32);
            crate::rt_warn!(
                current_log_stream(),
                timestamp_us(),
                "request {} Hz failed ({:?}), output at rest",
                request.hz(),
                err
            );
            PlayerState::Stopped
        }
    }
}
