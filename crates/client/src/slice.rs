//! Per-slice run gating.
//!
//! Each optimizer run feeds a disjoint slice of the plan (spot vs benefit vs
//! bonus), so no locking is needed across slices. Within one slice, two
//! rules hold: at most one run is in flight, and a stopped run never updates
//! the plan. Stopping does not cancel the in-flight request — it only
//! suppresses the late-arriving result.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one accepted run of a slice. Results are applied only while
/// the token is still current and the slice has not been stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

#[derive(Debug, Default)]
struct GateState {
    processing: AtomicBool,
    stopped: AtomicBool,
    run: AtomicU64,
}

/// The `is_processing` gate + `stopped` flag for one slice.
#[derive(Debug, Clone, Default)]
pub struct SliceGate {
    state: Arc<GateState>,
}

impl SliceGate {
    pub fn new() -> Self {
        SliceGate::default()
    }

    /// Claim the slice for a new run. Fails while another run on the same
    /// slice is still in flight.
    pub fn begin(&self) -> Option<RunToken> {
        if self
            .state
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        self.state.stopped.store(false, Ordering::Release);
        let run = self.state.run.fetch_add(1, Ordering::AcqRel) + 1;
        Some(RunToken(run))
    }

    pub fn is_processing(&self) -> bool {
        self.state.processing.load(Ordering::Acquire)
    }

    /// User-triggered stop. The network request keeps running; its result
    /// will be rejected by [`SliceGate::accept`].
    pub fn stop(&self) {
        self.state.stopped.store(true, Ordering::Release);
        self.state.processing.store(false, Ordering::Release);
    }

    /// Whether the finished run's result may be applied to the plan. A
    /// current token releases the gate; a stale one cannot touch a newer run.
    pub fn accept(&self, token: RunToken) -> bool {
        let current = self.state.run.load(Ordering::Acquire);
        if token.0 != current {
            return false;
        }
        let stopped = self.state.stopped.load(Ordering::Acquire);
        self.state.processing.store(false, Ordering::Release);
        !stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_run_per_slice() {
        let gate = SliceGate::new();
        let token = gate.begin().expect("first run starts");
        assert!(gate.is_processing());
        assert!(gate.begin().is_none(), "no second run while in flight");
        assert!(gate.accept(token));
        assert!(!gate.is_processing());
        assert!(gate.begin().is_some(), "gate reopens after the run lands");
    }

    #[test]
    fn stopped_run_never_applies() {
        let gate = SliceGate::new();
        let token = gate.begin().unwrap();
        gate.stop();
        // The late-arriving response is suppressed.
        assert!(!gate.accept(token));
    }

    #[test]
    fn result_from_a_previous_run_is_rejected() {
        let gate = SliceGate::new();
        let stale = gate.begin().unwrap();
        gate.stop();
        let fresh = gate.begin().unwrap();
        assert!(!gate.accept(stale), "stale token rejected");
        // The stale result did not release the fresh run's gate.
        assert!(gate.is_processing());
        assert!(gate.accept(fresh));
    }

    #[test]
    fn slices_are_independent() {
        let spot = SliceGate::new();
        let bonus = SliceGate::new();
        let spot_token = spot.begin().unwrap();
        let bonus_token = bonus.begin().unwrap();
        spot.stop();
        assert!(!spot.accept(spot_token));
        assert!(bonus.accept(bonus_token), "other slices unaffected");
    }
}
