//! Visibility-driven frame scheduling state machine.
//!
//! ```text
//!            shouldAnimate                  detach
//!   Stopped ───────────────▶ Running ──────────────▶ TornDown
//!      ▲                        │                        ▲
//!      └──── !shouldAnimate ────┘                        │
//!      └────────────────────────── detach ───────────────┘
//! ```
//!
//! `Running` means exactly one frame callback is outstanding. The state is
//! derived from the pending handle, so "one outstanding callback" cannot
//! drift from the state.

use tracing::{debug, warn};

use crate::frame::{FrameHandle, FrameScheduler};
use crate::signals::{SignalChange, VisibilitySignals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// One frame callback is scheduled.
    Running,
    /// Nothing scheduled; the last frame stays on screen.
    Stopped,
    /// Detached. No further transitions.
    TornDown,
}

/// What a signal change did to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State did not change.
    Unchanged,
    /// Stopped → Running; a frame was requested.
    Started,
    /// Running → Stopped; the pending frame was cancelled. The caller draws
    /// one final frame when `final_render` is set.
    Stopped { final_render: bool },
    /// The scheduler is torn down and ignored the input.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct VisibilityScheduler {
    signals: VisibilitySignals,
    pending: Option<FrameHandle>,
    torn_down: bool,
}

impl VisibilityScheduler {
    /// A stopped scheduler holding `signals`. Call
    /// [`reconcile`](Self::reconcile) to act on them.
    pub fn new(signals: VisibilitySignals) -> Self {
        Self {
            signals,
            pending: None,
            torn_down: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.torn_down {
            SchedulerState::TornDown
        } else if self.pending.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn signals(&self) -> VisibilitySignals {
        self.signals
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Schedule a frame unless one is already pending. Returns whether a
    /// request was made.
    pub fn start<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) -> bool {
        if self.torn_down || self.pending.is_some() {
            return false;
        }
        let handle = frames.request_frame();
        debug!(%handle, "Animation started");
        self.pending = Some(handle);
        true
    }

    /// Cancel the pending frame, if any. The handle leaves the field before
    /// the cancel call, so a callback racing the cancel finds nothing to run.
    pub fn stop<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) -> bool {
        match self.pending.take() {
            Some(handle) => {
                frames.cancel_frame(handle);
                debug!(%handle, "Animation stopped");
                true
            }
            None => false,
        }
    }

    /// Bring the state in line with `should_animate`.
    pub fn reconcile<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) -> Transition {
        if self.torn_down {
            return Transition::Ignored;
        }
        let running = self.pending.is_some();
        match (self.signals.should_animate(), running) {
            (true, false) => {
                self.start(frames);
                Transition::Started
            }
            (false, true) => {
                self.stop(frames);
                Transition::Stopped { final_render: true }
            }
            _ => Transition::Unchanged,
        }
    }

    /// Record a signal change and react to it.
    pub fn update<F: FrameScheduler + ?Sized>(
        &mut self,
        change: SignalChange,
        frames: &mut F,
    ) -> Transition {
        if self.torn_down {
            warn!(?change, "Signal received after detach, ignoring");
            return Transition::Ignored;
        }
        self.signals.apply(change);
        let transition = self.reconcile(frames);
        debug!(?change, ?transition, state = ?self.state(), "Visibility signal");
        transition
    }

    /// Claim a fired frame. Returns `false` for a handle that is not the
    /// pending one (stale after a cancel) or after teardown.
    pub fn begin_frame(&mut self, handle: FrameHandle) -> bool {
        if self.torn_down {
            warn!(%handle, "Frame callback after detach, ignoring");
            return false;
        }
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            debug!(%handle, pending = ?self.pending, "Stale frame callback ignored");
            false
        }
    }

    /// Reschedule after a frame while animation should continue.
    pub fn end_frame<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
        if !self.torn_down && self.signals.should_animate() && self.pending.is_none() {
            self.pending = Some(frames.request_frame());
        }
    }

    /// Force Stopped and enter the terminal state. Idempotent.
    pub fn teardown<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
        if self.torn_down {
            return;
        }
        self.stop(frames);
        self.torn_down = true;
        debug!("Scheduler torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameQueue;

    fn running() -> (VisibilityScheduler, FrameQueue) {
        let mut frames = FrameQueue::new();
        let mut scheduler = VisibilityScheduler::new(VisibilitySignals::default());
        assert_eq!(scheduler.reconcile(&mut frames), Transition::Started);
        (scheduler, frames)
    }

    #[test]
    fn test_new_is_stopped() {
        let scheduler = VisibilityScheduler::new(VisibilitySignals::default());
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn test_double_start_schedules_once() {
        let (mut scheduler, mut frames) = running();
        assert!(!scheduler.start(&mut frames));
        assert_eq!(frames.requested_count(), 1);
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[test]
    fn test_stop_while_stopped_does_not_cancel() {
        let mut frames = FrameQueue::new();
        let mut scheduler = VisibilityScheduler::new(VisibilitySignals::default());
        assert!(!scheduler.stop(&mut frames));
        assert_eq!(frames.cancelled_count(), 0);
    }

    #[test]
    fn test_state_follows_every_signal_combination() {
        for bits in 0..8u8 {
            let (mut scheduler, mut frames) = running();
            for change in [
                SignalChange::Intersection(bits & 1 != 0),
                SignalChange::DocumentVisible(bits & 2 != 0),
                SignalChange::ReducedMotion(bits & 4 != 0),
            ] {
                scheduler.update(change, &mut frames);
                let expected = if scheduler.signals().should_animate() {
                    SchedulerState::Running
                } else {
                    SchedulerState::Stopped
                };
                assert_eq!(scheduler.state(), expected, "bits {bits:03b} after {change:?}");
                assert_eq!(frames.is_pending(), expected == SchedulerState::Running);
            }
        }
    }

    #[test]
    fn test_stop_requests_final_render_once() {
        let (mut scheduler, mut frames) = running();
        assert_eq!(
            scheduler.update(SignalChange::ReducedMotion(true), &mut frames),
            Transition::Stopped { final_render: true }
        );
        assert_eq!(
            scheduler.update(SignalChange::Intersection(false), &mut frames),
            Transition::Unchanged
        );
        assert_eq!(frames.cancelled_count(), 1);
    }

    #[test]
    fn test_frame_cycle_reschedules() {
        let (mut scheduler, mut frames) = running();
        let handle = frames.take_due().unwrap();
        assert!(scheduler.begin_frame(handle));
        scheduler.end_frame(&mut frames);
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(frames.requested_count(), 2);
    }

    #[test]
    fn test_stale_handle_ignored() {
        let (mut scheduler, mut frames) = running();
        let stale = scheduler.pending().unwrap();
        scheduler.update(SignalChange::DocumentVisible(false), &mut frames);
        scheduler.update(SignalChange::DocumentVisible(true), &mut frames);
        assert!(!scheduler.begin_frame(stale));
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[test]
    fn test_teardown_is_terminal() {
        let (mut scheduler, mut frames) = running();
        let handle = scheduler.pending().unwrap();
        scheduler.teardown(&mut frames);
        assert_eq!(scheduler.state(), SchedulerState::TornDown);
        assert!(!frames.is_pending());

        assert_eq!(
            scheduler.update(SignalChange::Intersection(true), &mut frames),
            Transition::Ignored
        );
        assert!(!scheduler.begin_frame(handle));
        scheduler.end_frame(&mut frames);
        assert!(!scheduler.start(&mut frames));
        assert_eq!(frames.requested_count(), 1);
        assert_eq!(scheduler.state(), SchedulerState::TornDown);
    }
}
