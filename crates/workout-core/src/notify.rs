//! Outbound notifications from the timer.
//!
//! Sound, desktop notifications and the like live outside this crate and
//! implement [`NotificationPort`]. The timer treats every call as
//! fire-and-forget: an `Err` is logged and dropped, never allowed to stall
//! phase progression.

use chrono::Utc;

use crate::events::Event;
use crate::sequencer::PhaseKind;

pub type NotifyResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Receiver for timer transitions. Every hook defaults to a no-op.
pub trait NotificationPort {
    /// A countdown second (4, 3 or 2 seconds left) was reached.
    fn on_countdown_tick(&mut self, _phase_index: usize, _remaining_secs: u32) -> NotifyResult {
        Ok(())
    }

    /// The workout began with phase `phase_index`.
    fn on_phase_start(
        &mut self,
        _phase_index: usize,
        _kind: PhaseKind,
        _duration_secs: u32,
    ) -> NotifyResult {
        Ok(())
    }

    /// Phase `phase_index` ended. An ending rest means work is about to start.
    fn on_phase_end(&mut self, _phase_index: usize, _kind: PhaseKind) -> NotifyResult {
        Ok(())
    }

    fn on_pause(&mut self, _phase_index: usize, _remaining_secs: u32) -> NotifyResult {
        Ok(())
    }

    fn on_resume(&mut self, _phase_index: usize, _remaining_secs: u32) -> NotifyResult {
        Ok(())
    }

    fn on_workout_complete(&mut self, _elapsed_secs: u64) -> NotifyResult {
        Ok(())
    }
}

/// Silent port.
impl NotificationPort for () {}

impl<N: NotificationPort + ?Sized> NotificationPort for Box<N> {
    fn on_countdown_tick(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        (**self).on_countdown_tick(phase_index, remaining_secs)
    }

    fn on_phase_start(
        &mut self,
        phase_index: usize,
        kind: PhaseKind,
        duration_secs: u32,
    ) -> NotifyResult {
        (**self).on_phase_start(phase_index, kind, duration_secs)
    }

    fn on_phase_end(&mut self, phase_index: usize, kind: PhaseKind) -> NotifyResult {
        (**self).on_phase_end(phase_index, kind)
    }

    fn on_pause(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        (**self).on_pause(phase_index, remaining_secs)
    }

    fn on_resume(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        (**self).on_resume(phase_index, remaining_secs)
    }

    fn on_workout_complete(&mut self, elapsed_secs: u64) -> NotifyResult {
        (**self).on_workout_complete(elapsed_secs)
    }
}

/// Captures every notification as an [`Event`].
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Vec<Event>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take everything recorded so far.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Event names in order, handy for assertions.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(Event::name).collect()
    }
}

impl NotificationPort for RecordingNotifier {
    fn on_countdown_tick(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        self.events.push(Event::Countdown {
            phase_index,
            remaining_secs,
            at: Utc::now(),
        });
        Ok(())
    }

    fn on_phase_start(
        &mut self,
        phase_index: usize,
        kind: PhaseKind,
        duration_secs: u32,
    ) -> NotifyResult {
        self.events.push(Event::PhaseStarted {
            phase_index,
            kind,
            duration_secs,
            at: Utc::now(),
        });
        Ok(())
    }

    fn on_phase_end(&mut self, phase_index: usize, kind: PhaseKind) -> NotifyResult {
        self.events.push(Event::PhaseEnded {
            phase_index,
            kind,
            at: Utc::now(),
        });
        Ok(())
    }

    fn on_pause(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        self.events.push(Event::Paused {
            phase_index,
            remaining_secs,
            at: Utc::now(),
        });
        Ok(())
    }

    fn on_resume(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        self.events.push(Event::Resumed {
            phase_index,
            remaining_secs,
            at: Utc::now(),
        });
        Ok(())
    }

    fn on_workout_complete(&mut self, elapsed_secs: u64) -> NotifyResult {
        self.events.push(Event::WorkoutCompleted {
            elapsed_secs,
            at: Utc::now(),
        });
        Ok(())
    }
}

/// Wraps a port and swallows every call while muted.
#[derive(Debug, Clone, Default)]
pub struct MutedNotifier<N> {
    inner: N,
    muted: bool,
}

impl<N> MutedNotifier<N> {
    pub fn new(inner: N, muted: bool) -> Self {
        Self { inner, muted }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip the mute flag, returning the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut N {
        &mut self.inner
    }
}

impl<N: NotificationPort> NotificationPort for MutedNotifier<N> {
    fn on_countdown_tick(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        if self.muted {
            return Ok(());
        }
        self.inner.on_countdown_tick(phase_index, remaining_secs)
    }

    fn on_phase_start(
        &mut self,
        phase_index: usize,
        kind: PhaseKind,
        duration_secs: u32,
    ) -> NotifyResult {
        if self.muted {
            return Ok(());
        }
        self.inner.on_phase_start(phase_index, kind, duration_secs)
    }

    fn on_phase_end(&mut self, phase_index: usize, kind: PhaseKind) -> NotifyResult {
        if self.muted {
            return Ok(());
        }
        self.inner.on_phase_end(phase_index, kind)
    }

    fn on_pause(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        if self.muted {
            return Ok(());
        }
        self.inner.on_pause(phase_index, remaining_secs)
    }

    fn on_resume(&mut self, phase_index: usize, remaining_secs: u32) -> NotifyResult {
        if self.muted {
            return Ok(());
        }
        self.inner.on_resume(phase_index, remaining_secs)
    }

    fn on_workout_complete(&mut self, elapsed_secs: u64) -> NotifyResult {
        if self.muted {
            return Ok(());
        }
        self.inner.on_workout_complete(elapsed_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let mut n = RecordingNotifier::new();
        n.on_phase_start(0, PhaseKind::Work, 45).unwrap();
        n.on_countdown_tick(0, 4).unwrap();
        n.on_phase_end(0, PhaseKind::Work).unwrap();
        assert_eq!(n.names(), vec!["phase_started", "countdown", "phase_ended"]);
        assert_eq!(n.drain().len(), 3);
        assert!(n.events().is_empty());
    }

    #[test]
    fn muted_swallows_everything() {
        let mut n = MutedNotifier::new(RecordingNotifier::new(), true);
        n.on_phase_start(0, PhaseKind::Work, 45).unwrap();
        n.on_pause(0, 10).unwrap();
        assert!(n.inner().events().is_empty());

        assert!(!n.toggle_mute());
        n.on_resume(0, 10).unwrap();
        assert_eq!(n.inner().names(), vec!["resumed"]);
    }
}
