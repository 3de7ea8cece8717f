//! Workout timer engine.
//!
//! A single-threaded, suspendable countdown. The engine does not sleep or
//! spawn anything: it asks its [`Scheduler`] for one-second wakeups and the
//! driver feeds due tasks back through [`WorkoutTimer::run_due`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Complete
//!   ^                                           |
//!   +------------------ start() ----------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = WorkoutTimer::new(catalog, settings, WallScheduler::new(), notifier);
//! timer.start();
//! // In a loop, once the scheduler's next deadline passes:
//! timer.run_due();
//! ```
//!
//! At most one countdown tick is outstanding at any time, and the pause
//! counter is only scheduled while the countdown is not. Every transition
//! cancels what it supersedes before mutating state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::scheduler::{ManualScheduler, Scheduler, TaskToken, TimerTask};
use crate::catalog::{Exercise, ExerciseCatalog};
use crate::duration::{effective_duration, phase_durations, total_duration};
use crate::notify::{NotificationPort, NotifyResult};
use crate::sequencer::{
    elapsed_at_phase_start, exercise_index_for, last_phase_index, previous_work_phase, PhaseKind,
};
use crate::settings::Settings;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Seconds-left values that trigger a countdown notification.
const COUNTDOWN_SECONDS: std::ops::RangeInclusive<u32> = 2..=4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Complete,
}

/// Read-only copy of the timer state for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub current_phase_index: usize,
    pub phase_kind: PhaseKind,
    pub time_left: u32,
    pub is_paused: bool,
    pub elapsed_time: u64,
    pub pause_elapsed: u64,
    pub started: bool,
    pub complete: bool,
    pub total_duration: u64,
    pub last_phase_index: usize,
}

/// Core workout state machine.
///
/// Generic over the clock (`S`) and the notification sink (`N`).
#[derive(Debug)]
pub struct WorkoutTimer<S: Scheduler, N: NotificationPort> {
    catalog: ExerciseCatalog,
    settings: Settings,
    scheduler: S,
    notifier: N,
    current_phase_index: usize,
    /// Seconds left in the current phase.
    time_left: u32,
    is_paused: bool,
    /// Seconds since workout start, excluding paused time.
    elapsed_time: u64,
    /// Seconds spent in the current pause.
    pause_elapsed: u64,
    started: bool,
    complete: bool,
    tick_token: Option<TaskToken>,
    pause_token: Option<TaskToken>,
}

impl<S: Scheduler, N: NotificationPort> WorkoutTimer<S, N> {
    /// Create an idle timer showing the first phase's duration.
    pub fn new(catalog: ExerciseCatalog, settings: Settings, scheduler: S, notifier: N) -> Self {
        let time_left = effective_duration(
            0,
            catalog.exercises(),
            settings.rest_duration,
            settings.duration_multiplier,
        );
        Self {
            catalog,
            settings,
            scheduler,
            notifier,
            current_phase_index: 0,
            time_left,
            is_paused: false,
            elapsed_time: 0,
            pause_elapsed: 0,
            started: false,
            complete: false,
            tick_token: None,
            pause_token: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.complete {
            TimerState::Complete
        } else if !self.started {
            TimerState::Idle
        } else if self.is_paused {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    pub fn current_phase_index(&self) -> usize {
        self.current_phase_index
    }

    pub fn phase_kind(&self) -> PhaseKind {
        PhaseKind::of(self.current_phase_index)
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn elapsed_time(&self) -> u64 {
        self.elapsed_time
    }

    pub fn pause_elapsed(&self) -> u64 {
        self.pause_elapsed
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn last_phase_index(&self) -> usize {
        last_phase_index(self.catalog.len())
    }

    /// Exercise for the current phase (the upcoming one during rest is `next_exercise`).
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.catalog.get(exercise_index_for(self.current_phase_index))
    }

    pub fn next_exercise(&self) -> Option<&Exercise> {
        self.catalog
            .get(exercise_index_for(self.current_phase_index) + 1)
    }

    /// Effective durations of every phase under the live settings.
    pub fn phase_durations(&self) -> Vec<u32> {
        phase_durations(self.catalog.exercises(), &self.settings)
    }

    /// Whole-workout duration under the live settings.
    pub fn total_duration(&self) -> u64 {
        total_duration(self.catalog.exercises(), &self.settings)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state(),
            current_phase_index: self.current_phase_index,
            phase_kind: self.phase_kind(),
            time_left: self.time_left,
            is_paused: self.is_paused,
            elapsed_time: self.elapsed_time,
            pause_elapsed: self.pause_elapsed,
            started: self.started,
            complete: self.complete,
            total_duration: self.total_duration(),
            last_phase_index: self.last_phase_index(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or restart) the workout from phase 0.
    pub fn start(&mut self) {
        self.cancel_tick();
        self.cancel_pause_counter();

        self.current_phase_index = 0;
        self.elapsed_time = 0;
        self.pause_elapsed = 0;
        self.is_paused = false;
        self.complete = false;
        self.time_left = self.duration_of(0);
        self.started = true;

        info!(
            exercises = self.catalog.len(),
            total_secs = self.total_duration(),
            "workout started"
        );
        let duration = self.time_left;
        self.notify(|n| n.on_phase_start(0, PhaseKind::Work, duration));
        self.enter_phase();
    }

    /// Pause a running workout. No-op unless running.
    pub fn pause(&mut self) {
        if !self.started || self.complete || self.is_paused {
            return;
        }
        self.cancel_tick();
        self.is_paused = true;
        self.pause_elapsed = 0;
        self.pause_token = Some(self.scheduler.schedule(ONE_SECOND, TimerTask::PauseTick));

        debug!(phase = self.current_phase_index, time_left = self.time_left, "paused");
        let (phase, left) = (self.current_phase_index, self.time_left);
        self.notify(|n| n.on_pause(phase, left));
    }

    /// Resume a paused workout, keeping the remaining time. No-op unless paused.
    pub fn resume(&mut self) {
        if !self.is_paused {
            return;
        }
        self.cancel_pause_counter();
        self.is_paused = false;
        self.pause_elapsed = 0;

        debug!(phase = self.current_phase_index, time_left = self.time_left, "resumed");
        let (phase, left) = (self.current_phase_index, self.time_left);
        self.notify(|n| n.on_resume(phase, left));
        self.enter_phase();
    }

    /// Pause when running, resume when paused.
    pub fn toggle_pause(&mut self) {
        if self.is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// End the current phase immediately.
    ///
    /// `kind` names the phase the caller means to skip; a mismatch (for
    /// example a stale "skip rest" after the rest already ran out) is a no-op.
    /// The unused remainder counts as elapsed so the running total stays
    /// consistent.
    pub fn skip(&mut self, kind: PhaseKind) {
        if !self.started || self.complete {
            return;
        }
        if kind != self.phase_kind() {
            debug!(
                requested = kind.as_str(),
                actual = self.phase_kind().as_str(),
                "skip ignored for mismatched phase"
            );
            return;
        }
        self.cancel_tick();
        self.cancel_pause_counter();

        let ended = self.current_phase_index;
        self.elapsed_time += u64::from(self.time_left);
        self.current_phase_index += 1;
        self.time_left = 0;
        self.is_paused = false;
        self.pause_elapsed = 0;

        debug!(from = ended, to = self.current_phase_index, "phase skipped");
        self.notify(|n| n.on_phase_end(ended, kind));
        self.enter_phase();
    }

    /// Rewind to the previous work phase with its full duration.
    ///
    /// Only allowed while paused; otherwise a no-op.
    pub fn go_back(&mut self) {
        if !self.is_paused {
            return;
        }
        self.cancel_tick();
        self.cancel_pause_counter();

        let from = self.current_phase_index;
        let target = previous_work_phase(from);
        let durations = self.phase_durations();

        self.current_phase_index = target;
        self.elapsed_time = elapsed_at_phase_start(target, &durations);
        self.time_left = durations.get(target).copied().unwrap_or(0);
        self.is_paused = false;
        self.pause_elapsed = 0;

        debug!(from, to = target, elapsed = self.elapsed_time, "rewound");
        self.enter_phase();
    }

    /// Replace the duration settings. Ignored while a workout is in progress.
    ///
    /// Returns whether the settings were applied.
    pub fn apply_settings(&mut self, settings: Settings) -> bool {
        if self.started {
            return false;
        }
        self.settings = settings;
        if !self.complete {
            self.time_left = self.duration_of(0);
        }
        true
    }

    /// Swap the routine (e.g. a freshly shuffled one). Ignored mid-workout.
    pub fn set_catalog(&mut self, catalog: ExerciseCatalog) -> bool {
        if self.started {
            return false;
        }
        self.catalog = catalog;
        if !self.complete {
            self.time_left = self.duration_of(0);
        }
        true
    }

    /// Run every task whose deadline has passed. Returns how many ran.
    pub fn run_due(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due() {
            self.run_task(task);
            ran += 1;
        }
        ran
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run_task(&mut self, task: TimerTask) {
        match task {
            TimerTask::Tick => {
                self.tick_token = None;
                self.tick();
            }
            TimerTask::PauseTick => {
                self.pause_token = None;
                self.tick_pause();
            }
        }
    }

    /// One second of countdown.
    fn tick(&mut self) {
        if !self.started || self.is_paused || self.complete {
            return;
        }

        self.time_left = self.time_left.saturating_sub(1);
        self.elapsed_time += 1;

        if COUNTDOWN_SECONDS.contains(&self.time_left) {
            let (phase, left) = (self.current_phase_index, self.time_left);
            self.notify(|n| n.on_countdown_tick(phase, left));
        }

        if self.time_left == 0 {
            let ended = self.current_phase_index;
            let kind = PhaseKind::of(ended);
            debug!(phase = ended, kind = kind.as_str(), "phase finished");
            self.notify(|n| n.on_phase_end(ended, kind));
            self.current_phase_index += 1;
            self.enter_phase();
            return;
        }

        self.schedule_tick();
    }

    fn tick_pause(&mut self) {
        if !self.is_paused {
            return;
        }
        self.pause_elapsed += 1;
        self.pause_token = Some(self.scheduler.schedule(ONE_SECOND, TimerTask::PauseTick));
    }

    /// Set up the current phase, or finish the workout past the last one.
    fn enter_phase(&mut self) {
        if self.current_phase_index > self.last_phase_index() {
            self.cancel_tick();
            self.cancel_pause_counter();
            self.complete = true;
            self.started = false;
            self.is_paused = false;
            self.time_left = 0;

            info!(elapsed_secs = self.elapsed_time, "workout complete");
            let elapsed = self.elapsed_time;
            self.notify(|n| n.on_workout_complete(elapsed));
            return;
        }

        // A skip or rewind may already have set the duration.
        if self.time_left == 0 {
            self.time_left = self.duration_of(self.current_phase_index);
        }
        self.schedule_tick();
    }

    fn schedule_tick(&mut self) {
        self.cancel_tick();
        self.tick_token = Some(self.scheduler.schedule(ONE_SECOND, TimerTask::Tick));
    }

    fn cancel_tick(&mut self) {
        if let Some(token) = self.tick_token.take() {
            self.scheduler.cancel(token);
        }
    }

    fn cancel_pause_counter(&mut self) {
        if let Some(token) = self.pause_token.take() {
            self.scheduler.cancel(token);
        }
    }

    fn duration_of(&self, phase_index: usize) -> u32 {
        effective_duration(
            phase_index,
            self.catalog.exercises(),
            self.settings.rest_duration,
            self.settings.duration_multiplier,
        )
    }

    fn notify(&mut self, call: impl FnOnce(&mut N) -> NotifyResult) {
        if let Err(e) = call(&mut self.notifier) {
            warn!(error = %e, "notification failed, continuing");
        }
    }
}

impl<N: NotificationPort> WorkoutTimer<ManualScheduler, N> {
    /// Move simulated time forward one second at a time, running due tasks.
    pub fn advance_secs(&mut self, secs: u64) {
        for _ in 0..secs {
            self.scheduler.advance(ONE_SECOND);
            self.run_due();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Exercise;
    use crate::events::Event;
    use crate::notify::RecordingNotifier;

    type TestTimer = WorkoutTimer<ManualScheduler, RecordingNotifier>;

    fn timer() -> TestTimer {
        let catalog = ExerciseCatalog::new(vec![
            Exercise::new("A", "", 45),
            Exercise::new("B", "", 40),
            Exercise::new("C", "", 60),
        ])
        .unwrap();
        WorkoutTimer::new(
            catalog,
            Settings::default(),
            ManualScheduler::new(),
            RecordingNotifier::new(),
        )
    }

    #[test]
    fn idle_before_start() {
        let t = timer();
        assert_eq!(t.state(), TimerState::Idle);
        assert_eq!(t.time_left(), 45);
        assert!(t.scheduler().pending().is_empty());
    }

    #[test]
    fn start_schedules_one_tick() {
        let mut t = timer();
        t.start();
        assert_eq!(t.state(), TimerState::Running);
        assert_eq!(t.scheduler().pending(), vec![TimerTask::Tick]);
        assert_eq!(t.notifier().names(), vec!["phase_started"]);
    }

    #[test]
    fn tick_counts_down() {
        let mut t = timer();
        t.start();
        t.advance_secs(10);
        assert_eq!(t.time_left(), 35);
        assert_eq!(t.elapsed_time(), 10);
    }

    #[test]
    fn phase_rolls_over_to_rest() {
        let mut t = timer();
        t.start();
        t.advance_secs(45);
        assert_eq!(t.current_phase_index(), 1);
        assert_eq!(t.phase_kind(), PhaseKind::Rest);
        assert_eq!(t.time_left(), 30);
        assert_eq!(t.elapsed_time(), 45);
    }

    #[test]
    fn countdown_fires_at_four_three_two() {
        let mut t = timer();
        t.start();
        t.advance_secs(45);
        let countdowns: Vec<u32> = t
            .notifier()
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Countdown { remaining_secs, .. } => Some(*remaining_secs),
                _ => None,
            })
            .collect();
        assert_eq!(countdowns, vec![4, 3, 2]);
    }

    #[test]
    fn pause_stops_the_countdown() {
        let mut t = timer();
        t.start();
        t.advance_secs(5);
        t.pause();
        assert_eq!(t.scheduler().pending(), vec![TimerTask::PauseTick]);
        t.advance_secs(20);
        assert_eq!(t.time_left(), 40);
        assert_eq!(t.elapsed_time(), 5);
        assert_eq!(t.pause_elapsed(), 20);
    }

    #[test]
    fn resume_keeps_time_left() {
        let mut t = timer();
        t.start();
        t.advance_secs(5);
        t.pause();
        t.advance_secs(3);
        t.resume();
        assert_eq!(t.pause_elapsed(), 0);
        assert_eq!(t.time_left(), 40);
        assert_eq!(t.scheduler().pending(), vec![TimerTask::Tick]);
        t.advance_secs(1);
        assert_eq!(t.time_left(), 39);
    }

    #[test]
    fn pause_while_idle_is_noop() {
        let mut t = timer();
        t.toggle_pause();
        assert!(!t.is_paused());
        assert!(t.scheduler().pending().is_empty());
        assert!(t.notifier().events().is_empty());
    }

    #[test]
    fn skip_adds_remaining_time() {
        let mut t = timer();
        t.start();
        t.advance_secs(5);
        let before = t.elapsed_time() + u64::from(t.time_left());
        t.skip(PhaseKind::Work);
        assert_eq!(t.elapsed_time(), before);
        assert_eq!(t.current_phase_index(), 1);
        assert_eq!(t.time_left(), 30);
    }

    #[test]
    fn skip_with_wrong_kind_is_ignored() {
        let mut t = timer();
        t.start();
        t.skip(PhaseKind::Rest);
        assert_eq!(t.current_phase_index(), 0);
    }

    #[test]
    fn go_back_requires_pause() {
        let mut t = timer();
        t.start();
        t.skip(PhaseKind::Work);
        t.go_back();
        assert_eq!(t.current_phase_index(), 1);
    }

    #[test]
    fn completion_is_terminal() {
        let mut t = timer();
        t.start();
        t.advance_secs(205);
        assert_eq!(t.state(), TimerState::Complete);
        assert_eq!(t.time_left(), 0);
        assert!(!t.is_started());
        assert!(t.scheduler().pending().is_empty());
        assert_eq!(t.elapsed_time(), 205);
        t.advance_secs(10);
        assert_eq!(t.elapsed_time(), 205);
    }

    #[test]
    fn settings_locked_during_workout() {
        let mut t = timer();
        t.start();
        assert!(!t.apply_settings(Settings::new(10, 2.0).unwrap()));
        assert_eq!(t.settings().rest_duration, 30);
    }

    #[test]
    fn settings_change_before_start_updates_first_phase() {
        let mut t = timer();
        assert!(t.apply_settings(Settings::new(10, 0.5).unwrap()));
        assert_eq!(t.time_left(), 23);
        assert_eq!(t.total_duration(), 23 + 10 + 20 + 10 + 30);
    }
}
