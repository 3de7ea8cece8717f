//! Delayed-callback scheduling for the timer engine.
//!
//! The engine never sleeps. It asks a [`Scheduler`] to remember "run this
//! task after a delay" and later drains due tasks through
//! `WorkoutTimer::run_due`. Swapping the scheduler swaps the clock:
//! [`ManualScheduler`] for simulated time, [`WallScheduler`] for real time.

use std::time::{Duration, Instant};

/// Work the engine can schedule for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// One-second countdown step.
    Tick,
    /// One-second step of the pause counter.
    PauseTick,
}

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

pub trait Scheduler {
    /// Schedule `task` to become due after `delay`.
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TaskToken;

    /// Cancel a scheduled task. Unknown or already-fired tokens are ignored.
    fn cancel(&mut self, token: TaskToken);

    /// Remove and return the earliest task whose deadline has passed.
    fn pop_due(&mut self) -> Option<TimerTask>;

    /// Tasks currently outstanding, earliest first.
    fn pending(&self) -> Vec<TimerTask>;
}

#[derive(Debug, Clone)]
struct Entry {
    token: TaskToken,
    deadline: Duration,
    task: TimerTask,
}

/// Deadline-ordered task list shared by both schedulers.
///
/// Deadlines are offsets from the scheduler's own origin.
#[derive(Debug, Clone, Default)]
struct TaskQueue {
    next_token: u64,
    entries: Vec<Entry>,
}

impl TaskQueue {
    fn push(&mut self, deadline: Duration, task: TimerTask) -> TaskToken {
        self.next_token += 1;
        let token = TaskToken(self.next_token);
        // Stable insert keeps FIFO order among equal deadlines.
        let at = self
            .entries
            .iter()
            .position(|e| e.deadline > deadline)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, Entry { token, deadline, task });
        token
    }

    fn cancel(&mut self, token: TaskToken) {
        self.entries.retain(|e| e.token != token);
    }

    fn pop_due(&mut self, now: Duration) -> Option<TimerTask> {
        match self.entries.first() {
            Some(e) if e.deadline <= now => Some(self.entries.remove(0).task),
            _ => None,
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    fn tasks(&self) -> Vec<TimerTask> {
        self.entries.iter().map(|e| e.task).collect()
    }
}

/// Simulated clock. Time only moves when [`ManualScheduler::advance`] is called.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: TaskQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TaskToken {
        self.queue.push(self.now + delay, task)
    }

    fn cancel(&mut self, token: TaskToken) {
        self.queue.cancel(token);
    }

    fn pop_due(&mut self) -> Option<TimerTask> {
        self.queue.pop_due(self.now)
    }

    fn pending(&self) -> Vec<TimerTask> {
        self.queue.tasks()
    }
}

/// Monotonic wall clock based on [`Instant`].
#[derive(Debug, Clone)]
pub struct WallScheduler {
    origin: Instant,
    queue: TaskQueue,
}

impl WallScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: TaskQueue::default(),
        }
    }

    /// When the earliest outstanding task becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.next_deadline().map(|d| self.origin + d)
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for WallScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for WallScheduler {
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TaskToken {
        let deadline = self.elapsed() + delay;
        self.queue.push(deadline, task)
    }

    fn cancel(&mut self, token: TaskToken) {
        self.queue.cancel(token);
    }

    fn pop_due(&mut self) -> Option<TimerTask> {
        let now = self.elapsed();
        self.queue.pop_due(now)
    }

    fn pending(&self) -> Vec<TimerTask> {
        self.queue.tasks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn task_is_not_due_early() {
        let mut s = ManualScheduler::new();
        s.schedule(SEC, TimerTask::Tick);
        s.advance(Duration::from_millis(999));
        assert_eq!(s.pop_due(), None);
        s.advance(Duration::from_millis(1));
        assert_eq!(s.pop_due(), Some(TimerTask::Tick));
        assert_eq!(s.pop_due(), None);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut s = ManualScheduler::new();
        let token = s.schedule(SEC, TimerTask::Tick);
        s.cancel(token);
        s.advance(SEC * 5);
        assert_eq!(s.pop_due(), None);
        assert!(s.pending().is_empty());
    }

    #[test]
    fn earliest_deadline_first() {
        let mut s = ManualScheduler::new();
        s.schedule(SEC * 2, TimerTask::PauseTick);
        s.schedule(SEC, TimerTask::Tick);
        assert_eq!(s.next_deadline(), Some(SEC));
        s.advance(SEC * 2);
        assert_eq!(s.pop_due(), Some(TimerTask::Tick));
        assert_eq!(s.pop_due(), Some(TimerTask::PauseTick));
    }

    #[test]
    fn cancel_of_stale_token_is_harmless() {
        let mut s = ManualScheduler::new();
        let old = s.schedule(SEC, TimerTask::Tick);
        s.advance(SEC);
        assert_eq!(s.pop_due(), Some(TimerTask::Tick));
        s.schedule(SEC, TimerTask::Tick);
        s.cancel(old);
        assert_eq!(s.pending(), vec![TimerTask::Tick]);
    }

    #[test]
    fn wall_scheduler_reports_deadline() {
        let mut s = WallScheduler::new();
        assert!(s.next_deadline().is_none());
        s.schedule(Duration::from_secs(60), TimerTask::Tick);
        assert!(s.next_deadline().unwrap() > Instant::now());
        assert_eq!(s.pop_due(), None);
    }
}
