//! Presentation projection.
//!
//! Everything a screen needs, derived on demand from the timer. Holds no
//! state of its own: build a fresh [`WorkoutView`] after every transition.

use serde::Serialize;

use crate::notify::NotificationPort;
use crate::sequencer::PhaseKind;
use crate::timer::{Scheduler, TimerSnapshot, TimerState, WorkoutTimer};

pub const WORKOUT_TITLE: &str = "Core & Back Workout";

/// Formats seconds as `MM:SS`. Minutes are not capped at 99.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutView {
    pub header_title: String,
    pub timer_display: String,
    pub round_info: String,
    pub total_time_remaining: String,
    pub pause_button_text: String,
    pub status_message: String,
    pub current_exercise: Option<String>,
    pub explanation: Option<String>,
    pub media_ref: Option<String>,
    pub next_exercise: Option<String>,
    pub snapshot: TimerSnapshot,
}

impl WorkoutView {
    pub fn from_timer<S: Scheduler, N: NotificationPort>(timer: &WorkoutTimer<S, N>) -> Self {
        let snapshot = timer.snapshot();
        let total = snapshot.total_duration;
        let rounds = timer.catalog().len();
        let exercise_num = snapshot.current_phase_index / 2 + 1;
        let current = timer.current_exercise();
        let next_name = timer.next_exercise().map(|e| e.name.clone());
        let active = snapshot.started && !snapshot.complete;

        let header_title = if !active {
            format!("{WORKOUT_TITLE} ({} Total)", format_time(total))
        } else {
            match snapshot.phase_kind {
                PhaseKind::Work => format!(
                    "EXERCISE {exercise_num} / {rounds}: {}",
                    current.map(|e| e.name.as_str()).unwrap_or_default()
                ),
                PhaseKind::Rest => format!(
                    "REST: Next Up - {}",
                    next_name.as_deref().unwrap_or("Cool Down")
                ),
            }
        };

        let timer_display = if snapshot.complete {
            "DONE".to_string()
        } else {
            format_time(u64::from(snapshot.time_left))
        };

        let round_info = match snapshot.state {
            TimerState::Complete => format!("Total Time: {}", format_time(total)),
            TimerState::Idle => "Ready".to_string(),
            _ => match snapshot.phase_kind {
                PhaseKind::Work => format!("Round {exercise_num} of {rounds}"),
                PhaseKind::Rest => "Transition to next exercise".to_string(),
            },
        };

        let total_time_remaining = format_time(total.saturating_sub(snapshot.elapsed_time));

        let pause_button_text = if snapshot.is_paused {
            format!("RESUME (Paused: {})", format_time(snapshot.pause_elapsed))
        } else {
            let left = format_time(u64::from(snapshot.time_left));
            match snapshot.phase_kind {
                PhaseKind::Work => format!("Pause ({left})"),
                PhaseKind::Rest => format!("Pause Rest ({left})"),
            }
        };

        let status_message = match snapshot.state {
            TimerState::Idle => "Click Start Workout to begin!",
            TimerState::Complete => "Workout Complete! Amazing job!",
            TimerState::Paused => "Workout Paused",
            TimerState::Running => match snapshot.phase_kind {
                PhaseKind::Work => "Focus on maintaining excellent form throughout the set.",
                PhaseKind::Rest => "Get into position for the next exercise quickly.",
            },
        }
        .to_string();

        Self {
            header_title,
            timer_display,
            round_info,
            total_time_remaining,
            pause_button_text,
            status_message,
            current_exercise: current.map(|e| e.name.clone()),
            explanation: current.map(|e| e.explanation.clone()),
            media_ref: current.and_then(|e| e.media_ref.clone()),
            next_exercise: next_name,
            snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Exercise, ExerciseCatalog};
    use crate::settings::Settings;
    use crate::timer::ManualScheduler;

    fn timer() -> WorkoutTimer<ManualScheduler, ()> {
        let catalog = ExerciseCatalog::new(vec![
            Exercise::new("Plank", "Hold.", 45),
            Exercise::new("Superman", "Lift.", 40),
            Exercise::new("Bird Dog", "Reach.", 60),
        ])
        .unwrap();
        WorkoutTimer::new(catalog, Settings::default(), ManualScheduler::new(), ())
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(870), "14:30");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn idle_view() {
        let view = WorkoutView::from_timer(&timer());
        assert_eq!(view.header_title, "Core & Back Workout (03:25 Total)");
        assert_eq!(view.round_info, "Ready");
        assert_eq!(view.timer_display, "00:45");
        assert_eq!(view.total_time_remaining, "03:25");
    }

    #[test]
    fn work_and_rest_headers() {
        let mut t = timer();
        t.start();
        let view = WorkoutView::from_timer(&t);
        assert_eq!(view.header_title, "EXERCISE 1 / 3: Plank");
        assert_eq!(view.round_info, "Round 1 of 3");
        assert_eq!(view.pause_button_text, "Pause (00:45)");

        t.advance_secs(45);
        let view = WorkoutView::from_timer(&t);
        assert_eq!(view.header_title, "REST: Next Up - Superman");
        assert_eq!(view.round_info, "Transition to next exercise");
        assert_eq!(view.pause_button_text, "Pause Rest (00:30)");
        assert_eq!(view.total_time_remaining, "02:40");
    }

    #[test]
    fn paused_view_shows_pause_counter() {
        let mut t = timer();
        t.start();
        t.pause();
        t.advance_secs(61);
        let view = WorkoutView::from_timer(&t);
        assert_eq!(view.pause_button_text, "RESUME (Paused: 01:01)");
        assert_eq!(view.status_message, "Workout Paused");
    }

    #[test]
    fn complete_view() {
        let mut t = timer();
        t.start();
        t.advance_secs(205);
        let view = WorkoutView::from_timer(&t);
        assert_eq!(view.timer_display, "DONE");
        assert_eq!(view.round_info, "Total Time: 03:25");
        assert_eq!(view.total_time_remaining, "00:00");
    }
}
