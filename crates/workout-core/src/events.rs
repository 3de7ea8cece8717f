use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sequencer::PhaseKind;

/// Every notification the timer sends can be captured as an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhaseStarted {
        phase_index: usize,
        kind: PhaseKind,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    Countdown {
        phase_index: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    PhaseEnded {
        phase_index: usize,
        kind: PhaseKind,
        at: DateTime<Utc>,
    },
    Paused {
        phase_index: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Resumed {
        phase_index: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::PhaseStarted { .. } => "phase_started",
            Event::Countdown { .. } => "countdown",
            Event::PhaseEnded { .. } => "phase_ended",
            Event::Paused { .. } => "paused",
            Event::Resumed { .. } => "resumed",
            Event::WorkoutCompleted { .. } => "workout_completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::PhaseEnded {
            phase_index: 3,
            kind: PhaseKind::Rest,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_ended");
        assert_eq!(json["kind"], "rest");
        assert_eq!(json["phase_index"], 3);
        assert_eq!(event.name(), "phase_ended");
    }
}
