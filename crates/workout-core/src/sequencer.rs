//! Phase index arithmetic.
//!
//! A workout of N exercises has `2N - 1` phases. Even indices are work
//! phases (exercise `i / 2`), odd indices are the rests between them.
//!
//! ```text
//! index:  0     1     2     3     4
//!         W(0)  R     W(1)  R     W(2)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Work,
    Rest,
}

impl PhaseKind {
    pub fn of(phase_index: usize) -> Self {
        if is_work_phase(phase_index) {
            PhaseKind::Work
        } else {
            PhaseKind::Rest
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Work => "work",
            PhaseKind::Rest => "rest",
        }
    }
}

pub fn is_work_phase(phase_index: usize) -> bool {
    phase_index % 2 == 0
}

pub fn exercise_index_for(phase_index: usize) -> usize {
    phase_index / 2
}

/// `2N - 1`, or 0 for an empty routine.
pub fn total_phases(exercise_count: usize) -> usize {
    (exercise_count * 2).saturating_sub(1)
}

/// `2N - 2`. Callers guarantee `exercise_count >= 1`.
pub fn last_phase_index(exercise_count: usize) -> usize {
    (exercise_count * 2).saturating_sub(2)
}

/// Seconds elapsed at the start of `phase_index`: the sum of all earlier
/// phase durations.
pub fn elapsed_at_phase_start(phase_index: usize, durations: &[u32]) -> u64 {
    durations
        .iter()
        .take(phase_index)
        .map(|&d| u64::from(d))
        .sum()
}

/// Rewind target for "go back".
///
/// From a rest, return to the work phase just before it. From a work phase,
/// return to the previous work phase. Always lands on a work phase, and the
/// caller grants that phase its full duration again.
pub fn previous_work_phase(phase_index: usize) -> usize {
    if phase_index == 0 {
        0
    } else if phase_index % 2 == 1 {
        phase_index - 1
    } else {
        phase_index.saturating_sub(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scenario_three_exercises() {
        assert_eq!(total_phases(3), 5);
        assert_eq!(last_phase_index(3), 4);
        let durations = [45, 30, 40, 30, 60];
        assert_eq!(elapsed_at_phase_start(4, &durations), 145);
    }

    #[test]
    fn rewind_table() {
        assert_eq!(previous_work_phase(0), 0);
        assert_eq!(previous_work_phase(1), 0);
        assert_eq!(previous_work_phase(2), 0);
        assert_eq!(previous_work_phase(3), 2);
        assert_eq!(previous_work_phase(4), 2);
    }

    #[test]
    fn phase_kind_matches_parity() {
        assert_eq!(PhaseKind::of(0), PhaseKind::Work);
        assert_eq!(PhaseKind::of(7), PhaseKind::Rest);
    }

    proptest! {
        #[test]
        fn phase_counts(n in 2usize..500) {
            prop_assert_eq!(total_phases(n), 2 * n - 1);
            prop_assert_eq!(last_phase_index(n), 2 * n - 2);
        }

        #[test]
        fn index_mapping(i in 0usize..10_000) {
            prop_assert_eq!(is_work_phase(i), i % 2 == 0);
            prop_assert_eq!(exercise_index_for(i), i / 2);
        }

        #[test]
        fn elapsed_starts_at_zero(durations in prop::collection::vec(1u32..600, 0..40)) {
            prop_assert_eq!(elapsed_at_phase_start(0, &durations), 0);
        }

        #[test]
        fn elapsed_is_prefix_sum(
            durations in prop::collection::vec(1u32..600, 1..40),
            pick in any::<prop::sample::Index>(),
        ) {
            let i = pick.index(durations.len());
            prop_assert_eq!(
                elapsed_at_phase_start(i + 1, &durations),
                elapsed_at_phase_start(i, &durations) + u64::from(durations[i])
            );
        }

        #[test]
        fn rewind_lands_on_earlier_work_phase(i in 0usize..10_000) {
            let target = previous_work_phase(i);
            prop_assert!(is_work_phase(target));
            prop_assert!(target <= i);
        }
    }
}
