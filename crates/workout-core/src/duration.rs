//! Effective phase durations.
//!
//! Work phases scale with the duration multiplier; rest phases take the
//! rest setting verbatim. Nothing here is cached: settings may change
//! between workouts, so callers recompute from the live values.

use crate::catalog::Exercise;
use crate::sequencer::{exercise_index_for, is_work_phase};
use crate::settings::Settings;

/// Scale a base duration, rounding halves up.
///
/// `f64::round` rounds half away from zero, which for the positive values
/// seen here is half-up: 45 * 0.5 = 22.5 becomes 23.
pub fn scaled_duration(base: u32, multiplier: f64) -> u32 {
    (f64::from(base) * multiplier).round().max(0.0) as u32
}

/// Effective duration in seconds of phase `phase_index`.
///
/// Returns 0 for an index past the last work phase.
pub fn effective_duration(
    phase_index: usize,
    exercises: &[Exercise],
    rest_duration: u32,
    multiplier: f64,
) -> u32 {
    if is_work_phase(phase_index) {
        exercises
            .get(exercise_index_for(phase_index))
            .map(|e| scaled_duration(e.base_duration, multiplier))
            .unwrap_or(0)
    } else if exercise_index_for(phase_index) + 1 < exercises.len() {
        rest_duration
    } else {
        0
    }
}

/// Effective duration vector for every phase under `settings`.
pub fn phase_durations(exercises: &[Exercise], settings: &Settings) -> Vec<u32> {
    let total = crate::sequencer::total_phases(exercises.len());
    (0..total)
        .map(|i| {
            effective_duration(
                i,
                exercises,
                settings.rest_duration,
                settings.duration_multiplier,
            )
        })
        .collect()
}

/// Whole-workout duration in seconds under `settings`.
pub fn total_duration(exercises: &[Exercise], settings: &Settings) -> u64 {
    phase_durations(exercises, settings)
        .into_iter()
        .map(u64::from)
        .sum()
}
