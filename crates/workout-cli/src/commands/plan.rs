use clap::Args;
use serde::Serialize;
use workout_core::duration::phase_durations;
use workout_core::sequencer::{elapsed_at_phase_start, exercise_index_for};
use workout_core::{format_time, PhaseKind};

use super::WorkoutOpts;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub opts: WorkoutOpts,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PlanRow {
    phase_index: usize,
    kind: PhaseKind,
    exercise: String,
    duration_secs: u32,
    starts_at_secs: u64,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store()?;
    let settings = args.opts.settings(&store)?;
    let catalog = args.opts.catalog()?;

    let durations = phase_durations(catalog.exercises(), &settings);
    let rows: Vec<PlanRow> = durations
        .iter()
        .enumerate()
        .map(|(i, &duration)| {
            let kind = PhaseKind::of(i);
            let exercise = match kind {
                PhaseKind::Work => catalog.get(exercise_index_for(i)),
                PhaseKind::Rest => catalog.get(exercise_index_for(i) + 1),
            }
            .map(|e| e.name.clone())
            .unwrap_or_default();
            PlanRow {
                phase_index: i,
                kind,
                exercise,
                duration_secs: duration,
                starts_at_secs: elapsed_at_phase_start(i, &durations),
            }
        })
        .collect();
    let total: u64 = durations.iter().map(|&d| u64::from(d)).sum();

    if args.json {
        let out = serde_json::json!({
            "rest_duration": settings.rest_duration,
            "duration_multiplier": settings.duration_multiplier,
            "total_secs": total,
            "phases": rows,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "rest {}s, multiplier {}x, {} phases, total {}",
        settings.rest_duration,
        settings.duration_multiplier,
        rows.len(),
        format_time(total)
    );
    for row in &rows {
        let label = match row.kind {
            PhaseKind::Work => row.exercise.clone(),
            PhaseKind::Rest => format!("rest (next: {})", row.exercise),
        };
        println!(
            "{:>3}  {}  {:>5}  {}",
            row.phase_index,
            format_time(row.starts_at_secs),
            format!("{}s", row.duration_secs),
            label
        );
    }
    Ok(())
}
