use std::path::{Path, PathBuf};

use clap::Args;
use workout_core::settings::{validate_duration_multiplier, validate_rest_duration};
use workout_core::{ExerciseCatalog, FileStore, Settings, SettingsStore};

pub mod catalog;
pub mod plan;
pub mod run;
pub mod settings;

/// Options shared by every command that builds a workout.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkoutOpts {
    /// Rest between exercises in seconds (10-60); defaults to the saved setting
    #[arg(long)]
    pub rest: Option<u32>,
    /// Exercise duration multiplier (0.5-2.0); defaults to the saved setting
    #[arg(long)]
    pub multiplier: Option<f64>,
    /// TOML routine file with [[exercise]] tables
    #[arg(long)]
    pub routine: Option<PathBuf>,
}

impl WorkoutOpts {
    /// Saved settings with command-line overrides applied on top.
    pub fn settings(
        &self,
        store: &impl SettingsStore,
    ) -> Result<Settings, Box<dyn std::error::Error>> {
        let mut settings = store.load_settings();
        if let Some(rest) = self.rest {
            settings.rest_duration = validate_rest_duration(rest)?;
        }
        if let Some(multiplier) = self.multiplier {
            settings.duration_multiplier = validate_duration_multiplier(multiplier)?;
        }
        Ok(settings)
    }

    pub fn catalog(&self) -> Result<ExerciseCatalog, Box<dyn std::error::Error>> {
        load_catalog(self.routine.as_deref())
    }
}

pub fn load_catalog(routine: Option<&Path>) -> Result<ExerciseCatalog, Box<dyn std::error::Error>> {
    match routine {
        Some(path) => Ok(ExerciseCatalog::load_toml(path)?),
        None => Ok(ExerciseCatalog::default_routine()),
    }
}

pub fn open_store() -> Result<FileStore, Box<dyn std::error::Error>> {
    Ok(FileStore::open()?)
}
