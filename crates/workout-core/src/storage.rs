use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/workout-timer[-dev]/` based on WORKOUT_TIMER_ENV.
///
/// Set WORKOUT_TIMER_ENV=dev to use the development data directory, or
/// WORKOUT_TIMER_CONFIG_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("WORKOUT_TIMER_CONFIG_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("WORKOUT_TIMER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("workout-timer-dev")
            } else {
                base_dir.join("workout-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
