use clap::Subcommand;
use workout_core::settings::{
    DURATION_MULTIPLIER_KEY, KNOWN_KEYS, MUTE_STATUS_KEY, REST_DURATION_KEY,
};
use workout_core::SettingsStore;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting (rest, multiplier, muted)
    Get {
        /// Setting key
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

/// Accept short names as well as the stored keys.
fn resolve_key(key: &str) -> Option<&'static str> {
    match key {
        "rest" | "rest_duration" | "rest-duration" | REST_DURATION_KEY => Some(REST_DURATION_KEY),
        "multiplier" | "duration_multiplier" | "duration-multiplier" | DURATION_MULTIPLIER_KEY => {
            Some(DURATION_MULTIPLIER_KEY)
        }
        "muted" | "mute" | MUTE_STATUS_KEY => Some(MUTE_STATUS_KEY),
        _ => None,
    }
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store()?;
    match action {
        SettingsAction::Get { key } => {
            let value = match resolve_key(&key) {
                Some(REST_DURATION_KEY) => store.rest_duration().to_string(),
                Some(DURATION_MULTIPLIER_KEY) => store.duration_multiplier().to_string(),
                Some(_) => store.muted().to_string(),
                None => return Err(format!("unknown key: {key}").into()),
            };
            println!("{value}");
        }
        SettingsAction::Set { key, value } => {
            let resolved = resolve_key(&key).ok_or_else(|| format!("unknown key: {key}"))?;
            store.set_validated(resolved, &value)?;
            println!("ok");
        }
        SettingsAction::List => {
            let settings = store.load_settings();
            let out = serde_json::json!({
                "rest_duration": settings.rest_duration,
                "duration_multiplier": settings.duration_multiplier,
                "muted": store.muted(),
                "path": store.path().display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        SettingsAction::Reset => {
            for key in KNOWN_KEYS {
                store.remove(key)?;
            }
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
