//! # Workout Core Library
//!
//! Core logic for an interval-workout timer: an alternating sequence of
//! work and rest phases with pause, skip and rewind. Rendering and audio
//! live elsewhere; this crate only exposes state and emits notifications.
//!
//! ## Architecture
//!
//! - **Catalog**: the ordered exercise list (built-in or loaded from TOML)
//! - **Duration policy**: effective phase durations from the live settings
//! - **Sequencer**: phase index arithmetic and elapsed-time recomputation
//! - **Timer Engine**: a scheduler-driven state machine; the caller feeds
//!   due one-second ticks back through `run_due()`
//! - **Settings**: validated preferences over a string key-value store
//!
//! ## Key Components
//!
//! - [`WorkoutTimer`]: Core timer state machine
//! - [`ExerciseCatalog`]: Exercise list
//! - [`SettingsStore`]: Preference persistence
//! - [`NotificationPort`]: Outbound transition hooks

pub mod catalog;
pub mod duration;
pub mod error;
pub mod events;
pub mod notify;
pub mod sequencer;
pub mod settings;
pub mod storage;
pub mod timer;
pub mod view;

pub use catalog::{Exercise, ExerciseCatalog};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use notify::{MutedNotifier, NotificationPort, NotifyResult, RecordingNotifier};
pub use sequencer::PhaseKind;
pub use settings::{FileStore, MemoryStore, Settings, SettingsStore};
pub use timer::{
    ManualScheduler, Scheduler, TimerSnapshot, TimerState, TimerTask, WallScheduler, WorkoutTimer,
};
pub use view::{format_time, WorkoutView};
