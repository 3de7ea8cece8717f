mod engine;
mod scheduler;

pub use engine::{TimerSnapshot, TimerState, WorkoutTimer};
pub use scheduler::{ManualScheduler, Scheduler, TaskToken, TimerTask, WallScheduler};
