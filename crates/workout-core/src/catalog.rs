//! Exercise catalog.
//!
//! An ordered, immutable list of exercises. Order matters: the first entry
//! is the warm-up and the last one the finisher, so shuffling only ever
//! touches the middle of the list.
//!
//! Custom routines can be loaded from TOML:
//!
//! ```toml
//! [[exercise]]
//! name = "Plank"
//! explanation = "Hold the push-up position on forearms."
//! base_duration = 60
//! ```

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, ValidationError};

/// Fewest exercises that still produce an alternating work/rest workout.
pub const MIN_EXERCISES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub explanation: String,
    /// Base work duration in seconds, before the duration multiplier.
    pub base_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<String>,
    /// Name of the exercise this one must stay adjacent to when shuffling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_with: Option<String>,
}

impl Exercise {
    pub fn new(
        name: impl Into<String>,
        explanation: impl Into<String>,
        base_duration: u32,
    ) -> Self {
        Self {
            name: name.into(),
            explanation: explanation.into(),
            base_duration,
            media_ref: None,
            paired_with: None,
        }
    }

    pub fn with_media(mut self, media_ref: impl Into<String>) -> Self {
        self.media_ref = Some(media_ref.into());
        self
    }

    pub fn paired_with(mut self, other: impl Into<String>) -> Self {
        self.paired_with = Some(other.into());
        self
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct RoutineFile {
    #[serde(rename = "exercise", default)]
    exercises: Vec<Exercise>,
}

/// Validated, ordered exercise list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    /// Build a catalog, rejecting lists that cannot form a workout.
    pub fn new(exercises: Vec<Exercise>) -> Result<Self, ValidationError> {
        if exercises.len() < MIN_EXERCISES {
            return Err(ValidationError::TooFewExercises {
                min: MIN_EXERCISES,
                len: exercises.len(),
            });
        }
        for (index, exercise) in exercises.iter().enumerate() {
            if exercise.name.trim().is_empty() {
                return Err(ValidationError::EmptyName { index });
            }
            if exercise.base_duration == 0 {
                return Err(ValidationError::ZeroDuration {
                    name: exercise.name.clone(),
                });
            }
        }
        Ok(Self { exercises })
    }

    /// The built-in core & back routine.
    pub fn default_routine() -> Self {
        let exercises = vec![
            Exercise::new(
                "Cat Cow",
                "Start on all fours. Inhale as you drop your belly and look up (Cow). Exhale as you round your spine and tuck your chin (Cat).",
                40,
            )
            .with_media("media/cat-cow.webp"),
            Exercise::new(
                "Bird Dog",
                "Start on all fours. Extend left arm forward and right leg backward. Alternate sides.",
                45,
            )
            .with_media("media/bird-dog.webp"),
            Exercise::new(
                "Bodyweight Squats",
                "Stand with feet shoulder-width apart. Lower your hips as if sitting in a chair, keeping your chest up and back straight. Push back up to start.",
                45,
            )
            .with_media("media/bodyweight-squats.webp"),
            Exercise::new(
                "Push-Ups",
                "Start in a high plank. Lower your body until your chest nearly touches the floor, keeping your body straight. Push back up.",
                40,
            )
            .with_media("media/push-ups.webp"),
            Exercise::new(
                "Glute Bridge",
                "Lie on your back, knees bent, feet flat on the floor. Lift hips until your body forms a straight line from shoulders to knees. Squeeze glutes, then lower.",
                45,
            )
            .with_media("media/glute-bridge.webp"),
            Exercise::new(
                "Superman",
                "Lie face down, extend arms forward. Simultaneously lift arms, chest, and legs off the floor. Hold and lower.",
                40,
            )
            .with_media("media/superman.webp"),
            Exercise::new(
                "Bicycle Crunches",
                "Lie on back, hands behind head. Alternately bring elbow to opposite knee while extending the other leg.",
                45,
            )
            .with_media("media/bicycle-crunches.webp"),
            Exercise::new(
                "Reverse Crunch",
                "Lie on back, knees bent. Engage abs to lift hips off the floor, curling knees toward the chest. Lower slowly.",
                40,
            )
            .with_media("media/reverse-crunch.webp"),
            Exercise::new(
                "Hollow Hold",
                "Lie on back, lift head, shoulders, and legs slightly off the ground, forming a 'boat' or 'banana' shape.",
                30,
            )
            .with_media("media/hollow-hold.webp"),
            Exercise::new(
                "Flutter Kicks",
                "Lie on back. Perform small, rapid, alternating vertical kicks with the legs.",
                40,
            )
            .with_media("media/flutter-kicks.webp"),
            Exercise::new(
                "Side Plank (Right)",
                "Lie on right side, support weight on right forearm, lift hips until the body forms a straight line.",
                30,
            )
            .with_media("media/side-plank-right.webp")
            .paired_with("Side Plank (Left)"),
            Exercise::new(
                "Side Plank (Left)",
                "Lie on left side, support weight on left forearm, lift hips until the body forms a straight line.",
                30,
            )
            .with_media("media/side-plank-left.webp")
            .paired_with("Side Plank (Right)"),
            Exercise::new(
                "Mountain Climbers",
                "Start in a high plank. Alternately bring knees towards the chest in a running motion.",
                40,
            )
            .with_media("media/mountain-climbers.webp"),
            Exercise::new(
                "Russian Twist",
                "Sit with knees bent, lean back, and twist torso side to side, touching hands to the floor.",
                45,
            )
            .with_media("media/russian-twist.webp"),
            Exercise::new(
                "Plank",
                "Hold the push-up position on forearms, maintaining a straight line from head to heels.",
                60,
            )
            .with_media("media/plank.webp"),
        ];
        Self { exercises }
    }

    /// Parse a routine from TOML `[[exercise]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RoutineFile = toml::from_str(content)?;
        Ok(Self::new(file.exercises)?)
    }

    /// Load a routine file from disk.
    pub fn load_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize back into the routine file format.
    pub fn to_toml_string(&self) -> Result<String> {
        let file = RoutineFile {
            exercises: self.exercises.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }

    /// Shuffle the middle of the routine.
    ///
    /// First and last exercise stay in place. Paired exercises move as one
    /// block (in random internal order), so no other exercise ever lands
    /// between the two halves of a pair.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let n = self.exercises.len();
        if n <= 3 {
            return self.clone();
        }

        let middle = &self.exercises[1..n - 1];
        let mut used = vec![false; middle.len()];
        let mut units: Vec<Vec<Exercise>> = Vec::with_capacity(middle.len());

        for (i, exercise) in middle.iter().enumerate() {
            if used[i] {
                continue;
            }
            used[i] = true;
            let partner = exercise.paired_with.as_ref().and_then(|partner_name| {
                middle
                    .iter()
                    .enumerate()
                    .find(|(j, e)| !used[*j] && &e.name == partner_name)
                    .map(|(j, _)| j)
            });
            match partner {
                Some(j) => {
                    used[j] = true;
                    let mut block = vec![exercise.clone(), middle[j].clone()];
                    if rng.gen_bool(0.5) {
                        block.reverse();
                    }
                    units.push(block);
                }
                None => units.push(vec![exercise.clone()]),
            }
        }

        units.shuffle(rng);

        let mut exercises = Vec::with_capacity(n);
        exercises.push(self.exercises[0].clone());
        exercises.extend(units.into_iter().flatten());
        exercises.push(self.exercises[n - 1].clone());
        Self { exercises }
    }
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::default_routine()
    }
}
