//! Workout plan loading and validation.
//!
//! Plans are authored externally (by a plan generator or by hand) and
//! supplied to the engine read-only. This module deserializes TOML plan
//! files and checks the plan contract before a workout starts.
//!
//! An empty plan is *not* a validation error here: the engine has a
//! defined contract for it (immediate completion), so `validate` only
//! reports defects that would otherwise be silently misinterpreted.

use crate::{Result, WorkoutPlan};
use std::path::Path;

impl WorkoutPlan {
    /// Load a plan from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let plan: WorkoutPlan = toml::from_str(&contents)?;
        tracing::info!(
            "Loaded plan '{}' with {} exercises from {:?}",
            plan.level,
            plan.exercises.len(),
            path
        );
        Ok(plan)
    }

    /// Check the plan contract, returning a list of problems
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.level.is_empty() {
            errors.push("Plan has empty level identifier".to_string());
        }

        for (index, item) in self.exercises.iter().enumerate() {
            if item.exercise.id.is_empty() {
                errors.push(format!("Exercise at index {} has empty ID", index));
            }
            if item.exercise.name.is_empty() {
                errors.push(format!(
                    "Exercise '{}' has empty name",
                    item.exercise.id
                ));
            }
            if item.reps == 0 {
                errors.push(format!(
                    "Exercise '{}' has a rep count of 0 (must be >= 1)",
                    item.exercise.id
                ));
            }
        }

        errors
    }
}
