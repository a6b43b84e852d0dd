//! Core domain types for the Isohold workout timer.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their descriptors
//! - Workout plans (ordered exercise/rep sequences)
//! - Timer settings and phases
//! - The mutable timer state owned by the engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Exercise Types
// ============================================================================

/// Side designation for unilateral exercises
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Spoken/display label ("left" / "right")
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// An exercise definition (e.g., "Glute Bridge Hold")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Spoken instruction for the first hold of this exercise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

impl ExerciseDescriptor {
    /// Display name including side designation when present
    pub fn display_name(&self) -> String {
        match self.side {
            Some(side) => format!("{} ({} side)", self.name, side.label()),
            None => self.name.clone(),
        }
    }
}

/// One exercise with its repetition count; the rep count is fixed
/// for the lifetime of the item.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseItem {
    pub exercise: ExerciseDescriptor,
    pub reps: u32,
}

/// An ordered sequence of exercise items plus a level identifier.
/// Produced outside the core; read-only to the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub level: String,
    pub exercises: Vec<ExerciseItem>,
}

impl WorkoutPlan {
    /// Total repetitions across all exercises
    pub fn total_reps(&self) -> u32 {
        self.exercises.iter().map(|item| item.reps).sum()
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Per-workout settings captured by the engine at start time
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerSettings {
    /// Hold phase length in seconds
    pub hold_duration: u32,
    /// Rest phase length in seconds
    pub rest_duration: u32,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            hold_duration: 10,
            rest_duration: 5,
            sound_enabled: true,
            vibration_enabled: true,
        }
    }
}

impl TimerSettings {
    /// Clamp non-positive durations to 1 second.
    ///
    /// A zero duration would make a phase complete on its first tick
    /// evaluation; the contract is to clamp rather than crash or stall.
    pub fn normalized(mut self) -> Self {
        if self.hold_duration == 0 {
            tracing::warn!("hold_duration of 0 clamped to 1 second");
            self.hold_duration = 1;
        }
        if self.rest_duration == 0 {
            tracing::warn!("rest_duration of 0 clamped to 1 second");
            self.rest_duration = 1;
        }
        self
    }
}

// ============================================================================
// Timer State
// ============================================================================

/// Workout phase
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before the first start, or after an explicit reset
    Idle,
    /// Initial short countdown before the first hold
    Transition,
    /// Timed isometric contraction for one rep
    Hold,
    /// Timed interval between reps or exercises
    Rest,
    /// Terminal state; reached exactly once per workout
    Complete,
}

/// The engine's sole mutable entity.
///
/// Created fresh on every `start_workout`, mutated exclusively by the
/// engine's transition logic, and handed out only as snapshot copies.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimerState {
    pub phase: Phase,
    pub is_running: bool,
    /// Meaningful only while `is_running` is true
    pub is_paused: bool,
    /// Seconds remaining in the active phase, always >= 0
    pub current_time: u32,
    pub hold_duration: u32,
    pub rest_duration: u32,
    /// Index into the plan's exercise list
    pub current_exercise_index: usize,
    /// 1-based rep counter within the current exercise
    pub current_rep: u32,
    /// Captured at start; used only to compute the final duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for TimerState {
    /// The documented Idle defaults; also the post-`reset()` state.
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            is_running: false,
            is_paused: false,
            current_time: 0,
            hold_duration: 0,
            rest_duration: 0,
            current_exercise_index: 0,
            current_rep: 1,
            started_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_with_side() {
        let exercise = ExerciseDescriptor {
            id: "clamshell".into(),
            name: "Clamshell".into(),
            side: Some(Side::Left),
            instruction: None,
        };
        assert_eq!(exercise.display_name(), "Clamshell (left side)");
    }

    #[test]
    fn test_display_name_without_side() {
        let exercise = ExerciseDescriptor {
            id: "bridge".into(),
            name: "Glute Bridge".into(),
            side: None,
            instruction: None,
        };
        assert_eq!(exercise.display_name(), "Glute Bridge");
    }

    #[test]
    fn test_settings_normalized_clamps_zero() {
        let settings = TimerSettings {
            hold_duration: 0,
            rest_duration: 0,
            sound_enabled: true,
            vibration_enabled: true,
        }
        .normalized();

        assert_eq!(settings.hold_duration, 1);
        assert_eq!(settings.rest_duration, 1);
    }

    #[test]
    fn test_settings_normalized_keeps_positive() {
        let settings = TimerSettings::default().normalized();
        assert_eq!(settings.hold_duration, 10);
        assert_eq!(settings.rest_duration, 5);
    }

    #[test]
    fn test_default_state_is_idle() {
        let state = TimerState::default();
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.is_running);
        assert!(!state.is_paused);
        assert_eq!(state.current_time, 0);
        assert_eq!(state.current_rep, 1);
        assert!(state.started_at.is_none());
    }

    #[test]
    fn test_total_reps() {
        let plan = WorkoutPlan {
            level: "2".into(),
            exercises: vec![
                ExerciseItem {
                    exercise: ExerciseDescriptor {
                        id: "a".into(),
                        name: "A".into(),
                        side: None,
                        instruction: None,
                    },
                    reps: 3,
                },
                ExerciseItem {
                    exercise: ExerciseDescriptor {
                        id: "b".into(),
                        name: "B".into(),
                        side: None,
                        instruction: None,
                    },
                    reps: 5,
                },
            ],
        };
        assert_eq!(plan.total_reps(), 8);
    }
}
