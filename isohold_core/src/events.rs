//! Typed events emitted by the timer engine.
//!
//! Every state change the presentation layer cares about produces a
//! `TimerEvent`. Events are delivered synchronously, in order, on the
//! tick that produced them; handlers must return quickly so they do not
//! delay the next tick.

use serde::{Deserialize, Serialize};

use crate::{ExerciseItem, Phase};

/// Tagged union of engine notifications with their payloads
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// One second elapsed within the active phase
    Tick {
        /// Seconds remaining after the decrement
        time: u32,
        phase: Phase,
        exercise: ExerciseItem,
        rep: u32,
        total_reps: u32,
    },
    /// A new Hold or Rest phase began
    PhaseChange {
        phase: Phase,
        /// Full length of the phase in seconds
        duration: u32,
        rep: u32,
        exercise: ExerciseItem,
    },
    /// Advanced to the next exercise in the plan
    ExerciseChange {
        exercise: ExerciseItem,
        exercise_index: usize,
    },
    /// One repetition's hold finished
    RepComplete { rep: u32, total_reps: u32 },
    /// All reps of the current exercise finished
    SetComplete {
        exercise: ExerciseItem,
        exercise_index: usize,
    },
    /// The whole workout finished; terminal event
    WorkoutComplete {
        /// Whole seconds from start to completion
        duration: i64,
        exercises_completed: usize,
    },
}

/// Consumer of engine events, supplied at workout start.
///
/// Invoked synchronously from the engine's evaluation step.
pub trait EventSink: Send {
    fn on_event(&mut self, event: &TimerEvent);
}

/// Any `FnMut` closure over events is a sink.
impl<F> EventSink for F
where
    F: FnMut(&TimerEvent) + Send,
{
    fn on_event(&mut self, event: &TimerEvent) {
        self(event)
    }
}

/// Sink that records every event; useful for tests and replay.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<TimerEvent>,
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: &TimerEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExerciseDescriptor;

    fn item() -> ExerciseItem {
        ExerciseItem {
            exercise: ExerciseDescriptor {
                id: "bridge".into(),
                name: "Glute Bridge".into(),
                side: None,
                instruction: None,
            },
            reps: 3,
        }
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = TimerEvent::RepComplete {
            rep: 1,
            total_reps: 3,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"rep_complete\""));
        assert!(json.contains("\"rep\":1"));
    }

    #[test]
    fn test_event_roundtrip() {
        let event = TimerEvent::PhaseChange {
            phase: Phase::Hold,
            duration: 10,
            rep: 2,
            exercise: item(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: TimerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0usize;
        {
            let mut sink = |_event: &TimerEvent| count += 1;
            sink.on_event(&TimerEvent::RepComplete {
                rep: 1,
                total_reps: 1,
            });
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_recording_sink_preserves_order() {
        let mut sink = RecordingSink::default();
        sink.on_event(&TimerEvent::RepComplete {
            rep: 1,
            total_reps: 2,
        });
        sink.on_event(&TimerEvent::RepComplete {
            rep: 2,
            total_reps: 2,
        });
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(
            sink.events[0],
            TimerEvent::RepComplete { rep: 1, .. }
        ));
    }
}
