//! Feedback cue contract between the engine and the device layer.
//!
//! The engine requests abstract cues (tones, vibration patterns, speech);
//! a `Notifier` implementation performs the actual device I/O. Cue
//! delivery is strictly best-effort: a failing or missing channel must
//! never affect phase timing, so every request is routed through the
//! engine's swallow-and-log boundary rather than propagated.

use crate::Result;

/// Symbolic audible cue kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueKind {
    /// Hold phase is beginning
    StartHold,
    /// Final seconds of a phase (3, 2, 1)
    Countdown,
    /// Hold phase finished
    EndHold,
    /// Rest phase is beginning
    StartRest,
    /// All reps of an exercise finished
    ExerciseComplete,
    /// The whole workout finished
    WorkoutComplete,
}

/// Speech queueing behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechPriority {
    /// Queue after any in-flight utterance
    Normal,
    /// Cancel any in-flight utterance and speak immediately
    Interrupt,
}

/// Vibration patterns as on/off millisecond durations, starting with "on"
pub mod patterns {
    pub const START_HOLD: &[u64] = &[200];
    pub const END_HOLD: &[u64] = &[100, 50, 100];
    pub const EXERCISE_COMPLETE: &[u64] = &[150, 100, 150, 100, 150];
    pub const WORKOUT_COMPLETE: &[u64] = &[400, 150, 400];
}

/// Device feedback capabilities the engine depends on but does not
/// implement. Implementations should treat a disabled or unavailable
/// channel as a successful no-op, not an error.
pub trait Notifier: Send {
    /// Play an audible cue
    fn play_cue(&mut self, cue: CueKind) -> Result<()>;

    /// Vibrate with the given on/off millisecond pattern
    fn vibrate(&mut self, pattern: &[u64]) -> Result<()>;

    /// Speak the given text
    fn speak(&mut self, text: &str, priority: SpeechPriority) -> Result<()>;

    /// Resume a suspended audio channel (e.g. after a pause)
    fn resume_audio(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Notifier that performs no I/O at all
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn play_cue(&mut self, _cue: CueKind) -> Result<()> {
        Ok(())
    }

    fn vibrate(&mut self, _pattern: &[u64]) -> Result<()> {
        Ok(())
    }

    fn speak(&mut self, _text: &str, _priority: SpeechPriority) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_notifier_accepts_everything() {
        let mut notifier = NullNotifier;
        assert!(notifier.play_cue(CueKind::StartHold).is_ok());
        assert!(notifier.vibrate(patterns::WORKOUT_COMPLETE).is_ok());
        assert!(notifier.speak("Rest", SpeechPriority::Normal).is_ok());
        assert!(notifier.resume_audio().is_ok());
    }

    #[test]
    fn test_patterns_start_with_on_duration() {
        for pattern in [
            patterns::START_HOLD,
            patterns::END_HOLD,
            patterns::EXERCISE_COMPLETE,
            patterns::WORKOUT_COMPLETE,
        ] {
            assert!(!pattern.is_empty());
            assert!(pattern[0] > 0);
        }
    }
}
