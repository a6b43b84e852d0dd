//! The workout timing state machine.
//!
//! This module implements the tick-driven engine that owns phase
//! sequencing, rep/exercise advancement, pause/resume/stop semantics,
//! and progress computation:
//! - `start_workout` initializes fresh state and announces the first exercise
//! - `tick` evaluates one second of the phase-transition policy
//! - `pause`/`resume`/`stop_timer`/`reset` are the explicit lifecycle controls
//!
//! The engine is deliberately free of threads and clocks beyond the start
//! timestamp: *when* `tick` runs is the `TickScheduler`'s concern, so tests
//! can drive the whole policy by direct invocation.

use chrono::Utc;

use crate::notify::{patterns, CueKind, Notifier, SpeechPriority};
use crate::{EventSink, ExerciseItem, Phase, TimerEvent, TimerSettings, TimerState, WorkoutPlan};

/// Length of the initial "get ready" countdown in seconds
const TRANSITION_SECONDS: u32 = 3;

/// Remaining-seconds window that triggers a countdown cue
const COUNTDOWN_WINDOW: u32 = 3;

/// The workout timing engine.
///
/// One engine instance owns one `TimerState`; multiple independent
/// instances never share state. All external reads go through
/// [`TimerEngine::state`] snapshots.
pub struct TimerEngine {
    plan: Option<WorkoutPlan>,
    settings: TimerSettings,
    state: TimerState,
    notifier: Box<dyn Notifier>,
    sink: Option<Box<dyn EventSink>>,
}

impl TimerEngine {
    /// Create an idle engine with the given feedback collaborator
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            plan: None,
            settings: TimerSettings::default(),
            state: TimerState::default(),
            notifier,
            sink: None,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Begin a workout: fresh state, a "get ready" announcement, and a
    /// 3-second Transition countdown before the first hold.
    ///
    /// An empty plan completes immediately with zero exercises; the
    /// engine never enters Hold or Rest referencing a nonexistent item.
    pub fn start_workout(
        &mut self,
        plan: WorkoutPlan,
        settings: TimerSettings,
        sink: Box<dyn EventSink>,
    ) {
        let settings = settings.normalized();
        self.settings = settings;
        self.sink = Some(sink);
        self.state = TimerState {
            phase: Phase::Transition,
            is_running: true,
            is_paused: false,
            current_time: TRANSITION_SECONDS,
            hold_duration: settings.hold_duration,
            rest_duration: settings.rest_duration,
            current_exercise_index: 0,
            current_rep: 1,
            started_at: Some(Utc::now()),
        };

        if plan.exercises.is_empty() {
            tracing::warn!("Workout started with an empty plan; completing immediately");
            self.plan = Some(plan);
            self.state.phase = Phase::Complete;
            self.state.is_running = false;
            self.state.current_time = 0;
            self.emit(TimerEvent::WorkoutComplete {
                duration: 0,
                exercises_completed: 0,
            });
            return;
        }

        tracing::info!(
            "Starting workout: level {}, {} exercises, hold {}s / rest {}s",
            plan.level,
            plan.exercises.len(),
            settings.hold_duration,
            settings.rest_duration
        );

        let announcement = format!(
            "Get ready: {}",
            plan.exercises[0].exercise.display_name()
        );
        self.plan = Some(plan);
        self.say(&announcement, SpeechPriority::Interrupt);
    }

    /// Gate tick evaluation; the scheduler keeps firing so resume is
    /// instantaneous. No-op unless running.
    pub fn pause(&mut self) {
        if !self.state.is_running || self.state.is_paused {
            return;
        }
        self.state.is_paused = true;
        tracing::debug!("Workout paused at {}s remaining", self.state.current_time);
        self.say("Paused", SpeechPriority::Normal);
    }

    /// Clear the pause gate and resume the audio channel. No-op unless paused.
    pub fn resume(&mut self) {
        if !self.state.is_running || !self.state.is_paused {
            return;
        }
        self.state.is_paused = false;
        if let Err(e) = self.notifier.resume_audio() {
            tracing::debug!("Audio resume failed: {}", e);
        }
        self.say("Resuming", SpeechPriority::Normal);
    }

    /// Stop driving the workout, leaving the last state snapshot intact
    /// for inspection. The caller decides whether the workout counts as
    /// completed or abandoned.
    pub fn stop_timer(&mut self) {
        if self.state.is_running {
            tracing::info!("Workout stopped in phase {:?}", self.state.phase);
        }
        self.state.is_running = false;
    }

    /// Restore the documented Idle defaults, discarding the current state
    pub fn reset(&mut self) {
        self.state = TimerState::default();
        self.plan = None;
        self.sink = None;
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Defensive snapshot of the current state; never the live value
    pub fn state(&self) -> TimerState {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn is_complete(&self) -> bool {
        self.state.phase == Phase::Complete
    }

    /// Percentage of the active Hold or Rest phase already elapsed,
    /// in `[0, 100]`; 0 for Idle/Transition/Complete.
    pub fn progress_percent(&self) -> f64 {
        let duration = match self.state.phase {
            Phase::Hold => self.state.hold_duration,
            Phase::Rest => self.state.rest_duration,
            _ => return 0.0,
        };
        if duration == 0 {
            return 0.0;
        }
        let elapsed = duration.saturating_sub(self.state.current_time);
        (f64::from(elapsed) / f64::from(duration) * 100.0).clamp(0.0, 100.0)
    }

    // ── Tick evaluation ──────────────────────────────────────────────

    /// Evaluate one second of workout time.
    ///
    /// Called once per second by the scheduler while running; callable
    /// directly in tests. A no-op while paused, idle, or complete.
    pub fn tick(&mut self) {
        if !self.state.is_running || self.state.is_paused {
            return;
        }
        match self.state.phase {
            Phase::Idle | Phase::Complete => return,
            _ => {}
        }

        if self.state.current_time > 0 {
            self.state.current_time -= 1;
            let remaining = self.state.current_time;
            if (1..=COUNTDOWN_WINDOW).contains(&remaining) {
                self.cue(CueKind::Countdown);
            }
            if let Some(item) = self.current_item() {
                self.emit(TimerEvent::Tick {
                    time: remaining,
                    phase: self.state.phase,
                    rep: self.state.current_rep,
                    total_reps: item.reps,
                    exercise: item,
                });
            }
            return;
        }

        // Countdown expired: run the phase-completion policy.
        match self.state.phase {
            Phase::Transition | Phase::Rest => self.start_hold_phase(),
            Phase::Hold => self.finish_hold(),
            Phase::Idle | Phase::Complete => {}
        }
    }

    // ── Phase transitions ────────────────────────────────────────────

    fn start_hold_phase(&mut self) {
        let Some(item) = self.current_item() else {
            // Unreachable for validated plans; stop rather than index out of bounds.
            tracing::warn!("No exercise at index {}", self.state.current_exercise_index);
            self.state.is_running = false;
            return;
        };

        self.state.phase = Phase::Hold;
        self.state.current_time = self.state.hold_duration;
        self.cue(CueKind::StartHold);
        self.buzz(patterns::START_HOLD);
        if self.state.current_rep == 1 {
            let prompt = item
                .exercise
                .instruction
                .clone()
                .unwrap_or_else(|| "Hold".to_string());
            self.say(&prompt, SpeechPriority::Normal);
        }
        self.emit(TimerEvent::PhaseChange {
            phase: Phase::Hold,
            duration: self.state.hold_duration,
            rep: self.state.current_rep,
            exercise: item,
        });
    }

    fn start_rest_phase(&mut self) {
        let Some(item) = self.current_item() else {
            self.state.is_running = false;
            return;
        };

        self.state.phase = Phase::Rest;
        self.state.current_time = self.state.rest_duration;
        self.cue(CueKind::StartRest);
        self.say("Rest", SpeechPriority::Normal);
        self.emit(TimerEvent::PhaseChange {
            phase: Phase::Rest,
            duration: self.state.rest_duration,
            rep: self.state.current_rep,
            exercise: item,
        });
    }

    /// A hold's countdown reached zero: close out the rep, then the set,
    /// then the exercise, then the workout, whichever apply.
    fn finish_hold(&mut self) {
        let Some(item) = self.current_item() else {
            self.state.is_running = false;
            return;
        };

        self.cue(CueKind::EndHold);
        self.buzz(patterns::END_HOLD);
        self.emit(TimerEvent::RepComplete {
            rep: self.state.current_rep,
            total_reps: item.reps,
        });

        if self.state.current_rep < item.reps {
            self.state.current_rep += 1;
            self.start_rest_phase();
            return;
        }

        // Set finished.
        self.cue(CueKind::ExerciseComplete);
        self.buzz(patterns::EXERCISE_COMPLETE);
        self.emit(TimerEvent::SetComplete {
            exercise: item,
            exercise_index: self.state.current_exercise_index,
        });

        let exercise_count = self
            .plan
            .as_ref()
            .map(|p| p.exercises.len())
            .unwrap_or(0);

        if self.state.current_exercise_index + 1 < exercise_count {
            self.state.current_exercise_index += 1;
            self.state.current_rep = 1;
            if let Some(next) = self.current_item() {
                let announcement = format!("Next exercise: {}", next.exercise.display_name());
                self.say(&announcement, SpeechPriority::Interrupt);
                self.emit(TimerEvent::ExerciseChange {
                    exercise: next,
                    exercise_index: self.state.current_exercise_index,
                });
            }
            self.start_rest_phase();
        } else {
            self.complete_workout(exercise_count);
        }
    }

    fn complete_workout(&mut self, exercises_completed: usize) {
        self.state.phase = Phase::Complete;
        self.state.is_running = false;
        self.state.current_time = 0;
        self.cue(CueKind::WorkoutComplete);
        self.buzz(patterns::WORKOUT_COMPLETE);
        self.say("Workout complete. Well done.", SpeechPriority::Interrupt);

        let duration = self
            .state
            .started_at
            .map(|t| (Utc::now() - t).num_seconds().max(0))
            .unwrap_or(0);
        tracing::info!(
            "Workout complete: {} exercises in {}s",
            exercises_completed,
            duration
        );
        self.emit(TimerEvent::WorkoutComplete {
            duration,
            exercises_completed,
        });
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn current_item(&self) -> Option<ExerciseItem> {
        self.plan
            .as_ref()
            .and_then(|p| p.exercises.get(self.state.current_exercise_index))
            .cloned()
    }

    fn emit(&mut self, event: TimerEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_event(&event);
        }
    }

    // Feedback requests are fire-and-forget: failures are logged and
    // swallowed so they never interrupt phase progression.

    fn cue(&mut self, kind: CueKind) {
        if !self.settings.sound_enabled {
            return;
        }
        if let Err(e) = self.notifier.play_cue(kind) {
            tracing::debug!("Audio cue {:?} failed: {}", kind, e);
        }
    }

    fn buzz(&mut self, pattern: &[u64]) {
        if !self.settings.vibration_enabled {
            return;
        }
        if let Err(e) = self.notifier.vibrate(pattern) {
            tracing::debug!("Vibration failed: {}", e);
        }
    }

    fn say(&mut self, text: &str, priority: SpeechPriority) {
        if !self.settings.sound_enabled {
            return;
        }
        if let Err(e) = self.notifier.speak(text, priority) {
            tracing::debug!("Speech failed: {}", e);
        }
    }
}

/// Render non-negative whole seconds as `m:ss` (minutes unbounded,
/// seconds zero-padded).
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
