//! Periodic tick driver for the timer engine.
//!
//! The scheduler decides *when* evaluation happens; the engine decides
//! *what* happens. Tests exercise the engine by calling `tick()` directly,
//! so the scheduler stays a thin thread loop: fire once per interval,
//! stop when cancelled or when the engine is no longer running.
//!
//! At most one driver thread is active per scheduler; `start` cancels any
//! prior thread before spawning, so two workouts can never produce
//! duplicate evaluation streams.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::TimerEngine;

/// Thread-backed once-per-second driver
pub struct TickScheduler {
    interval: Duration,
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TickScheduler {
    /// Scheduler with the standard one-second interval
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    /// Scheduler with a custom interval (accelerated demos and tests)
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            active: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start driving the engine, cancelling any prior driver thread first.
    ///
    /// The thread exits on `cancel()` or as soon as the engine stops
    /// running (explicit stop or workout completion). Pause does not stop
    /// the driver; the engine's evaluation is a no-op while paused.
    pub fn start(&mut self, engine: Arc<Mutex<TimerEngine>>) {
        self.cancel();

        let active = Arc::new(AtomicBool::new(true));
        self.active = Arc::clone(&active);
        let interval = self.interval;

        self.handle = Some(std::thread::spawn(move || {
            tracing::debug!("Tick driver started ({}ms interval)", interval.as_millis());
            while active.load(Ordering::SeqCst) {
                std::thread::sleep(interval);
                if !active.load(Ordering::SeqCst) {
                    break;
                }
                let Ok(mut engine) = engine.lock() else {
                    tracing::warn!("Engine lock poisoned; stopping tick driver");
                    break;
                };
                if !engine.is_running() {
                    break;
                }
                engine.tick();
                if !engine.is_running() {
                    break;
                }
            }
            tracing::debug!("Tick driver stopped");
        }));
    }

    /// Stop the driver thread and wait for it to exit
    pub fn cancel(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Block until the driver thread exits on its own (engine stopped
    /// or workout complete)
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether a driver thread is currently alive
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotifier;
    use crate::{
        EventSink, ExerciseDescriptor, ExerciseItem, Phase, TimerEvent, TimerSettings, WorkoutPlan,
    };

    fn tiny_plan() -> WorkoutPlan {
        WorkoutPlan {
            level: "1".into(),
            exercises: vec![ExerciseItem {
                exercise: ExerciseDescriptor {
                    id: "bridge".into(),
                    name: "Glute Bridge".into(),
                    side: None,
                    instruction: None,
                },
                reps: 2,
            }],
        }
    }

    fn fast_settings() -> TimerSettings {
        TimerSettings {
            hold_duration: 1,
            rest_duration: 1,
            sound_enabled: false,
            vibration_enabled: false,
        }
    }

    fn started_engine(
        events: &Arc<Mutex<Vec<TimerEvent>>>,
    ) -> Arc<Mutex<TimerEngine>> {
        let handle = Arc::clone(events);
        let sink: Box<dyn EventSink> =
            Box::new(move |event: &TimerEvent| handle.lock().unwrap().push(event.clone()));
        let mut engine = TimerEngine::new(Box::new(NullNotifier));
        engine.start_workout(tiny_plan(), fast_settings(), sink);
        Arc::new(Mutex::new(engine))
    }

    #[test]
    fn test_drives_workout_to_completion() {
        let events: Arc<Mutex<Vec<TimerEvent>>> = Arc::default();
        let engine = started_engine(&events);

        let mut scheduler = TickScheduler::with_interval(Duration::from_millis(2));
        scheduler.start(Arc::clone(&engine));
        scheduler.join();

        assert_eq!(engine.lock().unwrap().state().phase, Phase::Complete);
        let captured = events.lock().unwrap();
        assert_eq!(
            captured
                .iter()
                .filter(|e| matches!(e, TimerEvent::WorkoutComplete { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_cancel_stops_driver() {
        let events: Arc<Mutex<Vec<TimerEvent>>> = Arc::default();
        let engine = started_engine(&events);

        let mut scheduler = TickScheduler::with_interval(Duration::from_millis(50));
        scheduler.start(Arc::clone(&engine));
        assert!(scheduler.is_active());

        scheduler.cancel();
        assert!(!scheduler.is_active());

        // The engine was stopped mid-workout, not completed.
        let state = engine.lock().unwrap().state();
        assert_ne!(state.phase, Phase::Complete);
    }

    #[test]
    fn test_restart_replaces_prior_driver() {
        let events: Arc<Mutex<Vec<TimerEvent>>> = Arc::default();
        let engine = started_engine(&events);

        let mut scheduler = TickScheduler::with_interval(Duration::from_millis(2));
        scheduler.start(Arc::clone(&engine));
        scheduler.start(Arc::clone(&engine));
        scheduler.join();

        // Exactly one evaluation stream: a duplicate driver would race the
        // decrements and double-count ticks within phases.
        let captured = events.lock().unwrap();
        assert_eq!(
            captured
                .iter()
                .filter(|e| matches!(e, TimerEvent::WorkoutComplete { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_driver_exits_after_explicit_stop() {
        let events: Arc<Mutex<Vec<TimerEvent>>> = Arc::default();
        let engine = started_engine(&events);

        let mut scheduler = TickScheduler::with_interval(Duration::from_millis(5));
        scheduler.start(Arc::clone(&engine));
        engine.lock().unwrap().stop_timer();
        scheduler.join();

        assert!(!scheduler.is_active());
        assert!(!engine.lock().unwrap().is_running());
    }
}
