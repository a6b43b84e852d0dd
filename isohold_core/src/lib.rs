#![forbid(unsafe_code)]

//! Core timing state machine for the Isohold therapeutic workout timer.
//!
//! This crate provides:
//! - Domain types (exercises, plans, settings, timer state)
//! - The tick-driven timer engine (phase sequencing, rep/exercise
//!   advancement, pause/resume/stop, progress computation)
//! - A periodic tick scheduler decoupled from the engine
//! - Typed events and the feedback (Notifier) contract
//! - Plan loading and configuration

pub mod types;
pub mod error;
pub mod events;
pub mod notify;
pub mod plan;
pub mod engine;
pub mod scheduler;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use events::{EventSink, RecordingSink, TimerEvent};
pub use notify::{CueKind, Notifier, NullNotifier, SpeechPriority};
pub use engine::{format_time, TimerEngine};
pub use scheduler::TickScheduler;
pub use config::Config;
