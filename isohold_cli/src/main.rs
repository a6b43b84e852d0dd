use clap::{Parser, Subcommand};
use isohold_core::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "isohold")]
#[command(about = "Guided therapeutic workout timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout (default)
    Start {
        /// Plan file (TOML); built-in demo plan when omitted
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Hold duration in seconds (overrides config)
        #[arg(long)]
        hold: Option<u32>,

        /// Rest duration in seconds (overrides config)
        #[arg(long)]
        rest: Option<u32>,

        /// Disable audible cues and speech
        #[arg(long)]
        no_sound: bool,

        /// Disable vibration requests
        #[arg(long)]
        no_vibration: bool,

        /// Show the plan without running it
        #[arg(long)]
        dry_run: bool,

        /// Emit events as JSON lines instead of human output
        #[arg(long)]
        json: bool,

        /// Tick interval in milliseconds (accelerated runs)
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },

    /// Validate and display a plan file
    Plan {
        /// Plan file (TOML)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    isohold_core::logging::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Start {
            plan,
            hold,
            rest,
            no_sound,
            no_vibration,
            dry_run,
            json,
            tick_ms,
        }) => cmd_start(
            plan,
            hold,
            rest,
            no_sound,
            no_vibration,
            dry_run,
            json,
            tick_ms,
            &config,
        ),
        Some(Commands::Plan { file }) => cmd_plan(&file),
        None => {
            // Default to "start" with the demo plan
            cmd_start(None, None, None, false, false, false, false, 1000, &config)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_start(
    plan_path: Option<PathBuf>,
    hold: Option<u32>,
    rest: Option<u32>,
    no_sound: bool,
    no_vibration: bool,
    dry_run: bool,
    json: bool,
    tick_ms: u64,
    config: &Config,
) -> Result<()> {
    let plan = match plan_path {
        Some(path) => WorkoutPlan::load(&path)?,
        None => demo_plan(),
    };

    let errors = plan.validate();
    if !errors.is_empty() {
        eprintln!("Plan validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Plan("Invalid plan".into()));
    }

    let mut settings = config.settings();
    if let Some(hold) = hold {
        settings.hold_duration = hold;
    }
    if let Some(rest) = rest {
        settings.rest_duration = rest;
    }
    if no_sound {
        settings.sound_enabled = false;
    }
    if no_vibration {
        settings.vibration_enabled = false;
    }

    if dry_run {
        display_plan(&plan, &settings);
        println!("\n[Dry run - not starting the timer]");
        return Ok(());
    }

    let notifier: Box<dyn Notifier> = if json {
        Box::new(NullNotifier)
    } else {
        display_plan(&plan, &settings);
        println!();
        Box::new(ConsoleNotifier)
    };

    let sink: Box<dyn EventSink> = if json {
        Box::new(|event: &TimerEvent| match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Failed to serialize event: {}", e),
        })
    } else {
        Box::new(render_event)
    };

    let mut engine = TimerEngine::new(notifier);
    engine.start_workout(plan, settings, sink);
    let engine = Arc::new(Mutex::new(engine));

    let mut scheduler = TickScheduler::with_interval(Duration::from_millis(tick_ms.max(1)));
    scheduler.start(Arc::clone(&engine));

    if !json {
        spawn_control_thread(Arc::clone(&engine));
    }

    scheduler.join();

    let state = engine
        .lock()
        .map_err(|_| Error::Other("engine lock poisoned".into()))?
        .state();
    if state.phase == Phase::Complete {
        if !json {
            println!("\n✓ Workout complete!");
        }
    } else if !json {
        println!("\nWorkout stopped.");
    }

    Ok(())
}

fn cmd_plan(file: &Path) -> Result<()> {
    let plan = WorkoutPlan::load(file)?;

    let errors = plan.validate();
    if !errors.is_empty() {
        eprintln!("Plan validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Plan("Invalid plan".into()));
    }

    display_plan(&plan, &Config::default().settings());
    println!("\n✓ Plan is valid");
    Ok(())
}

/// Reads one-letter commands from stdin while the workout runs:
/// `p` pauses, `r` resumes, `q` stops. Exits on EOF.
fn spawn_control_thread(engine: Arc<Mutex<TimerEngine>>) {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Ok(mut engine) = engine.lock() else { break };
            match line.trim().to_lowercase().as_str() {
                "p" => engine.pause(),
                "r" => engine.resume(),
                "q" => {
                    engine.stop_timer();
                    break;
                }
                _ => {}
            }
            if !engine.is_running() {
                break;
            }
        }
    });
}

fn display_plan(plan: &WorkoutPlan, settings: &TimerSettings) {
    println!("╭─────────────────────────────────────────╮");
    println!("│  WORKOUT PLAN — LEVEL {}", plan.level);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Hold {} / Rest {}",
        format_time(settings.hold_duration),
        format_time(settings.rest_duration)
    );
    println!();
    for item in &plan.exercises {
        println!(
            "  → {} × {}",
            item.exercise.display_name(),
            item.reps
        );
    }
    println!();
    println!("  Total reps: {}", plan.total_reps());
    println!("  Controls: 'p' pause, 'r' resume, 'q' quit (+ Enter)");
}

fn render_event(event: &TimerEvent) {
    match event {
        TimerEvent::Tick {
            time,
            phase,
            rep,
            total_reps,
            ..
        } => {
            println!(
                "  {:?} {}  (rep {}/{})",
                phase,
                format_time(*time),
                rep,
                total_reps
            );
        }
        TimerEvent::PhaseChange {
            phase,
            duration,
            rep,
            exercise,
        } => {
            println!(
                "\n── {:?} {} — {} (rep {})",
                phase,
                format_time(*duration),
                exercise.exercise.display_name(),
                rep
            );
        }
        TimerEvent::ExerciseChange {
            exercise,
            exercise_index,
        } => {
            println!(
                "\n═══ Exercise {}: {} ═══",
                exercise_index + 1,
                exercise.exercise.display_name()
            );
        }
        TimerEvent::RepComplete { rep, total_reps } => {
            println!("  ✓ Rep {}/{}", rep, total_reps);
        }
        TimerEvent::SetComplete { exercise, .. } => {
            println!("  ✓ {} done", exercise.exercise.display_name());
        }
        TimerEvent::WorkoutComplete {
            duration,
            exercises_completed,
        } => {
            println!(
                "\n✓ {} exercises in {}",
                exercises_completed,
                format_time(u32::try_from(*duration).unwrap_or(0))
            );
        }
    }
    let _ = io::stdout().flush();
}

/// A short built-in plan so `isohold start` works without a plan file
fn demo_plan() -> WorkoutPlan {
    WorkoutPlan {
        level: "demo".into(),
        exercises: vec![
            ExerciseItem {
                exercise: ExerciseDescriptor {
                    id: "glute_bridge".into(),
                    name: "Glute Bridge".into(),
                    side: None,
                    instruction: Some("Lift your hips and squeeze".into()),
                },
                reps: 3,
            },
            ExerciseItem {
                exercise: ExerciseDescriptor {
                    id: "clamshell_left".into(),
                    name: "Clamshell".into(),
                    side: Some(Side::Left),
                    instruction: Some("Knees bent, open like a clamshell".into()),
                },
                reps: 3,
            },
            ExerciseItem {
                exercise: ExerciseDescriptor {
                    id: "clamshell_right".into(),
                    name: "Clamshell".into(),
                    side: Some(Side::Right),
                    instruction: None,
                },
                reps: 3,
            },
        ],
    }
}

/// Notifier that renders cues on the terminal: BEL for audio, textual
/// markers for vibration and speech.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn play_cue(&mut self, cue: CueKind) -> Result<()> {
        // BEL rings the terminal bell where supported.
        print!("\x07");
        if cue != CueKind::Countdown {
            println!("  ♪ {:?}", cue);
        }
        io::stdout().flush()?;
        Ok(())
    }

    fn vibrate(&mut self, pattern: &[u64]) -> Result<()> {
        tracing::debug!("Vibration requested: {:?}ms", pattern);
        Ok(())
    }

    fn speak(&mut self, text: &str, _priority: SpeechPriority) -> Result<()> {
        println!("  🔊 {}", text);
        io::stdout().flush()?;
        Ok(())
    }
}
