//! Strider locomotion CLI.
//!
//! Provides three modes of operation:
//! - `run`: Walk a preset or configured scene headless and print the score
//! - `preset`: Print a preset's configuration as TOML
//! - `info`: Print workspace crate versions and available presets

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use strider_record::prelude::Recorder;
use strider_sim::prelude::*;
use tracing::{error, info};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Procedural legged-locomotion controller.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a scene headless and print run statistics and the objective.
    Run {
        /// TOML configuration file; overrides `--preset`.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Built-in scene.
        #[arg(short, long, default_value = "biped")]
        preset: String,

        /// Simulated seconds to run.
        #[arg(short, long, default_value_t = 10.0)]
        seconds: f64,

        /// Goal velocity as X,Y,Z in m/s.
        #[arg(short, long, value_delimiter = ',', num_args = 3)]
        goal: Option<Vec<f64>>,

        /// Enable random push disturbances.
        #[arg(long)]
        push: bool,

        /// Random seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Write an MCAP recording of the run.
        #[arg(short, long)]
        record: Option<PathBuf>,
    },

    /// Print a preset's configuration as TOML.
    Preset {
        /// Preset name.
        name: String,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Run options
// ---------------------------------------------------------------------------

struct RunOptions {
    config: Option<PathBuf>,
    preset: String,
    seconds: f64,
    goal: Option<Vec<f64>>,
    push: bool,
    seed: Option<u64>,
    record: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config: None,
            preset: "biped".into(),
            seconds: 10.0,
            goal: None,
            push: false,
            seed: None,
            record: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn load_scene(options: &RunOptions) -> Result<Scene, String> {
    let mut scene = match &options.config {
        Some(path) => Scene::from_file(path).map_err(|e| e.to_string())?,
        None => preset(&options.preset).ok_or_else(|| {
            format!(
                "unknown preset '{}' (available: {})",
                options.preset,
                PRESETS.join(", ")
            )
        })?,
    };

    if let Some(goal) = &options.goal {
        match goal.as_slice() {
            [x, y, z] => scene.config.controller.velocity.goal = [*x, *y, *z],
            _ => return Err(format!("goal needs 3 components, got {}", goal.len())),
        }
    }
    if options.push {
        scene.config.sim.push.enabled = true;
    }
    if let Some(seed) = options.seed {
        scene.config.sim.seed = seed;
    }
    scene.config.validate().map_err(|e| e.to_string())?;
    Ok(scene)
}

fn run_walk(options: &RunOptions) -> Result<(), String> {
    let scene = load_scene(options)?;
    let mut sim = Simulation::new(&scene).map_err(|e| e.to_string())?;
    if let Some(path) = &options.record {
        let recorder = Recorder::create(path).map_err(|e| e.to_string())?;
        info!(path = %path.display(), "recording");
        sim = sim.with_recorder(recorder);
    }

    sim.run_for(options.seconds).map_err(|e| e.to_string())?;
    sim.finish().map_err(|e| e.to_string())?;

    let objective = sim.objective();
    println!("scene {}: {:.2} s simulated", sim.name(), sim.time().secs_f64());
    println!("{}", sim.stats());
    println!("objective: {objective}");
    Ok(())
}

fn run_preset(name: &str) -> Result<(), String> {
    let scene = preset(name).ok_or_else(|| format!("unknown preset '{name}'"))?;
    let text = scene.config.to_toml().map_err(|e| e.to_string())?;
    print!("{text}");
    Ok(())
}

fn run_info() {
    println!("strider v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  strider-core    {}", env!("CARGO_PKG_VERSION"));
    println!("  strider-drive   {}", env!("CARGO_PKG_VERSION"));
    println!("  strider-gait    {}", env!("CARGO_PKG_VERSION"));
    println!("  strider-control {}", env!("CARGO_PKG_VERSION"));
    println!("  strider-record  {}", env!("CARGO_PKG_VERSION"));
    println!("  strider-sim     {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("presets: {}", PRESETS.join(", "));
    println!("edition: 2024");
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run {
            config,
            preset,
            seconds,
            goal,
            push,
            seed,
            record,
        }) => run_walk(&RunOptions {
            config,
            preset,
            seconds,
            goal,
            push,
            seed,
            record,
        }),
        Some(Commands::Preset { name }) => run_preset(&name),
        Some(Commands::Info) => {
            run_info();
            Ok(())
        }
        // Default: walk the biped preset
        None => run_walk(&RunOptions::default()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
