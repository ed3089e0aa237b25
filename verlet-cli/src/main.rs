mod scenario;

use clap::{Parser, Subcommand};
use log::info;
use scenario::{LawKind, ScenarioArgs};
use std::io::Write;
use std::path::{Path, PathBuf};
use verlet_core::diagnostics::kinetic_energy;
use verlet_core::{run, RunConfig, Snapshot};

#[derive(Parser)]
#[command(name = "verlet")]
#[command(about = "Velocity Verlet particle integrator with binary snapshots", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate a generated scenario and write snapshots
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Time step
        #[arg(long, default_value_t = 0.01)]
        dt: f64,

        /// Number of steps to take
        #[arg(long, default_value_t = 1000)]
        steps: u64,

        /// Write a snapshot every K steps (0 disables snapshots)
        #[arg(long, default_value_t = 100)]
        snapshot_every: u64,

        /// Directory for snapshot files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Snapshot file name prefix
        #[arg(long, default_value = "snapshot")]
        prefix: String,
    },
    /// Print the contents of a snapshot file
    Inspect {
        /// Path to the snapshot
        file: PathBuf,

        /// Number of particles to print
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Run {
            scenario,
            dt,
            steps,
            snapshot_every,
            output,
            prefix,
        } => {
            let config = run_config(dt, steps, snapshot_every, output, prefix);
            run_scenario(&scenario, &config)
        }
        Commands::Inspect { file, limit } => {
            inspect_file(&file, limit, &mut std::io::stdout().lock())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Map `run` flags onto the driver config; an interval of 0 turns snapshots off
fn run_config(dt: f64, steps: u64, snapshot_every: u64, output: PathBuf, prefix: String) -> RunConfig {
    RunConfig {
        dt,
        steps,
        snapshot_every: (snapshot_every > 0).then_some(snapshot_every),
        output_dir: output,
        prefix,
    }
}

fn run_scenario(args: &ScenarioArgs, config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.snapshot_every.is_some() {
        std::fs::create_dir_all(&config.output_dir)?;
    }

    let (mut ensemble, law) = scenario::build(args)?;
    info!(
        "running {} particles under {:?} for {} steps of dt = {}",
        ensemble.len(),
        args.law,
        config.steps,
        config.dt
    );

    let summary = run(&mut ensemble, law.as_ref(), config)?;

    println!("steps = {}", summary.steps);
    println!("snapshots = {}", summary.snapshots.len());
    println!("kinetic_energy = {}", summary.kinetic_energy);
    if args.law == LawKind::Harmonic {
        let potential: f64 = ensemble
            .positions()
            .iter()
            .zip(ensemble.masses())
            .map(|(x, m)| 0.5 * m * args.strength * x.length_squared())
            .sum();
        println!("total_energy = {}", summary.kinetic_energy + potential);
    }
    Ok(())
}

fn inspect_file(
    file: &Path,
    limit: usize,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::read_from(file)?;
    let unit_masses = vec![1.0; snapshot.len()];

    writeln!(out, "particles = {}", snapshot.len())?;
    writeln!(
        out,
        "kinetic_energy (unit masses) = {}",
        kinetic_energy(&unit_masses, &snapshot.velocities)
    )?;
    for (i, (x, v)) in snapshot
        .positions
        .iter()
        .zip(&snapshot.velocities)
        .take(limit)
        .enumerate()
    {
        writeln!(
            out,
            "{:>6}  x = ({:.6}, {:.6}, {:.6})  v = ({:.6}, {:.6}, {:.6})",
            i, x.x, x.y, x.z, v.x, v.y, v.z
        )?;
    }
    Ok(())
}
