//! `sigflow` – command line front end for the windowed stream engine.
//!
//! - `sigflow run` loads `sigflow.toml` (or defaults), synthesises the
//!   configured test signal, runs a windowed RMS transform and a peak-tracking
//!   consumer over it, and prints a summary.
//! - `sigflow init` writes a default configuration file.
//! - `sigflow schema` prints the JSON schema of the configuration file.

mod collaborators;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use sigflow_runtime::config::{self, ConfigError, EngineConfig, SignalConfig, Waveform};
use sigflow_runtime::telemetry;
use sigflow_runtime::{ConsumeStage, TransformStage};
use sigflow_signal::{SignalError, generate};
use sigflow_types::{Stream, StreamBuffer, StreamFormat};
use thiserror::Error;
use tracing::info;

use crate::collaborators::{PeakTracker, Rms};

#[derive(Parser)]
#[command(name = "sigflow")]
#[command(version)]
#[command(about = "Frame-windowed stream transform and consume engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo pipeline over a synthetic signal
    Run {
        /// Configuration file
        #[arg(long, short, default_value_os_t = config::config_path())]
        config: PathBuf,

        /// Override window.frame (e.g. "512", "0.5s", "20ms")
        #[arg(long)]
        frame: Option<String>,

        /// Override window.delta
        #[arg(long)]
        delta: Option<String>,

        /// Sum all signal dimensions into one before processing
        #[arg(long)]
        mix: bool,
    },

    /// Write a default configuration file
    Init {
        /// Destination file
        #[arg(long, short, default_value_os_t = config::config_path())]
        config: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error("schema rendering failed: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("{} already exists (use --force to replace it)", .0.display())]
    Exists(PathBuf),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = telemetry::init_tracing("sigflow");

    let result = match cli.command {
        Commands::Run {
            config,
            frame,
            delta,
            mix,
        } => cmd_run(config, frame, delta, mix),
        Commands::Init { config, force } => cmd_init(config, force),
        Commands::Schema => cmd_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_run(
    path: PathBuf,
    frame: Option<String>,
    delta: Option<String>,
    mix: bool,
) -> Result<(), CliError> {
    let mut cfg = match config::load_from(&path)? {
        Some(cfg) => {
            println!("  Config loaded from {}", path.display().to_string().bold());
            cfg
        }
        None => {
            println!(
                "  {} not found, using defaults.",
                path.display().to_string().dimmed()
            );
            let mut cfg = EngineConfig::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    };
    if let Some(frame) = frame {
        cfg.window.frame = frame;
    }
    if let Some(delta) = delta {
        cfg.window.delta = delta;
    }
    cfg.validate()?;

    let mut signal = synthesize(&cfg.signal)?;
    if mix {
        generate::sum(&mut signal)?;
    }
    info!(num = signal.num(), dim = signal.dim(), sr = signal.sr(), "signal ready");
    println!("\n{}", "Input".bold().cyan());
    println!("{signal}");

    let mut rms = TransformStage::new("rms", cfg.window.clone(), Rms::default());
    let envelope = rms.run(&signal, &[])?;
    println!("\n{} ({} windows)", "RMS envelope".bold().cyan(), rms.transformer().windows());
    println!("{envelope}");
    for d in 0..envelope.dim() {
        let mean = column_mean(&envelope, d);
        println!("  dim {d}: mean rms {}", format!("{mean:.4}").green());
    }

    let mut peaks = ConsumeStage::new("peaks", cfg.window.clone(), PeakTracker::default());
    let calls = peaks.run(&signal)?;
    println!("\n{} ({calls} windows)", "Peak".bold().cyan());
    match peaks.consumer().peak() {
        Some(peak) => println!(
            "  |x| = {} in the window starting at {:.3}s",
            format!("{:.4}", peak.value).green(),
            peak.time
        ),
        None => println!("  {}", "no windows consumed".yellow()),
    }
    Ok(())
}

fn cmd_init(path: PathBuf, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Exists(path));
    }
    config::save_to(&EngineConfig::default(), &path)?;
    println!("  {} {}", "✓ Wrote".green(), path.display().to_string().bold());
    Ok(())
}

fn cmd_schema() -> Result<(), CliError> {
    println!("{}", config::json_schema()?);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn synthesize(signal: &SignalConfig) -> Result<StreamBuffer, SignalError> {
    let mut stream = StreamBuffer::new(StreamFormat::of::<f32>(signal.dims(), signal.sample_rate));
    generate::series(&mut stream, signal.duration, signal.offset)?;
    match signal.waveform {
        Waveform::Sine => generate::sine(&mut stream, &signal.frequencies, &signal.amplitudes)?,
        Waveform::Cosine => generate::cosine(&mut stream, &signal.frequencies, &signal.amplitudes)?,
        Waveform::Noise => generate::random(&mut stream)?,
    }
    Ok(stream)
}

fn column_mean(stream: &StreamBuffer, dimension: usize) -> f64 {
    let values: Vec<f64> = (0..stream.num())
        .filter_map(|i| stream.value::<f32>(i, dimension).ok())
        .map(f64::from)
        .collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
