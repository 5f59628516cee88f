//! Tweener CLI
//!
//! Play tween scenes against a simulated clock and explore the easing catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tweener_core::Easing;

mod config;
mod demo;
mod scene;

use config::SceneConfig;
use scene::{Format, Scene};

#[derive(Parser)]
#[command(name = "tweener")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tweener CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scene file and print every frame
    Run {
        /// Scene file
        scene: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Walk through the core features
    Demo,

    /// Print the easing catalog sampled over [0, 1]
    Easings {
        /// Number of intervals per curve
        #[arg(short, long, default_value = "4")]
        samples: usize,
    },

    /// Write a sample scene file
    Init {
        /// Destination path
        #[arg(default_value = "scene.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { scene, format } => cmd_run(&scene, format),
        Commands::Demo => cmd_demo(),
        Commands::Easings { samples } => cmd_easings(samples),
        Commands::Init { path } => cmd_init(&path),
    }
}

fn cmd_run(path: &Path, format: Format) -> Result<()> {
    let config = SceneConfig::load(path)?;
    info!("Running {}", path.display());

    let mut scene = Scene::new(&config)?;
    let frames = scene.run();
    let output = scene::render(&frames, format)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if format == Format::Json {
        writeln!(stdout)?;
    }
    Ok(())
}

fn cmd_demo() -> Result<()> {
    let mut stdout = io::stdout().lock();
    demo::run(&mut stdout)
}

fn cmd_easings(samples: usize) -> Result<()> {
    if samples == 0 {
        anyhow::bail!("--samples must be at least 1");
    }
    print!("{}", easing_table(samples));
    Ok(())
}

/// One row per catalog curve, sampled at `samples + 1` evenly spaced points
fn easing_table(samples: usize) -> String {
    let width = Easing::ALL
        .iter()
        .map(|easing| easing.name().len())
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    for easing in Easing::ALL {
        let _ = write!(out, "{:<width$}", easing.name(), width = width);
        for i in 0..=samples {
            let t = i as f64 / samples as f64;
            let _ = write!(out, " {:>7.3}", easing.apply(t));
        }
        if easing.overshoots() {
            out.push_str("  (overshoots)");
        }
        out.push('\n');
    }
    out
}

fn cmd_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    let content = SceneConfig::sample().to_toml()?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Created {}", path.display());
    println!("Wrote sample scene to {}", path.display());
    println!("Play it with: tweener run {}", path.display());
    Ok(())
}
