//! pinch_keyboard — entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pinch_core::Config;
use pinch_keyboard::app::{run, AppConfig, Mode, SessionSummary};

#[derive(Parser, Debug)]
#[command(name = "pinch_keyboard", version, about = "Type by touching index finger to thumb over an on-screen keyboard")]
struct Cli {
    /// TOML file with thresholds, layout and camera settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Send typed keys to the focused application as real keystrokes
    #[arg(long)]
    inject: bool,

    /// Drive the hand with the mouse even when built with camera support
    #[arg(long)]
    simulate: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = real_main(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("could not load configuration")?;
    if cli.inject {
        config.injection.enabled = true;
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mode = if cli.simulate { Mode::Simulation } else { Mode::default_for_build() };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         Pinch Keyboard — touch index to thumb to type         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match mode {
        Mode::Simulation => {
            println!("  Mode: Mouse simulation  (use --features camera for a webcam)");
            println!("  Move the mouse over a key, hold the left button or Space to pinch.");
        }
        #[cfg(feature = "camera")]
        Mode::Camera => println!("  Mode: Camera {}", config.camera.index),
    }
    println!("  Press Q or Esc in the window to quit.");
    println!();

    let summary = run(AppConfig { config, mode })?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(s: &SessionSummary) {
    let rule = "=".repeat(60);
    println!();
    println!("{}", rule);
    println!("PINCH KEYBOARD SESSION COMPLETE");
    println!("{}", rule);
    println!("FINAL TYPED TEXT: '{}'", s.text);
    println!("Total Characters: {}", s.chars);
    println!("Frames processed: {}", s.frames);
    println!("{}", rule);
}
