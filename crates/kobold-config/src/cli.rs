//! Command-line argument parsing for the headless simulation.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Kobold simulation command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "kobold-sim", about = "Headless Kobold simulation")]
pub struct CliArgs {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 600)]
    pub ticks: u32,

    /// Consumers spawned per LOD pool.
    #[arg(long, default_value_t = 64)]
    pub consumers: u32,

    /// Initial camera mode.
    #[arg(long)]
    pub camera_mode: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref mode) = args.camera_mode {
            self.camera.start_mode = mode.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
