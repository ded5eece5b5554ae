//! Configuration system for the Kobold simulation.
//!
//! Settings persist to disk as `config.ron`. Supports CLI overrides via clap,
//! hot-reload detection, and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, InventoryConfig, LodConfig, PoolConfig, default_config_dir,
};
pub use error::ConfigError;
