//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Level-of-detail pools.
    pub lod: LodConfig,
    /// Camera rig settings.
    pub camera: CameraConfig,
    /// Inventory / equipment settings.
    pub inventory: InventoryConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Level-of-detail configuration: one entry per consumer pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Pools in declaration order. Each consumer type may appear once.
    pub pools: Vec<PoolConfig>,
}

/// Rank thresholds for a single consumer pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolConfig {
    /// Consumer type routed into this pool (e.g. `"foliage"`).
    pub consumer_type: String,
    /// Number of top-ranked consumers rendered at full detail.
    pub high_quality_count: usize,
    /// Additional ranks admitted to medium detail before the rest fall to far.
    pub medium_quality_count: usize,
}

/// Camera rig configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Mode the rig starts in (`first_person`, `third_person`, `free_cam`, `free_cam_locked`).
    pub start_mode: String,
    /// Horizontal spacing between HUD mode markers, in UI units.
    pub slider_spacing: f32,
    /// Easing rate of the HUD mode marker (per second).
    pub slider_speed: f32,
}

/// Inventory configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InventoryConfig {
    /// Equipment database file, relative to the config directory.
    pub database: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write JSON logs to the config directory's `logs/` folder.
    pub file_logging: bool,
}

// --- Default implementations ---

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            pools: vec![
                PoolConfig {
                    consumer_type: "kobold".to_string(),
                    high_quality_count: 4,
                    medium_quality_count: 8,
                },
                PoolConfig {
                    consumer_type: "plant".to_string(),
                    high_quality_count: 16,
                    medium_quality_count: 32,
                },
                PoolConfig {
                    consumer_type: "fluid".to_string(),
                    high_quality_count: 2,
                    medium_quality_count: 4,
                },
            ],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_mode: "first_person".to_string(),
            slider_spacing: 30.0,
            slider_speed: 2.0,
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("equipment.ron"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: false,
        }
    }
}

/// Platform config directory for the simulation (`<config>/kobold`), or the
/// working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("kobold"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Validation ---

impl LodConfig {
    /// Reject configurations that declare the same consumer type twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for pool in &self.pools {
            if !seen.insert(pool.consumer_type.as_str()) {
                return Err(ConfigError::DuplicatePool(pool.consumer_type.clone()));
            }
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join("config.ron"))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(config_path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.lod.validate()?;
        Ok(config)
    }
}
