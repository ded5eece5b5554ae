//! Simulation setup errors.

use kobold_camera::ParseCameraModeError;
use kobold_config::ConfigError;
use kobold_inventory::InventoryError;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Camera(#[from] ParseCameraModeError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
