//! Equipment inventory: what a character wears, the engine objects shown for
//! it, change notification, and the save-file and replication encodings.
//!
//! Equipment definitions live in an [`EquipmentDatabase`] keyed by a stable
//! `i16` id; inventories, saves and snapshots only ever carry ids.

mod codec;
mod equipment;
mod error;
mod inventory;

pub use codec::{InventorySnapshot, MAX_REPLICATED_ITEMS};
pub use equipment::{EquipmentDatabase, EquipmentDef, EquipmentId, EquipmentSlot};
pub use error::InventoryError;
pub use inventory::{DisplayHandle, EquipmentHost, GroundPrefab, Inventory};
