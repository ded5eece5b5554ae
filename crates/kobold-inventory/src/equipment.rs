//! Equipment definitions and the id-keyed database.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::InventoryError;

/// Stable identifier of an equipment definition. Saves and snapshots carry
/// only this id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(pub i16);

/// Body slot an item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Head,
    Neck,
    Chest,
    Back,
    Hands,
    Feet,
    Tail,
    Misc,
}

/// A wearable item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentDef {
    pub id: EquipmentId,
    pub name: String,
    pub slot: EquipmentSlot,
}

#[derive(Deserialize)]
struct DatabaseFile {
    equipment: Vec<EquipmentDef>,
}

/// All known equipment, addressable by id or name.
#[derive(Clone, Debug, Default)]
pub struct EquipmentDatabase {
    defs: Vec<EquipmentDef>,
    by_id: FxHashMap<EquipmentId, usize>,
}

impl EquipmentDatabase {
    /// Build a database, rejecting duplicate ids.
    pub fn new(defs: Vec<EquipmentDef>) -> Result<Self, InventoryError> {
        let mut by_id = FxHashMap::default();
        for (index, def) in defs.iter().enumerate() {
            if by_id.insert(def.id, index).is_some() {
                return Err(InventoryError::DuplicateEquipmentId(def.id.0));
            }
        }
        Ok(Self { defs, by_id })
    }

    /// Parse a RON database of the form `(equipment: [(id: 0, name: "..", slot: Head), ..])`.
    pub fn from_ron_str(source: &str) -> Result<Self, InventoryError> {
        let file: DatabaseFile = ron::from_str(source)?;
        Self::new(file.equipment)
    }

    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let source = std::fs::read_to_string(path)?;
        let database = Self::from_ron_str(&source)?;
        info!(
            path = %path.display(),
            items = database.len(),
            "loaded equipment database"
        );
        Ok(database)
    }

    pub fn get(&self, id: EquipmentId) -> Option<&EquipmentDef> {
        self.by_id.get(&id).map(|&index| &self.defs[index])
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn resolve(&self, id: EquipmentId) -> Result<&EquipmentDef, InventoryError> {
        self.get(id).ok_or(InventoryError::UnknownEquipment(id.0))
    }

    pub fn id_of(&self, name: &str) -> Option<EquipmentId> {
        self.defs.iter().find(|def| def.name == name).map(|def| def.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquipmentDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
