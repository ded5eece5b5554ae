//! Save-file and replication encodings of an inventory.
//!
//! Save format (little-endian): `count: i32` followed by `count` × `id: i16`.
//! Both encodings carry at most [`MAX_REPLICATED_ITEMS`] items.
//! Replication carries an [`InventorySnapshot`] encoded with postcard; the
//! receiving side reconciles through [`Inventory::replace_with`].

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equipment::EquipmentId;
use crate::error::InventoryError;
use crate::inventory::{EquipmentHost, Inventory};

/// Most items a snapshot or save file may carry.
pub const MAX_REPLICATED_ITEMS: usize = i16::MAX as usize;

/// Replicated inventory state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub ids: Vec<EquipmentId>,
}

impl InventorySnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, InventoryError> {
        if self.ids.len() > MAX_REPLICATED_ITEMS {
            return Err(InventoryError::TooMany(self.ids.len()));
        }
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, InventoryError> {
        let snapshot: Self = postcard::from_bytes(bytes)?;
        if snapshot.ids.len() > MAX_REPLICATED_ITEMS {
            return Err(InventoryError::TooMany(snapshot.ids.len()));
        }
        Ok(snapshot)
    }
}

impl Inventory {
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot { ids: self.all() }
    }

    /// Reconcile with a received snapshot. Returns whether anything changed.
    pub fn apply_snapshot<H>(
        &mut self,
        snapshot: &InventorySnapshot,
        host: &mut H,
    ) -> Result<bool, InventoryError>
    where
        H: EquipmentHost + ?Sized,
    {
        let changed = self.replace_with(&snapshot.ids, host)?;
        if changed {
            debug!(items = snapshot.ids.len(), "inventory reconciled from snapshot");
        }
        Ok(changed)
    }

    /// Decode and apply postcard-encoded snapshot bytes.
    pub fn apply_snapshot_bytes<H>(
        &mut self,
        bytes: &[u8],
        host: &mut H,
    ) -> Result<bool, InventoryError>
    where
        H: EquipmentHost + ?Sized,
    {
        let snapshot = InventorySnapshot::decode(bytes)?;
        self.apply_snapshot(&snapshot, host)
    }

    /// Write the save-file encoding.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), InventoryError> {
        if self.len() > MAX_REPLICATED_ITEMS {
            return Err(InventoryError::TooMany(self.len()));
        }
        writer.write_all(&(self.len() as i32).to_le_bytes())?;
        for id in self.equipment() {
            writer.write_all(&id.0.to_le_bytes())?;
        }
        Ok(())
    }

    /// Read a save-file encoding and reconcile with it. The inventory is left
    /// unchanged if the stream is malformed or names an unknown id.
    pub fn load<R, H>(&mut self, reader: &mut R, host: &mut H) -> Result<bool, InventoryError>
    where
        R: Read,
        H: EquipmentHost + ?Sized,
    {
        let mut count_bytes = [0u8; 4];
        reader.read_exact(&mut count_bytes)?;
        let count = i32::from_le_bytes(count_bytes);
        if count < 0 {
            return Err(InventoryError::NegativeCount(count));
        }
        if count as usize > MAX_REPLICATED_ITEMS {
            return Err(InventoryError::TooMany(count as usize));
        }

        let mut ids = Vec::with_capacity(count as usize);
        let mut id_bytes = [0u8; 2];
        for _ in 0..count {
            reader.read_exact(&mut id_bytes)?;
            ids.push(EquipmentId(i16::from_le_bytes(id_bytes)));
        }
        self.replace_with(&ids, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tests::{BOOTS, HAT, RecordingHost, SCARF, database};
    use std::io::Cursor;

    #[test]
    fn test_save_layout() {
        let mut host = RecordingHost::default();
        let mut inv = Inventory::new(database());
        inv.pickup(SCARF, None, &mut host).unwrap();
        inv.pickup(BOOTS, None, &mut host).unwrap();

        let mut bytes = Vec::new();
        inv.save(&mut bytes).unwrap();
        assert_eq!(bytes, vec![2, 0, 0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn test_load_restores_equipment() {
        let mut host = RecordingHost::default();
        let mut source = Inventory::new(database());
        source.pickup(HAT, None, &mut host).unwrap();
        source.pickup(HAT, None, &mut host).unwrap();
        source.pickup(SCARF, None, &mut host).unwrap();
        let mut bytes = Vec::new();
        source.save(&mut bytes).unwrap();

        let mut restored = Inventory::new(database());
        assert!(restored.load(&mut Cursor::new(bytes), &mut host).unwrap());
        assert_eq!(restored.equipment(), source.equipment());
    }

    #[test]
    fn test_load_negative_count() {
        let mut host = RecordingHost::default();
        let mut inv = Inventory::new(database());
        let bytes = (-1i32).to_le_bytes().to_vec();
        let result = inv.load(&mut Cursor::new(bytes), &mut host);
        assert!(matches!(result, Err(InventoryError::NegativeCount(-1))));
    }

    #[test]
    fn test_load_count_over_limit() {
        let mut host = RecordingHost::default();
        let mut inv = Inventory::new(database());
        let bytes = 40_000i32.to_le_bytes().to_vec();
        let result = inv.load(&mut Cursor::new(bytes), &mut host);
        assert!(matches!(result, Err(InventoryError::TooMany(40_000))));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_save_over_limit_writes_nothing() {
        let mut host = RecordingHost::default();
        let mut inv = Inventory::new(database());
        for _ in 0..=MAX_REPLICATED_ITEMS {
            inv.pickup(HAT, None, &mut host).unwrap();
        }
        let mut bytes = Vec::new();
        assert!(matches!(
            inv.save(&mut bytes),
            Err(InventoryError::TooMany(n)) if n == MAX_REPLICATED_ITEMS + 1
        ));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_load_truncated_stream() {
        let mut host = RecordingHost::default();
        let mut inv = Inventory::new(database());
        inv.pickup(HAT, None, &mut host).unwrap();
        let bytes = vec![3, 0, 0, 0, 1, 0];
        let result = inv.load(&mut Cursor::new(bytes), &mut host);
        assert!(matches!(result, Err(InventoryError::Io(_))));
        assert_eq!(inv.equipment(), &[HAT]);
    }

    #[test]
    fn test_load_unknown_id() {
        let mut host = RecordingHost::default();
        let mut inv = Inventory::new(database());
        let bytes = vec![1, 0, 0, 0, 0x10, 0x27];
        let result = inv.load(&mut Cursor::new(bytes), &mut host);
        assert!(matches!(
            result,
            Err(InventoryError::UnknownEquipment(10_000))
        ));
    }

    #[test]
    fn test_snapshot_reconciles_remote_inventory() {
        let mut host = RecordingHost::default();
        let mut owner = Inventory::new(database());
        let mut remote = Inventory::new(database());
        owner.pickup(BOOTS, None, &mut host).unwrap();
        owner.pickup(HAT, None, &mut host).unwrap();

        let bytes = owner.snapshot().encode().unwrap();
        assert!(remote.apply_snapshot_bytes(&bytes, &mut host).unwrap());
        assert_eq!(remote.equipment(), owner.equipment());

        // A second identical snapshot changes nothing.
        assert!(!remote.apply_snapshot_bytes(&bytes, &mut host).unwrap());
    }

    #[test]
    fn test_snapshot_limit() {
        let snapshot = InventorySnapshot {
            ids: vec![HAT; MAX_REPLICATED_ITEMS + 1],
        };
        assert!(matches!(
            snapshot.encode(),
            Err(InventoryError::TooMany(n)) if n == MAX_REPLICATED_ITEMS + 1
        ));
    }

    #[test]
    fn test_garbage_snapshot_is_error() {
        let mut host = RecordingHost::default();
        let mut inv = Inventory::new(database());
        let result = inv.apply_snapshot_bytes(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff], &mut host);
        assert!(matches!(result, Err(InventoryError::Postcard(_))));
    }
}
