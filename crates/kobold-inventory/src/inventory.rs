//! A character's equipment list.

use std::collections::VecDeque;
use std::sync::Arc;

use kobold_events::{Observers, SubscriptionId};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::equipment::{EquipmentDatabase, EquipmentDef, EquipmentId, EquipmentSlot};
use crate::error::InventoryError;

/// An engine object created to show worn equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayHandle(pub u64);

/// The ground item an equipment piece was picked up from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroundPrefab(pub u32);

/// The character-side effects of wearing equipment.
pub trait EquipmentHost {
    /// Attach `equipment` to the character and return the objects created to
    /// display it.
    fn on_equip(&mut self, equipment: &EquipmentDef, ground: Option<GroundPrefab>)
    -> Vec<DisplayHandle>;

    /// Detach `equipment`, optionally spawning it back on the ground.
    fn on_unequip(&mut self, equipment: &EquipmentDef, drop_on_ground: bool);

    fn destroy_display(&mut self, display: DisplayHandle);
}

/// Ordered list of worn equipment. The same item may be worn more than once;
/// each pickup records its own set of display objects and removals consume
/// them oldest first.
pub struct Inventory {
    database: Arc<EquipmentDatabase>,
    equipment: Vec<EquipmentId>,
    displays: FxHashMap<EquipmentId, VecDeque<Vec<DisplayHandle>>>,
    changed: Observers<[EquipmentId]>,
}

impl Inventory {
    pub fn new(database: Arc<EquipmentDatabase>) -> Self {
        Self {
            database,
            equipment: Vec::new(),
            displays: FxHashMap::default(),
            changed: Observers::new(),
        }
    }

    pub fn database(&self) -> &EquipmentDatabase {
        &self.database
    }

    pub fn len(&self) -> usize {
        self.equipment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty()
    }

    /// Worn equipment in pickup order.
    pub fn equipment(&self) -> &[EquipmentId] {
        &self.equipment
    }

    /// A copy of the worn equipment list.
    pub fn all(&self) -> Vec<EquipmentId> {
        self.equipment.clone()
    }

    pub fn contains(&self, id: EquipmentId) -> bool {
        self.equipment.contains(&id)
    }

    /// How many copies of `id` are worn.
    pub fn instance_count(&self, id: EquipmentId) -> usize {
        self.equipment.iter().filter(|&&worn| worn == id).count()
    }

    /// The earliest-picked item occupying `slot`.
    pub fn in_slot(&self, slot: EquipmentSlot) -> Option<EquipmentId> {
        self.equipment
            .iter()
            .copied()
            .find(|&id| self.database.get(id).is_some_and(|def| def.slot == slot))
    }

    /// Call `callback` with the new list after every pickup and removal.
    pub fn on_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&[EquipmentId]) + Send + 'static,
    {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }

    /// Wear `id`, creating its display objects through `host`.
    pub fn pickup<H>(
        &mut self,
        id: EquipmentId,
        ground: Option<GroundPrefab>,
        host: &mut H,
    ) -> Result<(), InventoryError>
    where
        H: EquipmentHost + ?Sized,
    {
        let def = self.database.resolve(id)?;
        let displays = host.on_equip(def, ground);
        debug!(item = %def.name, displays = displays.len(), "equipment picked up");
        self.displays.entry(id).or_default().push_back(displays);
        self.equipment.push(id);
        self.changed.notify(&self.equipment);
        Ok(())
    }

    /// Take off the first worn copy of `id`. Returns `false` if none is worn.
    pub fn remove<H>(&mut self, id: EquipmentId, drop_on_ground: bool, host: &mut H) -> bool
    where
        H: EquipmentHost + ?Sized,
    {
        let Some(index) = self.equipment.iter().position(|&worn| worn == id) else {
            return false;
        };
        self.equipment.remove(index);

        if let Some(def) = self.database.get(id) {
            host.on_unequip(def, drop_on_ground);
            debug!(item = %def.name, drop_on_ground, "equipment removed");
        }
        if let Some(sets) = self.displays.get_mut(&id) {
            if let Some(oldest) = sets.pop_front() {
                for display in oldest {
                    host.destroy_display(display);
                }
            }
            if sets.is_empty() {
                self.displays.remove(&id);
            }
        }

        self.changed.notify(&self.equipment);
        true
    }

    /// Take off whatever occupies `slot`. Returns `false` if the slot is empty.
    pub fn remove_slot<H>(&mut self, slot: EquipmentSlot, drop_on_ground: bool, host: &mut H) -> bool
    where
        H: EquipmentHost + ?Sized,
    {
        match self.in_slot(slot) {
            Some(id) => self.remove(id, drop_on_ground, host),
            None => false,
        }
    }

    /// Reconcile with an authoritative list.
    ///
    /// Identical lists (same ids, same order) are left untouched. Otherwise
    /// everything is taken off without dropping and `target` is put on in
    /// order. Every id is validated first, so an unknown id leaves the
    /// inventory unchanged. Returns whether anything changed.
    pub fn replace_with<H>(
        &mut self,
        target: &[EquipmentId],
        host: &mut H,
    ) -> Result<bool, InventoryError>
    where
        H: EquipmentHost + ?Sized,
    {
        if self.equipment == target {
            return Ok(false);
        }
        for &id in target {
            self.database.resolve(id)?;
        }

        while let Some(&first) = self.equipment.first() {
            self.remove(first, false, host);
        }
        for &id in target {
            self.pickup(id, None, host)?;
        }
        Ok(true)
    }
}
