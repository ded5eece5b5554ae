//! Equipment host for running without an engine.

use kobold_inventory::{DisplayHandle, EquipmentDef, EquipmentHost, GroundPrefab};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Tracks display objects as plain ids and counts drops.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_display: u64,
    live: FxHashSet<DisplayHandle>,
    pub dropped: u32,
}

impl HeadlessHost {
    /// Display objects currently alive.
    pub fn live_displays(&self) -> usize {
        self.live.len()
    }
}

impl EquipmentHost for HeadlessHost {
    fn on_equip(
        &mut self,
        equipment: &EquipmentDef,
        ground: Option<GroundPrefab>,
    ) -> Vec<DisplayHandle> {
        let display = DisplayHandle(self.next_display);
        self.next_display += 1;
        self.live.insert(display);
        trace!(item = %equipment.name, from_ground = ground.is_some(), "display created");
        vec![display]
    }

    fn on_unequip(&mut self, _equipment: &EquipmentDef, drop_on_ground: bool) {
        if drop_on_ground {
            self.dropped += 1;
        }
    }

    fn destroy_display(&mut self, display: DisplayHandle) {
        self.live.remove(&display);
    }
}
