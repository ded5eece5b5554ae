//! The simulation context and its per-frame step.

use std::io::Cursor;
use std::sync::Arc;

use glam::Vec3;
use kobold_camera::{ActiveCamera, CameraRig};
use kobold_config::Config;
use kobold_inventory::{
    EquipmentDatabase, EquipmentDef, EquipmentId, EquipmentSlot, GroundPrefab, Inventory,
    InventoryError,
};
use kobold_lod::{ConsumerArena, ConsumerId, ConsumerType, LodManager, TickReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::SimError;
use crate::host::HeadlessHost;
use crate::wanderer::Wanderer;

/// Half-width of the square consumers are scattered over, in meters.
const SCATTER_EXTENT: f32 = 200.0;

/// Top speed of a scattered consumer, in meters per second.
const MAX_DRIFT_SPEED: f32 = 3.0;

/// What one [`Simulation::step`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub lod: TickReport,
}

/// Owns every subsystem of a running session.
pub struct Simulation {
    lod: LodManager<ConsumerId>,
    consumers: ConsumerArena<Wanderer>,
    kinds: FxHashMap<ConsumerId, ConsumerType>,
    camera: CameraRig,
    inventory: Inventory,
    host: HeadlessHost,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: &Config, database: Arc<EquipmentDatabase>) -> Result<Self, SimError> {
        config.lod.validate()?;
        let mut camera = CameraRig::new(&config.camera)?;
        camera.set_camera_position(ActiveCamera::FirstPerson, Some(Vec3::new(0.0, 1.6, 0.0)));
        camera.set_camera_position(ActiveCamera::ThirdPerson, Some(Vec3::new(0.0, 3.0, -4.0)));
        camera.set_camera_position(ActiveCamera::Free, Some(Vec3::new(0.0, 20.0, 0.0)));

        info!(
            pools = config.lod.pools.len(),
            equipment = database.len(),
            camera = %camera.mode(),
            "simulation created"
        );
        Ok(Self {
            lod: LodManager::from_config(&config.lod),
            consumers: ConsumerArena::new(),
            kinds: FxHashMap::default(),
            camera,
            inventory: Inventory::new(database),
            host: HeadlessHost::default(),
            ticks: 0,
        })
    }

    pub fn lod(&self) -> &LodManager<ConsumerId> {
        &self.lod
    }

    pub fn consumers(&self) -> &ConsumerArena<Wanderer> {
        &self.consumers
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Spawn a consumer and register it with the pool for `consumer_type`.
    /// Returns `None`, spawning nothing, if no pool serves that type.
    pub fn spawn_consumer(&mut self, consumer_type: &str, wanderer: Wanderer) -> Option<ConsumerId> {
        if self.lod.pool(consumer_type).is_none() {
            debug!(consumer_type, "refusing consumer without a pool");
            return None;
        }
        let id = self.consumers.spawn(wanderer);
        self.lod.register(id, consumer_type);
        self.kinds.insert(id, ConsumerType::new(consumer_type));
        Some(id)
    }

    /// Destroy a consumer without unregistering it; its pool prunes the stale
    /// handle on the next step.
    pub fn destroy_consumer(&mut self, id: ConsumerId) -> bool {
        self.kinds.remove(&id);
        self.consumers.despawn(id).is_some()
    }

    /// Unregister a consumer from its pool, then destroy it.
    pub fn retire_consumer(&mut self, id: ConsumerId) -> bool {
        if let Some(kind) = self.kinds.remove(&id) {
            self.lod.unregister(id, kind.as_str());
        }
        self.consumers.despawn(id).is_some()
    }

    /// Spawn `per_pool` drifting consumers into every pool, deterministically
    /// from `seed`.
    pub fn scatter_consumers(&mut self, per_pool: u32, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let types: Vec<String> = self
            .lod
            .consumer_types()
            .map(|t| t.as_str().to_string())
            .collect();
        for consumer_type in &types {
            for _ in 0..per_pool {
                let position = Vec3::new(
                    rng.random_range(-SCATTER_EXTENT..SCATTER_EXTENT),
                    0.0,
                    rng.random_range(-SCATTER_EXTENT..SCATTER_EXTENT),
                );
                let velocity = Vec3::new(
                    rng.random_range(-MAX_DRIFT_SPEED..MAX_DRIFT_SPEED),
                    0.0,
                    rng.random_range(-MAX_DRIFT_SPEED..MAX_DRIFT_SPEED),
                );
                self.spawn_consumer(consumer_type, Wanderer::new(position, velocity));
            }
        }
        info!(
            consumers = self.consumers.len(),
            "scattered LOD consumers"
        );
    }

    /// Advance one frame: move consumers, ease the HUD, then rank every pool
    /// from the camera's viewpoint.
    pub fn step(&mut self, dt: f32) -> StepReport {
        for (_, wanderer) in self.consumers.iter_mut() {
            wanderer.advance(dt);
        }
        self.camera.update(dt);
        let lod = self.lod.tick(&mut self.consumers, &self.camera);
        self.ticks += 1;
        StepReport {
            tick: self.ticks,
            lod,
        }
    }

    pub fn equip(&mut self, id: EquipmentId, ground: Option<GroundPrefab>) -> Result<(), SimError> {
        self.inventory.pickup(id, ground, &mut self.host)?;
        Ok(())
    }

    pub fn unequip(&mut self, id: EquipmentId, drop_on_ground: bool) -> bool {
        self.inventory.remove(id, drop_on_ground, &mut self.host)
    }

    /// Equip the `step`-th database item, wrapping around the database, or
    /// unequip it if already worn. Returns the toggled id, or `None` for an
    /// empty database.
    pub fn toggle_equipment(&mut self, step: usize) -> Result<Option<EquipmentId>, SimError> {
        let database = self.inventory.database();
        let Some(id) = database
            .iter()
            .nth(step % database.len().max(1))
            .map(|def| def.id)
        else {
            return Ok(None);
        };
        if self.inventory.contains(id) {
            self.unequip(id, true);
        } else {
            self.equip(id, None)?;
        }
        Ok(Some(id))
    }

    /// Encoded replication snapshot of the player's inventory.
    pub fn inventory_snapshot(&self) -> Result<Vec<u8>, SimError> {
        Ok(self.inventory.snapshot().encode()?)
    }

    /// Reconcile the player's inventory with received snapshot bytes.
    pub fn apply_inventory_snapshot(&mut self, bytes: &[u8]) -> Result<bool, SimError> {
        Ok(self.inventory.apply_snapshot_bytes(bytes, &mut self.host)?)
    }

    pub fn save_inventory(&self) -> Result<Vec<u8>, SimError> {
        let mut bytes = Vec::new();
        self.inventory.save(&mut bytes)?;
        Ok(bytes)
    }

    pub fn load_inventory(&mut self, bytes: &[u8]) -> Result<bool, SimError> {
        Ok(self.inventory.load(&mut Cursor::new(bytes), &mut self.host)?)
    }
}

/// Equipment available when no database file is configured.
pub fn default_equipment() -> Result<EquipmentDatabase, InventoryError> {
    let items = [
        ("Sun Hat", EquipmentSlot::Head),
        ("Bandana", EquipmentSlot::Neck),
        ("Apron", EquipmentSlot::Chest),
        ("Backpack", EquipmentSlot::Back),
        ("Gloves", EquipmentSlot::Hands),
        ("Boots", EquipmentSlot::Feet),
        ("Tail Ribbon", EquipmentSlot::Tail),
        ("Watering Can", EquipmentSlot::Misc),
    ];
    EquipmentDatabase::new(
        items
            .iter()
            .enumerate()
            .map(|(index, &(name, slot))| EquipmentDef {
                id: EquipmentId(index as i16),
                name: name.to_string(),
                slot,
            })
            .collect(),
    )
}
