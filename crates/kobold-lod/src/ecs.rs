//! `bevy_ecs` integration: consumers as entities, the manager as a resource,
//! and the ranking pass as an exclusive system.
//!
//! Despawned entities resolve to no position and are pruned from their pool
//! on the next pass, so systems may despawn consumers without unregistering.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::consumer::ConsumerStore;
use crate::manager::{LodManager, TickReport};

/// World-space position read by the ranking pass.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct LodPosition(pub Vec3);

/// Tier flags written by the ranking pass and read by render systems.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LodFlags {
    pub close: bool,
    pub very_far: bool,
}

/// Bundle for a ranked entity.
#[derive(Bundle, Default)]
pub struct LodConsumerBundle {
    pub position: LodPosition,
    pub flags: LodFlags,
}

/// The active viewpoint for this frame. `None` skips the pass.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct Viewpoint(pub Option<Vec3>);

/// The LOD manager owned by the world.
#[derive(Resource, Debug, Default)]
pub struct LodManagerRes(pub LodManager<Entity>);

/// Report of the most recent [`lod_ranking_system`] run.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct LastLodTick(pub TickReport);

impl ConsumerStore<Entity> for World {
    fn position(&self, handle: Entity) -> Option<Vec3> {
        self.get::<LodPosition>(handle).map(|p| p.0)
    }

    fn set_close(&mut self, handle: Entity, close: bool) {
        if let Some(mut flags) = self.get_mut::<LodFlags>(handle) {
            flags.close = close;
        }
    }

    fn set_very_far(&mut self, handle: Entity, very_far: bool) {
        if let Some(mut flags) = self.get_mut::<LodFlags>(handle) {
            flags.very_far = very_far;
        }
    }
}

/// Spawn a ranked entity at `position` and register it under `consumer_type`.
pub fn spawn_lod_consumer(world: &mut World, position: Vec3, consumer_type: &str) -> Entity {
    let entity = world
        .spawn(LodConsumerBundle {
            position: LodPosition(position),
            flags: LodFlags::default(),
        })
        .id();
    if let Some(mut manager) = world.get_resource_mut::<LodManagerRes>() {
        manager.0.register(entity, consumer_type);
    }
    entity
}

/// Exclusive system: rank every pool against the [`Viewpoint`] resource.
///
/// Does nothing when no [`LodManagerRes`] has been inserted.
pub fn lod_ranking_system(world: &mut World) {
    if !world.contains_resource::<LodManagerRes>() {
        return;
    }
    let viewpoint = world.get_resource::<Viewpoint>().and_then(|v| v.0);
    let report = world.resource_scope(|world, mut manager: Mut<LodManagerRes>| {
        manager.0.tick_at(world, viewpoint)
    });
    world.insert_resource(LastLodTick(report));
}
