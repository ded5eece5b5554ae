//! A drifting LOD consumer used by the headless simulation.

use glam::Vec3;
use kobold_lod::LodConsumer;

/// Moves at a constant velocity and remembers the flags it was given, and how
/// often each changed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Wanderer {
    pub position: Vec3,
    pub velocity: Vec3,
    pub close: bool,
    pub very_far: bool,
    pub tier_changes: u32,
}

impl Wanderer {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            ..Default::default()
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

impl LodConsumer for Wanderer {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_close(&mut self, close: bool) {
        if self.close != close {
            self.tier_changes += 1;
        }
        self.close = close;
    }

    fn set_very_far(&mut self, very_far: bool) {
        if self.very_far != very_far {
            self.tier_changes += 1;
        }
        self.very_far = very_far;
    }
}
