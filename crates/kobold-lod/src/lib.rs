//! Level-of-detail consumer ranking: resource pools, the incremental
//! distance-ranking pass, tier flags, and ECS integration.
//!
//! Each [`ResourcePool`] keeps its consumers approximately ordered by distance
//! to the active viewpoint. Every tick the [`LodManager`] runs one forward
//! adjacent-swap pass per pool and pushes `close` / `very_far` flags to the
//! consumers whose rank crossed a tier boundary.

mod arena;
mod consumer;
pub mod ecs;
mod manager;
mod pool;
mod tier;
mod viewpoint;

pub use arena::{ConsumerArena, ConsumerId};
pub use consumer::{ConsumerStore, ConsumerType, LodConsumer, PointConsumer};
pub use manager::{LodManager, TickReport};
pub use pool::{PassReport, ResourcePool};
pub use tier::{PoolThresholds, Tier};
pub use viewpoint::{FallbackViewpoint, ViewpointSource};
