//! Pool ownership, consumer routing, and the per-tick ranking driver.

use glam::Vec3;
use kobold_config::LodConfig;
use tracing::{debug, trace, warn};

use crate::consumer::{ConsumerStore, ConsumerType};
use crate::pool::{PassReport, ResourcePool};
use crate::tier::PoolThresholds;
use crate::viewpoint::ViewpointSource;

/// Summary of one [`LodManager::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// No viewpoint was available; nothing was touched.
    pub skipped: bool,
    /// Pools that ran a pass.
    pub pools: usize,
    /// Totals across all pools.
    pub pass: PassReport,
}

/// Owns every resource pool and ranks them once per tick.
///
/// Handles are routed to pools by [`ConsumerType`]. The manager is owned by
/// the simulation context and receives its viewpoint explicitly each tick.
#[derive(Clone, Debug)]
pub struct LodManager<H> {
    pools: Vec<ResourcePool<H>>,
}

impl<H> Default for LodManager<H> {
    fn default() -> Self {
        Self { pools: Vec::new() }
    }
}

impl<H: Copy + PartialEq> LodManager<H> {
    pub fn new(pools: Vec<ResourcePool<H>>) -> Self {
        Self { pools }
    }

    /// Build one empty pool per configured entry, in declaration order.
    pub fn from_config(config: &LodConfig) -> Self {
        let pools = config
            .pools
            .iter()
            .map(|pool| ResourcePool::new(pool.consumer_type.as_str(), PoolThresholds::from(pool)))
            .collect();
        Self { pools }
    }

    /// Add a pool after construction.
    pub fn add_pool(&mut self, pool: ResourcePool<H>) {
        self.pools.push(pool);
    }

    /// Append `handle` to every pool serving `consumer_type`. Returns `false`
    /// when no pool serves that type.
    pub fn register(&mut self, handle: H, consumer_type: &str) -> bool {
        let mut registered = false;
        for pool in self.pools_of_mut(consumer_type) {
            pool.register(handle);
            registered = true;
        }
        if registered {
            debug!(consumer_type, "LOD consumer registered");
        } else {
            warn!(consumer_type, "no LOD pool for consumer type");
        }
        registered
    }

    /// Remove the first slot holding `handle` from every pool serving
    /// `consumer_type`. Returns whether any slot was removed.
    pub fn unregister(&mut self, handle: H, consumer_type: &str) -> bool {
        let mut removed = false;
        for pool in self.pools_of_mut(consumer_type) {
            removed |= pool.unregister(handle);
        }
        if removed {
            debug!(consumer_type, "LOD consumer unregistered");
        }
        removed
    }

    /// Resolve the viewpoint once and rank every pool against it.
    pub fn tick<S, V>(&mut self, store: &mut S, source: &V) -> TickReport
    where
        S: ConsumerStore<H> + ?Sized,
        V: ViewpointSource + ?Sized,
    {
        self.tick_at(store, source.viewpoint())
    }

    /// Rank every pool against an already-resolved viewpoint.
    pub fn tick_at<S>(&mut self, store: &mut S, viewpoint: Option<Vec3>) -> TickReport
    where
        S: ConsumerStore<H> + ?Sized,
    {
        let Some(viewpoint) = viewpoint else {
            trace!("no active viewpoint, LOD pass skipped");
            return TickReport {
                skipped: true,
                ..Default::default()
            };
        };

        let mut report = TickReport::default();
        for pool in &mut self.pools {
            let pass = pool.rank(store, viewpoint);
            if pass.pruned > 0 {
                debug!(
                    consumer_type = %pool.consumer_type(),
                    pruned = pass.pruned,
                    "pruned destroyed LOD consumers"
                );
            }
            report.pools += 1;
            report.pass += pass;
        }
        trace!(
            visited = report.pass.visited,
            swaps = report.pass.swaps,
            flag_writes = report.pass.flag_writes,
            "LOD pass complete"
        );
        report
    }

    /// Change the thresholds of the pool serving `consumer_type`.
    pub fn set_thresholds(&mut self, consumer_type: &str, thresholds: PoolThresholds) -> bool {
        let mut found = false;
        for pool in self.pools_of_mut(consumer_type) {
            pool.set_thresholds(thresholds);
            found = true;
        }
        found
    }

    pub fn pool(&self, consumer_type: &str) -> Option<&ResourcePool<H>> {
        self.pools
            .iter()
            .find(|pool| *pool.consumer_type() == *consumer_type)
    }

    pub fn pools(&self) -> &[ResourcePool<H>] {
        &self.pools
    }

    pub fn consumer_types(&self) -> impl Iterator<Item = &ConsumerType> {
        self.pools.iter().map(|pool| pool.consumer_type())
    }

    /// Total registered slots across all pools.
    pub fn consumer_count(&self) -> usize {
        self.pools.iter().map(|pool| pool.len()).sum()
    }

    fn pools_of_mut<'a>(
        &'a mut self,
        consumer_type: &'a str,
    ) -> impl Iterator<Item = &'a mut ResourcePool<H>> + 'a {
        self.pools
            .iter_mut()
            .filter(move |pool| *pool.consumer_type() == *consumer_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{ConsumerArena, ConsumerId};
    use crate::consumer::PointConsumer;
    use kobold_config::PoolConfig;

    fn manager() -> LodManager<ConsumerId> {
        LodManager::from_config(&LodConfig {
            pools: vec![
                PoolConfig {
                    consumer_type: "plant".to_string(),
                    high_quality_count: 1,
                    medium_quality_count: 1,
                },
                PoolConfig {
                    consumer_type: "kobold".to_string(),
                    high_quality_count: 2,
                    medium_quality_count: 0,
                },
            ],
        })
    }

    fn spawn_at(arena: &mut ConsumerArena<PointConsumer>, x: f32) -> ConsumerId {
        arena.spawn(PointConsumer::at(Vec3::new(x, 0.0, 0.0)))
    }

    #[test]
    fn test_from_config_builds_pools_in_order() {
        let manager = manager();
        let types: Vec<&str> = manager.consumer_types().map(|t| t.as_str()).collect();
        assert_eq!(types, vec!["plant", "kobold"]);
        assert_eq!(
            manager.pool("kobold").unwrap().thresholds(),
            PoolThresholds::new(2, 0)
        );
    }

    #[test]
    fn test_register_routes_by_type() {
        let mut arena = ConsumerArena::new();
        let mut manager = manager();
        let a = spawn_at(&mut arena, 1.0);
        assert!(manager.register(a, "plant"));
        assert!(!manager.register(a, "fluid"));
        assert_eq!(manager.pool("plant").unwrap().len(), 1);
        assert_eq!(manager.pool("kobold").unwrap().len(), 0);
        assert_eq!(manager.consumer_count(), 1);
    }

    #[test]
    fn test_unregister_only_matching_type() {
        let mut arena = ConsumerArena::new();
        let mut manager = manager();
        let a = spawn_at(&mut arena, 1.0);
        manager.register(a, "plant");
        assert!(!manager.unregister(a, "kobold"));
        assert!(manager.unregister(a, "plant"));
        assert_eq!(manager.consumer_count(), 0);
    }

    #[test]
    fn test_tick_without_viewpoint_touches_nothing() {
        let mut arena = ConsumerArena::new();
        let mut manager = manager();
        let far = spawn_at(&mut arena, 10.0);
        let near = spawn_at(&mut arena, 1.0);
        manager.register(far, "plant");
        manager.register(near, "plant");
        arena.despawn(far);

        let report = manager.tick(&mut arena, &None::<Vec3>);

        assert!(report.skipped);
        assert_eq!(report.pass, PassReport::default());
        // Stale handle is not pruned while skipped.
        assert_eq!(manager.pool("plant").unwrap().len(), 2);
        let c = arena.get(near).unwrap();
        assert!(!c.close && !c.very_far);
    }

    #[test]
    fn test_tick_ranks_every_pool() {
        let mut arena = ConsumerArena::new();
        let mut manager = manager();
        let p_far = spawn_at(&mut arena, 9.0);
        let p_near = spawn_at(&mut arena, 1.0);
        let k_far = spawn_at(&mut arena, 8.0);
        let k_near = spawn_at(&mut arena, 2.0);
        manager.register(p_far, "plant");
        manager.register(p_near, "plant");
        manager.register(k_far, "kobold");
        manager.register(k_near, "kobold");

        let report = manager.tick(&mut arena, &Vec3::ZERO);

        assert!(!report.skipped);
        assert_eq!(report.pools, 2);
        assert_eq!(report.pass.swaps, 2);
        let plant: Vec<ConsumerId> = manager.pool("plant").unwrap().handles().collect();
        assert_eq!(plant, vec![p_near, p_far]);
        // Rank 0 of plant is close; rank 1 is medium.
        assert!(arena.get(p_near).unwrap().close);
        assert!(!arena.get(p_far).unwrap().close);
        assert!(!arena.get(p_far).unwrap().very_far);
        // Both kobolds fit the close tier.
        assert!(arena.get(k_far).unwrap().close);
        assert!(arena.get(k_near).unwrap().close);
    }

    #[test]
    fn test_destroyed_consumers_pruned_on_tick() {
        let mut arena = ConsumerArena::new();
        let mut manager = manager();
        let ids: Vec<ConsumerId> = (0..5).map(|i| spawn_at(&mut arena, i as f32)).collect();
        for &id in &ids {
            manager.register(id, "plant");
        }
        arena.despawn(ids[1]);
        arena.despawn(ids[4]);

        let report = manager.tick(&mut arena, &Vec3::ZERO);

        assert_eq!(report.pass.pruned, 2);
        assert_eq!(manager.consumer_count(), 3);
    }

    #[test]
    fn test_set_thresholds() {
        let mut manager = manager();
        assert!(manager.set_thresholds("plant", PoolThresholds::new(5, 5)));
        assert!(!manager.set_thresholds("fluid", PoolThresholds::new(5, 5)));
        assert_eq!(
            manager.pool("plant").unwrap().thresholds(),
            PoolThresholds::new(5, 5)
        );
    }

    #[test]
    fn test_empty_manager_tick() {
        let mut arena: ConsumerArena<PointConsumer> = ConsumerArena::new();
        let mut manager: LodManager<ConsumerId> = LodManager::default();
        let report = manager.tick(&mut arena, &Vec3::ZERO);
        assert_eq!(report.pools, 0);
        assert!(!report.skipped);
    }
}
