//! Resource pools and the incremental distance-ranking pass.
//!
//! A pool never fully sorts its consumers. Each pass walks the sequence once
//! and swaps a consumer with its predecessor when it is nearer to the
//! viewpoint than the distance measured one step earlier. A consumer can
//! therefore climb at most one rank per tick; with continuous motion the order
//! converges over successive ticks at a cost of one distance per consumer.

use std::ops::AddAssign;

use glam::Vec3;

use crate::consumer::{ConsumerStore, ConsumerType};
use crate::tier::{PoolThresholds, Tier};

/// What one ranking pass did to a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Live consumers whose distance was measured.
    pub visited: usize,
    /// Adjacent swaps performed.
    pub swaps: usize,
    /// Stale handles removed.
    pub pruned: usize,
    /// `set_close` / `set_very_far` calls issued.
    pub flag_writes: usize,
}

impl AddAssign for PassReport {
    fn add_assign(&mut self, rhs: Self) {
        self.visited += rhs.visited;
        self.swaps += rhs.swaps;
        self.pruned += rhs.pruned;
        self.flag_writes += rhs.flag_writes;
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot<H> {
    handle: H,
    /// Tier last pushed to the consumer; `None` until the first pass reaches it.
    tier: Option<Tier>,
}

/// A named group of consumers sharing tier thresholds, kept approximately
/// ordered by distance to the viewpoint (rank 0 = nearest).
#[derive(Clone, Debug)]
pub struct ResourcePool<H> {
    consumer_type: ConsumerType,
    thresholds: PoolThresholds,
    slots: Vec<Slot<H>>,
}

impl<H: Copy + PartialEq> ResourcePool<H> {
    pub fn new(consumer_type: impl Into<ConsumerType>, thresholds: PoolThresholds) -> Self {
        Self {
            consumer_type: consumer_type.into(),
            thresholds,
            slots: Vec::new(),
        }
    }

    pub fn consumer_type(&self) -> &ConsumerType {
        &self.consumer_type
    }

    pub fn thresholds(&self) -> PoolThresholds {
        self.thresholds
    }

    /// Replace the thresholds. Consumers whose tier changes get their flags on
    /// the next pass.
    pub fn set_thresholds(&mut self, thresholds: PoolThresholds) {
        self.thresholds = thresholds;
    }

    /// Append `handle` at the lowest rank. Registering the same handle twice
    /// creates two independent slots.
    pub fn register(&mut self, handle: H) {
        self.slots.push(Slot { handle, tier: None });
    }

    /// Remove the first slot holding `handle`. Returns `false` if none did.
    pub fn unregister(&mut self, handle: H) -> bool {
        match self.slots.iter().position(|slot| slot.handle == handle) {
            Some(rank) => {
                self.slots.remove(rank);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, handle: H) -> bool {
        self.slots.iter().any(|slot| slot.handle == handle)
    }

    /// Handles in current rank order.
    pub fn handles(&self) -> impl Iterator<Item = H> + '_ {
        self.slots.iter().map(|slot| slot.handle)
    }

    pub fn handle_at(&self, rank: usize) -> Option<H> {
        self.slots.get(rank).map(|slot| slot.handle)
    }

    /// Tier last pushed to the consumer at `rank`, if any has been.
    pub fn tier_at(&self, rank: usize) -> Option<Tier> {
        self.slots.get(rank).and_then(|slot| slot.tier)
    }

    /// Run one ranking pass against `viewpoint`.
    ///
    /// Stale handles are pruned in place; the consumer that slides into a
    /// pruned index is compared against the same predecessor distance. Any
    /// consumer whose rank no longer matches the tier last pushed to it (new
    /// registrations, consumers shifted by a removal, threshold changes) is
    /// re-flagged when the pass reaches it. After a swap the carried distance
    /// is the one measured this step, not the swapped-back consumer's, so
    /// `[5, 1, 3]` becomes `[1, 5, 3]`.
    pub fn rank<S>(&mut self, store: &mut S, viewpoint: Vec3) -> PassReport
    where
        S: ConsumerStore<H> + ?Sized,
    {
        let mut report = PassReport::default();
        let close_barrier = self.thresholds.high_quality_count;
        let far_barrier = self.thresholds.very_far_barrier();
        let mut previous: Option<f32> = None;
        let mut i = 0;

        while i < self.slots.len() {
            let handle = self.slots[i].handle;
            let Some(position) = store.position(handle) else {
                self.slots.remove(i);
                report.pruned += 1;
                continue;
            };
            report.visited += 1;

            report.flag_writes += self.sync_tier(store, i);

            let distance = position.distance(viewpoint);
            if let Some(prev) = previous
                && distance < prev
            {
                self.slots.swap(i - 1, i);
                report.swaps += 1;
                if i == close_barrier {
                    report.flag_writes += self.cross_close_barrier(store, i);
                }
                if i == far_barrier {
                    report.flag_writes += self.cross_far_barrier(store, i);
                }
            }
            previous = Some(distance);
            i += 1;
        }

        report
    }

    /// The consumer now at `rank - 1` entered the close tier; the one at
    /// `rank` left it.
    fn cross_close_barrier<S>(&mut self, store: &mut S, rank: usize) -> usize
    where
        S: ConsumerStore<H> + ?Sized,
    {
        store.set_close(self.slots[rank - 1].handle, true);
        store.set_close(self.slots[rank].handle, false);
        self.retier(rank);
        2
    }

    /// The consumer now at `rank - 1` left the far tier; the one at `rank`
    /// entered it.
    fn cross_far_barrier<S>(&mut self, store: &mut S, rank: usize) -> usize
    where
        S: ConsumerStore<H> + ?Sized,
    {
        store.set_very_far(self.slots[rank - 1].handle, false);
        store.set_very_far(self.slots[rank].handle, true);
        self.retier(rank);
        2
    }

    /// Push whichever flags differ between the consumer's last tier and the
    /// tier of `rank`. A consumer that never had a tier gets both.
    fn sync_tier<S>(&mut self, store: &mut S, rank: usize) -> usize
    where
        S: ConsumerStore<H> + ?Sized,
    {
        let tier = self.thresholds.tier_for_rank(rank);
        let slot = &mut self.slots[rank];
        let last = slot.tier.replace(tier);
        if last == Some(tier) {
            return 0;
        }
        let mut writes = 0;
        if last.is_none_or(|last| last.is_close() != tier.is_close()) {
            store.set_close(slot.handle, tier.is_close());
            writes += 1;
        }
        if last.is_none_or(|last| last.is_very_far() != tier.is_very_far()) {
            store.set_very_far(slot.handle, tier.is_very_far());
            writes += 1;
        }
        writes
    }

    fn retier(&mut self, rank: usize) {
        self.slots[rank - 1].tier = Some(self.thresholds.tier_for_rank(rank - 1));
        self.slots[rank].tier = Some(self.thresholds.tier_for_rank(rank));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Store keyed by small integers that records every flag write.
    #[derive(Default)]
    struct RecordingStore {
        positions: HashMap<u32, Vec3>,
        writes: Vec<(u32, &'static str, bool)>,
    }

    impl RecordingStore {
        fn with_distances(distances: &[f32]) -> Self {
            let mut store = Self::default();
            for (id, &d) in distances.iter().enumerate() {
                store.positions.insert(id as u32, Vec3::new(d, 0.0, 0.0));
            }
            store
        }

        fn writes_for(&self, id: u32, flag: &str, value: bool) -> usize {
            self.writes
                .iter()
                .filter(|w| w.0 == id && w.1 == flag && w.2 == value)
                .count()
        }
    }

    impl ConsumerStore<u32> for RecordingStore {
        fn position(&self, handle: u32) -> Option<Vec3> {
            self.positions.get(&handle).copied()
        }

        fn set_close(&mut self, handle: u32, close: bool) {
            self.writes.push((handle, "close", close));
        }

        fn set_very_far(&mut self, handle: u32, very_far: bool) {
            self.writes.push((handle, "very_far", very_far));
        }
    }

    fn pool_of(count: u32, thresholds: PoolThresholds) -> ResourcePool<u32> {
        let mut pool = ResourcePool::new("npc", thresholds);
        for id in 0..count {
            pool.register(id);
        }
        pool
    }

    fn order(pool: &ResourcePool<u32>) -> Vec<u32> {
        pool.handles().collect()
    }

    #[test]
    fn test_single_pass_is_one_adjacent_swap() {
        // Handles 0, 1, 2 sit at distances 5, 1, 3.
        let mut store = RecordingStore::with_distances(&[5.0, 1.0, 3.0]);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(order(&pool), vec![1, 0, 2]);
        assert_eq!(report.swaps, 1);
        assert_eq!(report.visited, 3);
    }

    #[test]
    fn test_repeated_passes_converge() {
        let mut store = RecordingStore::with_distances(&[9.0, 7.0, 5.0, 3.0, 1.0]);
        let mut pool = pool_of(5, PoolThresholds::new(2, 1));
        for _ in 0..5 {
            pool.rank(&mut store, Vec3::ZERO);
        }
        assert_eq!(order(&pool), vec![4, 3, 2, 1, 0]);
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report.swaps, 0);
    }

    #[test]
    fn test_sorted_pool_has_no_swaps() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0]);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report.swaps, 0);
        assert_eq!(order(&pool), vec![0, 1, 2]);
    }

    #[test]
    fn test_first_pass_pushes_rank_tiers() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0]);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report.flag_writes, 6);
        assert_eq!(store.writes_for(0, "close", true), 1);
        assert_eq!(store.writes_for(1, "close", false), 1);
        assert_eq!(store.writes_for(1, "very_far", false), 1);
        assert_eq!(store.writes_for(2, "very_far", true), 1);
        assert_eq!(pool.tier_at(0), Some(Tier::Close));
        assert_eq!(pool.tier_at(1), Some(Tier::Medium));
        assert_eq!(pool.tier_at(2), Some(Tier::Far));
    }

    #[test]
    fn test_settled_pool_issues_no_flag_writes() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0]);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report.flag_writes, 0);
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_promotion_into_close_tier_sets_close_once() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0]);
        let mut pool = pool_of(2, PoolThresholds::new(1, 1));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();

        // Handle 1 moves in front of handle 0.
        store.positions.insert(1, Vec3::new(0.5, 0.0, 0.0));
        pool.rank(&mut store, Vec3::ZERO);

        assert_eq!(order(&pool), vec![1, 0]);
        assert_eq!(store.writes_for(1, "close", true), 1);
        assert_eq!(store.writes_for(0, "close", false), 1);
        assert_eq!(store.writes.len(), 2);
        assert_eq!(pool.tier_at(0), Some(Tier::Close));
        assert_eq!(pool.tier_at(1), Some(Tier::Medium));
    }

    #[test]
    fn test_demotion_into_far_tier_sets_very_far_once() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0]);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();

        store.positions.insert(2, Vec3::new(1.5, 0.0, 0.0));
        pool.rank(&mut store, Vec3::ZERO);

        assert_eq!(order(&pool), vec![0, 2, 1]);
        assert_eq!(store.writes_for(2, "very_far", false), 1);
        assert_eq!(store.writes_for(1, "very_far", true), 1);
        assert_eq!(store.writes.len(), 2);
    }

    #[test]
    fn test_swap_inside_a_tier_touches_no_flags() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0, 4.0]);
        let mut pool = pool_of(4, PoolThresholds::new(1, 10));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();

        store.positions.insert(3, Vec3::new(2.5, 0.0, 0.0));
        let report = pool.rank(&mut store, Vec3::ZERO);

        assert_eq!(report.swaps, 1);
        assert_eq!(order(&pool), vec![0, 1, 3, 2]);
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_zero_medium_crosses_both_barriers() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0]);
        let mut pool = pool_of(2, PoolThresholds::new(1, 0));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();

        store.positions.insert(1, Vec3::new(0.5, 0.0, 0.0));
        pool.rank(&mut store, Vec3::ZERO);

        assert_eq!(store.writes_for(1, "close", true), 1);
        assert_eq!(store.writes_for(1, "very_far", false), 1);
        assert_eq!(store.writes_for(0, "close", false), 1);
        assert_eq!(store.writes_for(0, "very_far", true), 1);
    }

    #[test]
    fn test_stale_handles_are_pruned() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0, 4.0]);
        let mut pool = pool_of(4, PoolThresholds::new(1, 1));
        store.positions.remove(&1);
        store.positions.remove(&3);
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report.pruned, 2);
        assert_eq!(pool.len(), 2);
        assert_eq!(order(&pool), vec![0, 2]);
    }

    #[test]
    fn test_pruning_does_not_skip_the_next_consumer() {
        // Handle 1 is destroyed; handle 2 slides into index 1 and must still be
        // compared against handle 0.
        let mut store = RecordingStore::with_distances(&[5.0, 0.0, 1.0]);
        store.positions.remove(&1);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report.pruned, 1);
        assert_eq!(report.swaps, 1);
        assert_eq!(order(&pool), vec![2, 0]);
    }

    #[test]
    fn test_consecutive_stale_handles() {
        let mut store = RecordingStore::with_distances(&[1.0, 1.0, 1.0, 1.0]);
        store.positions.remove(&0);
        store.positions.remove(&1);
        store.positions.remove(&2);
        let mut pool = pool_of(4, PoolThresholds::new(1, 1));
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report.pruned, 3);
        assert_eq!(order(&pool), vec![3]);
        assert_eq!(pool.tier_at(0), Some(Tier::Close));
    }

    #[test]
    fn test_empty_pool_is_noop() {
        let mut store = RecordingStore::default();
        let mut pool: ResourcePool<u32> = ResourcePool::new("npc", PoolThresholds::new(1, 1));
        let report = pool.rank(&mut store, Vec3::ZERO);
        assert_eq!(report, PassReport::default());
    }

    #[test]
    fn test_duplicate_registration_creates_two_slots() {
        let mut pool: ResourcePool<u32> = ResourcePool::new("npc", PoolThresholds::new(1, 1));
        pool.register(7);
        pool.register(7);
        assert_eq!(pool.len(), 2);
        assert!(pool.unregister(7));
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(7));
        assert!(pool.unregister(7));
        assert!(!pool.unregister(7));
    }

    #[test]
    fn test_unregister_removes_first_occurrence() {
        let mut pool: ResourcePool<u32> = ResourcePool::new("npc", PoolThresholds::new(1, 1));
        for id in [1, 2, 1, 3] {
            pool.register(id);
        }
        pool.unregister(1);
        assert_eq!(order(&pool), vec![2, 1, 3]);
    }

    #[test]
    fn test_count_preserved_minus_destroyed() {
        let mut store = RecordingStore::with_distances(&[4.0, 3.0, 2.0, 1.0, 9.0, 0.5]);
        store.positions.remove(&4);
        let mut pool = pool_of(6, PoolThresholds::new(2, 2));
        pool.rank(&mut store, Vec3::ZERO);
        let mut ids = order(&pool);
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn test_threshold_change_reflags_on_next_pass() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0]);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();

        pool.set_thresholds(PoolThresholds::new(2, 0));
        let report = pool.rank(&mut store, Vec3::ZERO);

        assert_eq!(report.flag_writes, 1);
        assert_eq!(store.writes, vec![(1, "close", true)]);
        assert_eq!(pool.tier_at(1), Some(Tier::Close));
        assert_eq!(pool.tier_at(2), Some(Tier::Far));
    }

    #[test]
    fn test_destroyed_close_consumer_hands_close_to_successor() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0]);
        let mut pool = pool_of(3, PoolThresholds::new(1, 1));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();

        store.positions.remove(&0);
        let report = pool.rank(&mut store, Vec3::ZERO);

        assert_eq!(report.pruned, 1);
        assert_eq!(order(&pool), vec![1, 2]);
        assert_eq!(store.writes_for(1, "close", true), 1);
        assert_eq!(store.writes_for(2, "very_far", false), 1);
        assert_eq!(store.writes.len(), 2);
        assert_eq!(pool.tier_at(0), Some(Tier::Close));
        assert_eq!(pool.tier_at(1), Some(Tier::Medium));

        store.writes.clear();
        for _ in 0..10 {
            pool.rank(&mut store, Vec3::ZERO);
        }
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_unregister_shifts_tiers_on_next_pass() {
        let mut store = RecordingStore::with_distances(&[1.0, 2.0, 3.0, 4.0]);
        let mut pool = pool_of(4, PoolThresholds::new(1, 2));
        pool.rank(&mut store, Vec3::ZERO);
        store.writes.clear();

        assert!(pool.unregister(1));
        pool.rank(&mut store, Vec3::ZERO);

        // Handle 3 moves from rank 3 (far) to rank 2 (medium); 0 and 2 keep
        // their tiers.
        assert_eq!(order(&pool), vec![0, 2, 3]);
        assert_eq!(store.writes, vec![(3, "very_far", false)]);
        assert_eq!(pool.tier_at(2), Some(Tier::Medium));
    }
}
