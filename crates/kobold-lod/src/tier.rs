//! Quality tiers and the rank thresholds that assign them.

use kobold_config::PoolConfig;

/// Discrete detail level assigned to a consumer by its rank in a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Full detail: ranks `0..high_quality_count`.
    Close,
    /// Reduced detail: the next `medium_quality_count` ranks.
    Medium,
    /// Lowest detail: every remaining rank.
    Far,
}

impl Tier {
    /// Value pushed through `set_close`.
    pub fn is_close(self) -> bool {
        self == Tier::Close
    }

    /// Value pushed through `set_very_far`.
    pub fn is_very_far(self) -> bool {
        self == Tier::Far
    }
}

/// Rank cutoffs of a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolThresholds {
    /// Number of ranks in the close tier.
    pub high_quality_count: usize,
    /// Number of ranks in the medium tier, following the close tier.
    pub medium_quality_count: usize,
}

impl PoolThresholds {
    pub fn new(high_quality_count: usize, medium_quality_count: usize) -> Self {
        Self {
            high_quality_count,
            medium_quality_count,
        }
    }

    /// First rank of the far tier.
    pub fn very_far_barrier(&self) -> usize {
        self.high_quality_count
            .saturating_add(self.medium_quality_count)
    }

    /// Tier of the consumer at `rank` (0 = nearest).
    pub fn tier_for_rank(&self, rank: usize) -> Tier {
        if rank < self.high_quality_count {
            Tier::Close
        } else if rank < self.very_far_barrier() {
            Tier::Medium
        } else {
            Tier::Far
        }
    }
}

impl From<&PoolConfig> for PoolThresholds {
    fn from(config: &PoolConfig) -> Self {
        Self::new(config.high_quality_count, config.medium_quality_count)
    }
}
