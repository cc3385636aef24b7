//! Worker rosters: the chef roster management rebalances, and the baker
//! crew fixed at bootstrap.

use crate::config::BakeryConfig;
use crate::domain::{BakerRole, BakerTable, ChefRole, ChefTable};
use crate::messages::Reallocation;
use tracing::{info, warn};

/// Per-role chef head-counts, owned exclusively by management.
///
/// Invariant: no team ever drops below one member, whatever reallocations
/// are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChefRoster {
    sizes: ChefTable<u32>,
}

impl ChefRoster {
    pub fn from_config(config: &BakeryConfig) -> Self {
        Self {
            sizes: config.chefs,
        }
    }

    pub fn size(&self, role: ChefRole) -> u32 {
        self.sizes[role]
    }

    pub fn total(&self) -> u32 {
        ChefRole::ALL.iter().map(|&role| self.sizes[role]).sum()
    }

    /// Applies a reallocation, capping the move so the donor team keeps at
    /// least one member. Returns how many chefs actually moved.
    pub fn apply(&mut self, decision: &Reallocation) -> u32 {
        if decision.from == decision.to || decision.count == 0 {
            warn!(?decision, "ignoring no-op reallocation");
            return 0;
        }
        let spare = self.sizes[decision.from].saturating_sub(1);
        let moved = decision.count.min(spare);
        if moved == 0 {
            info!(
                donor = %decision.from,
                size = self.sizes[decision.from],
                "reallocation skipped, donor team cannot shrink further"
            );
            return 0;
        }
        self.sizes[decision.from] -= moved;
        self.sizes[decision.to] += moved;
        info!(
            moved,
            from = %decision.from,
            from_size = self.sizes[decision.from],
            to = %decision.to,
            to_size = self.sizes[decision.to],
            "chefs reallocated"
        );
        moved
    }
}

/// Per-role baker head-counts. Set at bootstrap, never reallocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakerCrew {
    sizes: BakerTable<u32>,
}

impl BakerCrew {
    pub fn from_config(config: &BakeryConfig) -> Self {
        Self {
            sizes: config.bakers,
        }
    }

    pub fn size(&self, role: BakerRole) -> u32 {
        self.sizes[role]
    }
}
