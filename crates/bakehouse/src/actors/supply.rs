//! Supply employees: replenish raw materials that fall below threshold.

use crate::context::Shared;
use crate::domain::RawMaterial;
use crate::messages::{ControlMsg, ControlTag};
use async_trait::async_trait;
use bakehouse_kernel::{KernelError, Step, Worker};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Pause per placed order, simulating the reordering round-trip.
const RESTOCK_PAUSE: Duration = Duration::from_millis(500);
/// Backoff when a full scan found nothing below threshold.
const IDLE_BACKOFF: Duration = Duration::from_secs(5);

pub struct SupplyActor {
    id: u32,
    shared: Shared,
    rng: StdRng,
}

impl SupplyActor {
    pub fn new(id: u32, shared: Shared, rng: StdRng) -> Self {
        Self { id, shared, rng }
    }

    /// Scans every material under the inventory lock and tops up the ones
    /// below threshold with a uniformly drawn order in the configured
    /// [min, max] purchase window. Returns the placed orders.
    pub fn restock_pass(&mut self) -> Result<Vec<(RawMaterial, u32)>, KernelError> {
        self.shared.inventory.with(|inventory| {
            let mut orders = Vec::new();
            for material in RawMaterial::ALL {
                if inventory.needs_restock(material) {
                    let lo = self.shared.config.min_purchase[material];
                    let hi = self.shared.config.max_purchase[material];
                    let amount = self.rng.gen_range(lo..=hi);
                    inventory.restock(material, amount);
                    orders.push((material, amount));
                }
            }
            orders
        })
    }
}

#[async_trait]
impl Worker for SupplyActor {
    fn role(&self) -> &'static str {
        "supply"
    }

    fn id(&self) -> u32 {
        self.id
    }

    async fn tick(&mut self) -> Result<Step, KernelError> {
        if !self.shared.is_active() {
            return Ok(Step::Shutdown);
        }
        // An unavailable inventory region ends this worker's loop.
        let orders = self.restock_pass()?;
        if orders.is_empty() {
            return Ok(Step::Idle(IDLE_BACKOFF));
        }
        for &(material, amount) in &orders {
            info!(id = self.id, %material, amount, "restocked");
            if let Err(err) = self
                .shared
                .control
                .publish(ControlTag::Management, ControlMsg::Restock(material))
            {
                warn!(id = self.id, %material, error = %err, "restock notice lost");
            }
        }
        Ok(Step::Idle(RESTOCK_PAUSE * orders.len() as u32))
    }
}
