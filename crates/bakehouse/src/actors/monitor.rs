//! The storefront display: a read-only periodic snapshot of both regions.
//!
//! Takes the inventory lock and, nested inside it, the ledger lock (the
//! same acquisition order as the patisserie chefs), so the rendered picture
//! is consistent across both regions. Never writes to either.

use crate::context::Shared;
use async_trait::async_trait;
use bakehouse_kernel::{KernelError, Step, Worker};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::info;

const DISPLAY_INTERVAL: Duration = Duration::from_secs(5);

pub struct MonitorActor {
    shared: Shared,
}

impl MonitorActor {
    pub fn new(shared: Shared) -> Self {
        Self { shared }
    }
}

#[async_trait]
impl Worker for MonitorActor {
    fn role(&self) -> &'static str {
        "monitor"
    }

    fn id(&self) -> u32 {
        0
    }

    async fn tick(&mut self) -> Result<Step, KernelError> {
        if !self.shared.is_active() {
            return Ok(Step::Shutdown);
        }
        let (stock, ledger) = self.shared.inventory.with(|inventory| {
            let ledger = self.shared.ledger.with(|ledger| ledger.snapshot());
            (inventory.snapshot(), ledger)
        })?;
        let ledger = ledger?;

        let mut stock_line = String::new();
        for (material, level) in stock.iter() {
            let _ = write!(stock_line, "{material}:{} ", level.quantity);
        }
        let mut shelf_line = String::new();
        for (product, produced) in ledger.produced.iter() {
            let _ = write!(shelf_line, "{product}:{}/{} ", produced, ledger.sold[product]);
        }
        info!(
            stock = stock_line.trim_end(),
            shelf = shelf_line.trim_end(),
            profit = format!("{:.2}", ledger.total_profit),
            frustrated = ledger.frustrated_customers,
            complaints = ledger.complained_customers,
            missing = ledger.missing_item_requests,
            "storefront"
        );
        Ok(Step::Idle(DISPLAY_INTERVAL))
    }
}
