//! Production, sales, and customer counters, one of the two shared regions.
//!
//! All mutation goes through methods that keep the counters monotonic and
//! hold `produced ≥ sold` for every product at all times. The `active` flag
//! flips true→false exactly once and never back.

use crate::domain::{Product, ProductTable};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// The production/sales region.
#[derive(Debug)]
pub struct Ledger {
    produced: ProductTable<u32>,
    sold: ProductTable<u32>,
    frustrated_customers: u32,
    complained_customers: u32,
    missing_item_requests: u32,
    total_profit: f64,
    start_time: Instant,
    active: bool,
}

/// Point-in-time copy for the display and the final summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub produced: ProductTable<u32>,
    pub sold: ProductTable<u32>,
    pub frustrated_customers: u32,
    pub complained_customers: u32,
    pub missing_item_requests: u32,
    pub total_profit: f64,
    #[serde(skip)]
    pub elapsed: Duration,
    pub active: bool,
}

impl Ledger {
    /// A fresh, active ledger; the clock starts now.
    pub fn opened() -> Self {
        Self {
            produced: ProductTable::default(),
            sold: ProductTable::default(),
            frustrated_customers: 0,
            complained_customers: 0,
            missing_item_requests: 0,
            total_profit: 0.0,
            start_time: Instant::now(),
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flips the active flag false. Idempotent; the flag never returns to
    /// true.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn produced(&self, product: Product) -> u32 {
        self.produced[product]
    }

    pub fn sold(&self, product: Product) -> u32 {
        self.sold[product]
    }

    /// Unsold stock of `product`.
    pub fn available(&self, product: Product) -> u32 {
        self.produced[product] - self.sold[product]
    }

    pub fn record_production(&mut self, product: Product) {
        self.produced[product] += 1;
    }

    /// Records a fulfilled sale. The caller must have verified availability
    /// under the same lock hold; this asserts the `produced ≥ sold`
    /// invariant rather than re-deciding the sale.
    pub fn record_sale(&mut self, product: Product, quantity: u32, unit_price: f64) {
        debug_assert!(self.available(product) >= quantity);
        self.sold[product] += quantity;
        self.total_profit += unit_price * f64::from(quantity);
    }

    /// Marks one unit of paste as used up by a patisserie chef.
    pub fn consume_paste(&mut self) {
        debug_assert!(self.available(Product::Paste) >= 1);
        self.sold[Product::Paste] += 1;
    }

    pub fn record_missing_request(&mut self) {
        self.missing_item_requests += 1;
    }

    pub fn record_frustration(&mut self) {
        self.frustrated_customers += 1;
    }

    pub fn record_complaint(&mut self) {
        self.complained_customers += 1;
    }

    pub fn frustrated_customers(&self) -> u32 {
        self.frustrated_customers
    }

    pub fn complained_customers(&self) -> u32 {
        self.complained_customers
    }

    pub fn missing_item_requests(&self) -> u32 {
        self.missing_item_requests
    }

    pub fn total_profit(&self) -> f64 {
        self.total_profit
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            produced: self.produced,
            sold: self.sold,
            frustrated_customers: self.frustrated_customers,
            complained_customers: self.complained_customers,
            missing_item_requests: self.missing_item_requests,
            total_profit: self.total_profit,
            elapsed: self.elapsed(),
            active: self.active,
        }
    }

    /// Test/scenario constructor with preset counters.
    pub fn with_counts(produced: ProductTable<u32>, sold: ProductTable<u32>) -> Self {
        for product in Product::ALL {
            assert!(produced[product] >= sold[product]);
        }
        Self {
            produced,
            sold,
            ..Self::opened()
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::opened()
    }
}
