//! Customers: the generator spawns them at random intervals; each one runs a
//! short, bounded shopping trip and reports its outcome.

use crate::context::Shared;
use crate::domain::Product;
use crate::messages::{OrderTicket, StoreMsg, StoreTag};
use async_trait::async_trait;
use bakehouse_kernel::{KernelError, Step, Worker};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Pause between a customer's item requests.
const BROWSE_PAUSE: Duration = Duration::from_millis(500);
/// Extra generator pause after every batch of spawned customers.
const BATCH_SIZE: u64 = 10;
const BATCH_PAUSE: Duration = Duration::from_secs(5);
/// RNG stream offset so customer streams never collide with staff streams.
const CUSTOMER_STREAM_BASE: u64 = 1 << 32;

/// Spawns a customer task at randomized intervals while the shop is open,
/// then waits for the stragglers before shutting down.
pub struct CustomerGenerator {
    shared: Shared,
    rng: StdRng,
    next_id: u64,
    trips: JoinSet<()>,
}

impl CustomerGenerator {
    pub fn new(shared: Shared, rng: StdRng) -> Self {
        Self {
            shared,
            rng,
            next_id: 0,
            trips: JoinSet::new(),
        }
    }
}

#[async_trait]
impl Worker for CustomerGenerator {
    fn role(&self) -> &'static str {
        "customer-generator"
    }

    fn id(&self) -> u32 {
        0
    }

    async fn tick(&mut self) -> Result<Step, KernelError> {
        if !self.shared.is_active() {
            // In-flight customers hold at most one patience window each;
            // wait them out so the join at teardown finds nothing running.
            while self.trips.join_next().await.is_some() {}
            return Ok(Step::Shutdown);
        }
        while self.trips.try_join_next().is_some() {}

        let id = self.next_id;
        self.next_id += 1;
        let rng = self.shared.config.rng_for(CUSTOMER_STREAM_BASE + id);
        let customer = CustomerActor::new(id, self.shared.clone(), rng);
        debug!(customer = id, "customer arrived");
        self.trips.spawn(customer.run());

        let params = self.shared.config.customer;
        let mut pause = Duration::from_secs(
            self.rng
                .gen_range(params.arrival_min_secs..=params.arrival_max_secs),
        );
        if self.next_id % BATCH_SIZE == 0 {
            pause += BATCH_PAUSE;
        }
        Ok(Step::Idle(pause))
    }
}

/// One shopping trip: a bounded sequence of requests, each awaited with the
/// customer's patience as the deadline, then a single outcome report.
pub struct CustomerActor {
    id: u64,
    shared: Shared,
    rng: StdRng,
}

impl CustomerActor {
    pub fn new(id: u64, shared: Shared, rng: StdRng) -> Self {
        Self { id, shared, rng }
    }

    pub async fn run(mut self) {
        let params = self.shared.config.customer;
        let patience = Duration::from_secs(
            self.rng
                .gen_range(params.patience_min_secs..=params.patience_max_secs),
        );
        let num_items = self.rng.gen_range(1..=params.max_purchase_items);
        debug!(
            customer = self.id,
            patience_secs = patience.as_secs(),
            num_items,
            "shopping"
        );

        let mut satisfied = true;
        let mut last_pick = None;
        for _ in 0..num_items {
            if !self.shared.is_active() {
                break;
            }
            let product = Product::ALL[self.rng.gen_range(0..Product::COUNT)];
            let categories = self.shared.config.categories[product];
            let subtype = if categories > 0 {
                self.rng.gen_range(0..categories)
            } else {
                0
            };
            let quantity = self.rng.gen_range(1..=3);
            last_pick = Some((product, subtype));

            let ticket = OrderTicket::request(self.id, product, subtype, quantity);
            if let Err(err) = self
                .shared
                .store
                .publish(StoreTag::Orders, StoreMsg::Order(ticket))
            {
                warn!(customer = self.id, error = %err, "request lost, leaving");
                satisfied = false;
                break;
            }

            match self
                .shared
                .store
                .take_deadline(&StoreTag::Reply(self.id), patience)
                .await
            {
                Some(StoreMsg::Order(reply)) if reply.fulfilled => {
                    debug!(customer = self.id, product = %reply.product, quantity = reply.quantity, "received order");
                }
                Some(_) => {
                    debug!(customer = self.id, %product, "order refused");
                    satisfied = false;
                }
                None => {
                    debug!(customer = self.id, %product, "patience ran out");
                    satisfied = false;
                }
            }
            tokio::time::sleep(BROWSE_PAUSE).await;
        }

        // Exactly one outcome per customer, recorded under the ledger lock;
        // an unhappy customer complains with the configured probability.
        let complained = self.shared.ledger.with(|ledger| {
            if satisfied {
                return false;
            }
            ledger.record_frustration();
            if !self.rng.gen_bool(params.complaint_probability) {
                return false;
            }
            let (product, subtype) = last_pick.unwrap_or((Product::Bread, 0));
            let complaint = OrderTicket::request(self.id, product, subtype, 1).into_complaint();
            match self
                .shared
                .store
                .publish(StoreTag::Orders, StoreMsg::Order(complaint))
            {
                Ok(()) => true,
                Err(err) => {
                    warn!(customer = self.id, error = %err, "complaint lost");
                    false
                }
            }
        });
        match complained {
            Ok(true) => info!(customer = self.id, "filed a complaint"),
            Ok(false) => {}
            Err(err) => warn!(customer = self.id, error = %err, "outcome not recorded"),
        }
        info!(customer = self.id, satisfied, "customer left");
    }
}
