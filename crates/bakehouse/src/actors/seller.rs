//! Sellers: broker customer requests against the ledger.
//!
//! A seller polls the store bus for requests, applies the availability and
//! reservation policy under the ledger lock, and always answers on the
//! requester's reply tag, fulfilled or not.

use crate::context::Shared;
use crate::domain::Product;
use crate::messages::{OrderTicket, StoreMsg, StoreTag};
use crate::state::Ledger;
use async_trait::async_trait;
use bakehouse_kernel::{KernelError, Step, Worker};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Poll pause when no request is waiting.
const POLL_DELAY: Duration = Duration::from_millis(100);
/// Specialty items keep this many units back from every sale.
const SPECIALTY_RESERVE: u32 = 3;

/// How one request was serviced; decides the pacing pause that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Complaint,
    Fulfilled(Product, u32),
    Rejected(Product),
}

pub struct SellerActor {
    id: u32,
    shared: Shared,
    rng: StdRng,
    served: u32,
}

impl SellerActor {
    pub fn new(id: u32, shared: Shared, rng: StdRng) -> Self {
        Self {
            id,
            shared,
            rng,
            served: 0,
        }
    }

    /// Customers this seller has successfully served.
    pub fn served(&self) -> u32 {
        self.served
    }

    /// The per-product reservation policy: specialty items (cake, sweet
    /// patisserie) keep a standing reserve, sandwiches demand double cover,
    /// everything else sells down to zero.
    pub fn reservation_allows(ledger: &Ledger, product: Product, quantity: u32) -> bool {
        let available = ledger.available(product);
        match product {
            Product::Cake | Product::SweetPatisserie => available >= quantity + SPECIALTY_RESERVE,
            Product::Sandwich => available >= quantity * 2,
            _ => available >= quantity,
        }
    }

    /// Services one ticket: records the complaint, or decides the sale under
    /// the ledger lock and replies to the customer either way.
    pub fn handle_ticket(&mut self, ticket: OrderTicket) -> Result<Service, KernelError> {
        if ticket.is_complaint {
            self.shared.ledger.with(|ledger| ledger.record_complaint())?;
            info!(
                seller = self.id,
                customer = ticket.customer_id,
                product = %ticket.product,
                "complaint recorded"
            );
            return Ok(Service::Complaint);
        }

        let prices = self.shared.config.prices;
        let response = self.shared.ledger.with(|ledger| {
            let mut response = ticket;
            if Self::reservation_allows(ledger, response.product, response.quantity) {
                response.fulfilled = true;
                ledger.record_sale(response.product, response.quantity, prices[response.product]);
            } else {
                response.fulfilled = false;
                ledger.record_missing_request();
            }
            response
        })?;

        let outcome = if response.fulfilled {
            self.served += 1;
            debug!(
                seller = self.id,
                customer = response.customer_id,
                product = %response.product,
                quantity = response.quantity,
                "order fulfilled"
            );
            Service::Fulfilled(response.product, response.quantity)
        } else {
            debug!(
                seller = self.id,
                customer = response.customer_id,
                product = %response.product,
                "product unavailable"
            );
            Service::Rejected(response.product)
        };

        // A response is always sent, fulfilled or not.
        let reply = StoreTag::Reply(response.customer_id);
        if let Err(err) = self.shared.store.publish(reply, StoreMsg::Order(response)) {
            warn!(seller = self.id, error = %err, "response lost");
        }
        Ok(outcome)
    }
}

#[async_trait]
impl Worker for SellerActor {
    fn role(&self) -> &'static str {
        "seller"
    }

    fn id(&self) -> u32 {
        self.id
    }

    async fn tick(&mut self) -> Result<Step, KernelError> {
        if !self.shared.is_active() {
            info!(seller = self.id, served = self.served, "closing the till");
            return Ok(Step::Shutdown);
        }
        let Some(msg) = self.shared.store.try_take(&StoreTag::Orders) else {
            return Ok(Step::Idle(POLL_DELAY));
        };
        let ticket = match msg {
            StoreMsg::Order(ticket) => ticket,
            StoreMsg::Terminate => return Ok(Step::Shutdown),
        };
        match self.handle_ticket(ticket) {
            // Pacing pauses simulate handling and hand-over time.
            Ok(Service::Complaint) => {
                Ok(Step::Idle(Duration::from_millis(self.rng.gen_range(1000..=3000))))
            }
            Ok(Service::Fulfilled(..)) => {
                Ok(Step::Idle(Duration::from_millis(self.rng.gen_range(500..=1500))))
            }
            Ok(Service::Rejected(_)) => Ok(Step::Continue),
            Err(err) => {
                warn!(seller = self.id, error = %err, "request dropped, ledger unavailable");
                Ok(Step::Idle(POLL_DELAY))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BakeryConfig;
    use crate::domain::ProductTable;

    fn shared_with_cake(produced: u32, sold: u32) -> Shared {
        let shared = Shared::open(BakeryConfig::parse("RNG_SEED=31").unwrap());
        shared
            .ledger
            .with(|ledger| {
                let mut produced_t = ProductTable::<u32>::default();
                let mut sold_t = ProductTable::<u32>::default();
                produced_t[Product::Cake] = produced;
                sold_t[Product::Cake] = sold;
                *ledger = Ledger::with_counts(produced_t, sold_t);
            })
            .unwrap();
        shared
    }

    fn seller(shared: &Shared) -> SellerActor {
        SellerActor::new(0, shared.clone(), shared.config.rng_for(3))
    }

    #[test]
    fn specialty_reserve_rejects_a_sale_that_dips_into_it() {
        // available = 5; selling 3 would leave 2, below the reserve of 3.
        let shared = shared_with_cake(10, 5);
        let mut seller = seller(&shared);

        let outcome = seller
            .handle_ticket(OrderTicket::request(1, Product::Cake, 0, 3))
            .unwrap();
        assert_eq!(outcome, Service::Rejected(Product::Cake));

        let reply = shared.store.try_take(&StoreTag::Reply(1)).unwrap();
        let StoreMsg::Order(reply) = reply else {
            panic!("expected an order reply");
        };
        assert!(!reply.fulfilled);
        let (sold, missing) = shared
            .ledger
            .with(|l| (l.sold(Product::Cake), l.missing_item_requests()))
            .unwrap();
        assert_eq!(sold, 5);
        assert_eq!(missing, 1);
    }

    #[test]
    fn sale_above_the_reserve_goes_through() {
        // available = 5; selling 1 leaves 4, the reserve of 3 is intact.
        let shared = shared_with_cake(10, 5);
        let price = shared.config.prices[Product::Cake];
        let mut seller = seller(&shared);

        let outcome = seller
            .handle_ticket(OrderTicket::request(2, Product::Cake, 0, 1))
            .unwrap();
        assert_eq!(outcome, Service::Fulfilled(Product::Cake, 1));
        assert_eq!(seller.served(), 1);

        let reply = shared.store.try_take(&StoreTag::Reply(2)).unwrap();
        let StoreMsg::Order(reply) = reply else {
            panic!("expected an order reply");
        };
        assert!(reply.fulfilled);
        let (sold, profit) = shared
            .ledger
            .with(|l| (l.sold(Product::Cake), l.total_profit()))
            .unwrap();
        assert_eq!(sold, 6);
        assert_eq!(profit, price);
    }

    #[test]
    fn sandwiches_require_double_cover() {
        let shared = Shared::open(BakeryConfig::parse("RNG_SEED=31").unwrap());
        shared
            .ledger
            .with(|ledger| {
                for _ in 0..3 {
                    ledger.record_production(Product::Sandwich);
                }
            })
            .unwrap();
        let mut seller = seller(&shared);

        // available = 3 < 2 × 2
        let outcome = seller
            .handle_ticket(OrderTicket::request(3, Product::Sandwich, 0, 2))
            .unwrap();
        assert_eq!(outcome, Service::Rejected(Product::Sandwich));

        // available = 3 >= 2 × 1
        let outcome = seller
            .handle_ticket(OrderTicket::request(3, Product::Sandwich, 0, 1))
            .unwrap();
        assert_eq!(outcome, Service::Fulfilled(Product::Sandwich, 1));
    }

    #[test]
    fn complaints_count_without_touching_sales() {
        let shared = shared_with_cake(10, 5);
        let mut seller = seller(&shared);

        let complaint = OrderTicket::request(4, Product::Cake, 0, 1).into_complaint();
        assert_eq!(seller.handle_ticket(complaint).unwrap(), Service::Complaint);

        let (sold, complained) = shared
            .ledger
            .with(|l| (l.sold(Product::Cake), l.complained_customers()))
            .unwrap();
        assert_eq!(sold, 5);
        assert_eq!(complained, 1);
        // Complaints get no reply.
        assert!(shared.store.try_take(&StoreTag::Reply(4)).is_none());
    }
}
