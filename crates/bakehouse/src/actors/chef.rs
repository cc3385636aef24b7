//! Chefs: turn raw materials into intermediate and final products.
//!
//! Each role has a fixed recipe and produces exactly one product type. The
//! two patisserie roles additionally consume one unit of finished paste and
//! are the only workers that ever hold both regions at once: the ledger
//! nests inside the inventory lock, and every both-region call site in the
//! crate uses that same acquisition order.

use crate::context::Shared;
use crate::domain::{ChefRole, Product};
use async_trait::async_trait;
use bakehouse_kernel::{KernelError, Step, Worker};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff while the recipe's ingredients are short.
const INGREDIENT_BACKOFF: Duration = Duration::from_secs(3);
/// Backoff while no paste is available for the patisserie roles.
const PASTE_BACKOFF: Duration = Duration::from_secs(2);
/// Retry pause after a failed region acquisition.
const LOCK_RETRY: Duration = Duration::from_secs(1);

/// Outcome of one production attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Produced { product: Product, subtype: u32 },
    MissingIngredients,
    NoPaste,
}

pub struct ChefActor {
    role: ChefRole,
    id: u32,
    shared: Shared,
    rng: StdRng,
}

impl ChefActor {
    pub fn new(role: ChefRole, id: u32, shared: Shared, rng: StdRng) -> Self {
        Self {
            role,
            id,
            shared,
            rng,
        }
    }

    /// One production attempt: pick a subtype, then check-and-consume the
    /// recipe atomically under the inventory lock. No partial consumption
    /// ever happens: an attempt either takes every ingredient or none.
    pub fn attempt(&mut self) -> Result<Attempt, KernelError> {
        let product = self.role.product();
        let categories = self.shared.config.categories[product];
        let subtype = if categories > 0 {
            self.rng.gen_range(0..categories)
        } else {
            0
        };
        let recipe = self.role.recipe();

        if self.role.needs_paste() {
            // Paste gate and consumption in one nested section, so two
            // patisserie chefs cannot both claim the last unit of paste.
            let outcome = self.shared.inventory.with(|inventory| {
                if !inventory.can_consume(recipe) {
                    return Ok(Attempt::MissingIngredients);
                }
                self.shared.ledger.with(|ledger| {
                    if ledger.available(Product::Paste) == 0 {
                        return Attempt::NoPaste;
                    }
                    inventory.consume(recipe);
                    ledger.consume_paste();
                    ledger.record_production(product);
                    Attempt::Produced { product, subtype }
                })
            })?;
            outcome
        } else {
            if !self.shared.inventory.with(|inventory| inventory.consume(recipe))? {
                return Ok(Attempt::MissingIngredients);
            }
            self.shared
                .ledger
                .with(|ledger| ledger.record_production(product))?;
            Ok(Attempt::Produced { product, subtype })
        }
    }
}

#[async_trait]
impl Worker for ChefActor {
    fn role(&self) -> &'static str {
        self.role.label()
    }

    fn id(&self) -> u32 {
        self.id
    }

    async fn tick(&mut self) -> Result<Step, KernelError> {
        if !self.shared.is_active() {
            return Ok(Step::Shutdown);
        }
        match self.attempt() {
            Ok(Attempt::Produced { product, subtype }) => {
                debug!(role = %self.role, id = self.id, %product, subtype, "prepared");
                Ok(Step::Idle(self.shared.config.production_time(product)))
            }
            Ok(Attempt::MissingIngredients) => Ok(Step::Idle(INGREDIENT_BACKOFF)),
            Ok(Attempt::NoPaste) => Ok(Step::Idle(PASTE_BACKOFF)),
            Err(err) => {
                warn!(role = %self.role, id = self.id, error = %err, "region unavailable, retrying");
                Ok(Step::Idle(LOCK_RETRY))
            }
        }
    }
}
