//! Bakers: finish goods up to each product's stock cap.
//!
//! No ingredient gating: bakers work entirely against the ledger. The
//! cake/sweet and patisserie bakers fill whichever owned type is first
//! under its cap; the bread baker both bakes bread and assembles
//! sandwiches in the same pass.

use crate::context::Shared;
use crate::domain::{BakerRole, Product};
use async_trait::async_trait;
use bakehouse_kernel::{KernelError, Step, Worker};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Backoff when every owned type sits at its cap.
const CAPACITY_BACKOFF: Duration = Duration::from_secs(2);

pub struct BakerActor {
    role: BakerRole,
    id: u32,
    shared: Shared,
    rng: StdRng,
}

impl BakerActor {
    pub fn new(role: BakerRole, id: u32, shared: Shared, rng: StdRng) -> Self {
        Self {
            role,
            id,
            shared,
            rng,
        }
    }

    /// One pass over the role's owned product types under the ledger lock.
    /// Returns what was baked this pass.
    pub fn bake_pass(&mut self) -> Result<Vec<Product>, KernelError> {
        let capacity = self.shared.config.capacity;
        let fills_all = self.role.fills_all_owned();
        let owned = self.role.products();
        self.shared.ledger.with(|ledger| {
            let mut baked = Vec::new();
            for &product in owned {
                if ledger.produced(product) < capacity[product] {
                    ledger.record_production(product);
                    baked.push(product);
                    if !fills_all {
                        break;
                    }
                }
            }
            baked
        })
    }
}

#[async_trait]
impl Worker for BakerActor {
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
        // An unavailable ledger region ends this worker's loop.
        let baked = self.bake_pass()?;
        let Some(&first) = baked.first() else {
            return Ok(Step::Idle(CAPACITY_BACKOFF));
        };
        for &product in &baked {
            debug!(role = %self.role, id = self.id, %product, "baked");
        }
        // Randomized fraction of the baking time keeps the ovens out of
        // lockstep.
        let base = self.shared.config.production_time(first);
        let factor = self.rng.gen_range(0.8..1.2);
        Ok(Step::Idle(base.mul_f64(factor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BakeryConfig;

    fn shared() -> Shared {
        Shared::open(BakeryConfig::parse("RNG_SEED=23").unwrap())
    }

    fn baker(role: BakerRole, shared: &Shared) -> BakerActor {
        let rng = shared.config.rng_for(7);
        BakerActor::new(role, 0, shared.clone(), rng)
    }

    #[test]
    fn cake_sweet_baker_prefers_cake_until_capped() {
        let shared = shared();
        let cap = shared.config.capacity[Product::Cake];
        let mut baker = baker(BakerRole::CakeSweet, &shared);

        for _ in 0..cap {
            assert_eq!(baker.bake_pass().unwrap(), vec![Product::Cake]);
        }
        // Cake is now at cap; production falls through to sweets.
        assert_eq!(baker.bake_pass().unwrap(), vec![Product::Sweet]);
    }

    #[test]
    fn bread_baker_fills_bread_and_sandwiches_together() {
        let shared = shared();
        let mut baker = baker(BakerRole::Bread, &shared);

        assert_eq!(
            baker.bake_pass().unwrap(),
            vec![Product::Bread, Product::Sandwich]
        );
        let (bread, sandwich) = shared
            .ledger
            .with(|l| (l.produced(Product::Bread), l.produced(Product::Sandwich)))
            .unwrap();
        assert_eq!((bread, sandwich), (1, 1));
    }

    #[test]
    fn fully_capped_roles_bake_nothing() {
        let shared = shared();
        let capacity = shared.config.capacity;
        shared
            .ledger
            .with(|ledger| {
                for product in BakerRole::Patisserie.products() {
                    for _ in 0..capacity[*product] {
                        ledger.record_production(*product);
                    }
                }
            })
            .unwrap();
        let mut baker = baker(BakerRole::Patisserie, &shared);
        assert!(baker.bake_pass().unwrap().is_empty());
    }

    #[tokio::test]
    async fn capped_baker_backs_off() {
        let shared = shared();
        let capacity = shared.config.capacity;
        shared
            .ledger
            .with(|ledger| {
                for product in BakerRole::CakeSweet.products() {
                    for _ in 0..capacity[*product] {
                        ledger.record_production(*product);
                    }
                }
            })
            .unwrap();
        let mut baker = baker(BakerRole::CakeSweet, &shared);
        assert_eq!(baker.tick().await.unwrap(), Step::Idle(CAPACITY_BACKOFF));
    }
}
