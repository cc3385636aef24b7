//! # Lifecycle & Orchestration
//!
//! [`Bakery`] is the conductor: it creates the shared regions and buses,
//! spawns one task per configured worker for every role, and coordinates the
//! graceful close: management's summary first, then a join on every staff
//! task. The simulation core never creates or destroys these resources
//! itself; it only receives handles.
//!
//! External shutdown (a signal) reuses the same path: flip the active flag,
//! broadcast, join. There is no second teardown mechanism.

use crate::actors::{
    BakerActor, ChefActor, CustomerGenerator, ManagementActor, MonitorActor, SellerActor,
    Summary, SupplyActor,
};
use crate::config::BakeryConfig;
use crate::context::Shared;
use crate::domain::{BakerRole, ChefRole};
use crate::state::BakerCrew;
use bakehouse_kernel::drive;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// A running simulation: every worker spawned, regions seeded, clock started.
pub struct Bakery {
    shared: Shared,
    staff: Vec<JoinHandle<()>>,
    management: JoinHandle<Summary>,
}

impl Bakery {
    /// Opens the bakery: seeds the regions, creates the buses, and spawns
    /// the full staff per the configured head-counts.
    pub fn open(config: BakeryConfig) -> Self {
        let shared = Shared::open(config);
        let crew = BakerCrew::from_config(&shared.config);
        let mut staff = Vec::new();
        let mut stream = 0u64;
        let mut next_stream = move || {
            stream += 1;
            stream
        };

        for role in ChefRole::ALL {
            let team = shared.config.chefs[role];
            for id in 0..team {
                let rng = shared.config.rng_for(next_stream());
                staff.push(tokio::spawn(drive(ChefActor::new(
                    role,
                    id,
                    shared.clone(),
                    rng,
                ))));
            }
            info!(role = %role, team, "chef team ready");
        }

        for role in BakerRole::ALL {
            let team = crew.size(role);
            for id in 0..team {
                let rng = shared.config.rng_for(next_stream());
                staff.push(tokio::spawn(drive(BakerActor::new(
                    role,
                    id,
                    shared.clone(),
                    rng,
                ))));
            }
            info!(role = %role, team, "baker team ready");
        }

        for id in 0..shared.config.sellers {
            let rng = shared.config.rng_for(next_stream());
            staff.push(tokio::spawn(drive(SellerActor::new(
                id,
                shared.clone(),
                rng,
            ))));
        }

        for id in 0..shared.config.supply_staff {
            let rng = shared.config.rng_for(next_stream());
            staff.push(tokio::spawn(drive(SupplyActor::new(
                id,
                shared.clone(),
                rng,
            ))));
        }

        let rng = shared.config.rng_for(next_stream());
        staff.push(tokio::spawn(drive(CustomerGenerator::new(
            shared.clone(),
            rng,
        ))));
        staff.push(tokio::spawn(drive(MonitorActor::new(shared.clone()))));

        let management = tokio::spawn(ManagementActor::new(shared.clone()).run());

        info!(staff = staff.len() + 1, "bakery open");
        Self {
            shared,
            staff,
            management,
        }
    }

    /// Handles for signal wiring and tests.
    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Waits for the close decision, then joins every staff task. A staff
    /// task that panicked is logged; only a failed management task is an
    /// error, since it carries the summary.
    pub async fn close(self) -> Result<Summary, JoinError> {
        let summary = self.management.await?;
        for handle in self.staff {
            if let Err(err) = handle.await {
                error!(error = %err, "staff task failed");
            }
        }
        info!("bakery closed");
        Ok(summary)
    }
}
