//! # Shared Context
//!
//! [`Shared`] bundles the configuration, the two regions, and the two buses,
//! and is handed to every actor at construction. Nothing in the simulation
//! reads these through globals; ownership and lifetime stay explicit.

use crate::config::BakeryConfig;
use crate::messages::{ControlMsg, ControlTag, StoreMsg, StoreTag};
use crate::state::{Inventory, Ledger};
use bakehouse_kernel::{Region, TagBus};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Handles to everything the actors coordinate through.
#[derive(Clone)]
pub struct Shared {
    pub config: Arc<BakeryConfig>,
    pub inventory: Arc<Region<Inventory>>,
    pub ledger: Arc<Region<Ledger>>,
    pub store: Arc<TagBus<StoreTag, StoreMsg>>,
    pub control: Arc<TagBus<ControlTag, ControlMsg>>,
}

impl Shared {
    /// Creates the regions and buses for a fresh run: inventory seeded from
    /// the config, ledger active with the clock started.
    pub fn open(config: BakeryConfig) -> Self {
        let inventory = Inventory::seeded(&config);
        Self {
            config: Arc::new(config),
            inventory: Arc::new(Region::new("inventory", inventory)),
            ledger: Arc::new(Region::new("ledger", Ledger::opened())),
            store: Arc::new(TagBus::new("store")),
            control: Arc::new(TagBus::new("control")),
        }
    }

    /// Whether the simulation is still running. A poisoned ledger reads as
    /// inactive so every loop winds down instead of spinning on errors.
    pub fn is_active(&self) -> bool {
        self.ledger.with(|ledger| ledger.is_active()).unwrap_or(false)
    }

    /// Drives the whole simulation toward shutdown: flips the active flag,
    /// broadcasts the terminate notice on both buses, and closes them so
    /// every bounded wait wakes immediately. Safe to call more than once;
    /// both the signal handler and management use this same path.
    pub fn terminate(&self, reason: &str) {
        info!(reason, "closing the bakery");
        if let Err(err) = self.ledger.with(|ledger| ledger.deactivate()) {
            error!(error = %err, "could not flip the active flag");
        }
        if !self.store.is_closed() {
            if let Err(err) = self.store.publish(StoreTag::Shutdown, StoreMsg::Terminate) {
                warn!(error = %err, "terminate notice lost on store bus");
            }
        }
        if !self.control.is_closed() {
            if let Err(err) = self
                .control
                .publish(ControlTag::Shutdown, ControlMsg::Terminate)
            {
                warn!(error = %err, "terminate notice lost on control bus");
            }
        }
        self.store.close();
        self.control.close();
    }
}
