//! # Configuration
//!
//! [`BakeryConfig`] holds every tunable of the simulation, loaded from a
//! `KEY=value` text file: one entry per line, `#`-prefixed comments and blank
//! lines ignored, keys whitespace-trimmed. Unknown keys are logged and
//! skipped so a config written for a newer build still loads; a value that
//! fails to parse for a known key is an error.
//!
//! The loaded value is immutable for the run and handed to every actor at
//! construction; no actor reads configuration from ambient state.

use crate::domain::{
    BakerRole, BakerTable, ChefRole, ChefTable, MaterialTable, Product, ProductTable, RawMaterial,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Errors raised while loading or validating a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: invalid value '{value}' for {key}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Customer arrival and behavior bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerParams {
    pub arrival_min_secs: u64,
    pub arrival_max_secs: u64,
    pub patience_min_secs: u64,
    pub patience_max_secs: u64,
    pub complaint_probability: f64,
    pub max_purchase_items: u32,
}

/// Limits that end the simulation; any single one suffices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub frustrated_customers: u32,
    pub complained_customers: u32,
    pub missing_item_requests: u32,
    pub total_profit: f64,
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakeryConfig {
    /// Subtype (flavor/variety) count per product; 0 means no subtypes.
    pub categories: ProductTable<u32>,
    /// Initial chef head-count per role.
    pub chefs: ChefTable<u32>,
    /// Baker head-count per role; fixed for the whole run.
    pub bakers: BakerTable<u32>,
    pub sellers: u32,
    pub supply_staff: u32,
    /// Replenishment order bounds per material.
    pub min_purchase: MaterialTable<u32>,
    pub max_purchase: MaterialTable<u32>,
    pub prices: ProductTable<f64>,
    pub production_time_ms: ProductTable<u64>,
    /// Per-product stock cap enforced by the bakers.
    pub capacity: ProductTable<u32>,
    pub thresholds: Thresholds,
    pub max_simulation_minutes: u64,
    pub customer: CustomerParams,
    /// Fixed seed for reproducible runs; fresh entropy when absent.
    pub rng_seed: Option<u64>,
}

impl Default for BakeryConfig {
    fn default() -> Self {
        Self {
            categories: ProductTable::build(|p| match p {
                Product::Bread => 2,
                Product::Sandwich => 4,
                Product::Cake => 5,
                Product::Sweet => 6,
                Product::SweetPatisserie => 4,
                Product::SavoryPatisserie => 4,
                Product::Paste => 0,
            }),
            chefs: ChefTable::build(|_| 2),
            bakers: BakerTable::build(|_| 2),
            sellers: 3,
            supply_staff: 2,
            min_purchase: MaterialTable::build(|m| match m {
                RawMaterial::Wheat => 20,
                RawMaterial::Yeast => 10,
                RawMaterial::Butter => 10,
                RawMaterial::Milk => 12,
                RawMaterial::SugarSalt => 15,
                RawMaterial::SweetItems => 15,
                RawMaterial::CheeseSalami => 10,
            }),
            max_purchase: MaterialTable::build(|m| match m {
                RawMaterial::Wheat => 40,
                RawMaterial::Yeast => 20,
                RawMaterial::Butter => 20,
                RawMaterial::Milk => 24,
                RawMaterial::SugarSalt => 30,
                RawMaterial::SweetItems => 30,
                RawMaterial::CheeseSalami => 20,
            }),
            prices: ProductTable::build(|p| match p {
                Product::Bread => 2.5,
                Product::Sandwich => 4.0,
                Product::Cake => 15.0,
                Product::Sweet => 3.0,
                Product::SweetPatisserie => 5.5,
                Product::SavoryPatisserie => 5.0,
                Product::Paste => 0.0,
            }),
            production_time_ms: ProductTable::build(|p| match p {
                Product::Bread => 2000,
                Product::Sandwich => 1500,
                Product::Cake => 4000,
                Product::Sweet => 1000,
                Product::SweetPatisserie => 3000,
                Product::SavoryPatisserie => 3000,
                Product::Paste => 2500,
            }),
            capacity: ProductTable::build(|p| match p {
                Product::Bread => 50,
                Product::Sandwich => 40,
                Product::Cake => 30,
                Product::Sweet => 60,
                Product::SweetPatisserie => 25,
                Product::SavoryPatisserie => 25,
                Product::Paste => 0,
            }),
            thresholds: Thresholds {
                frustrated_customers: 15,
                complained_customers: 8,
                missing_item_requests: 30,
                total_profit: 1500.0,
            },
            max_simulation_minutes: 30,
            customer: CustomerParams {
                arrival_min_secs: 1,
                arrival_max_secs: 3,
                patience_min_secs: 5,
                patience_max_secs: 15,
                complaint_probability: 0.5,
                max_purchase_items: 3,
            },
            rng_seed: None,
        }
    }
}

impl BakeryConfig {
    /// Loads, parses, and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses configuration text, starting from the defaults.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!(line = idx + 1, content = raw, "skipping malformed config line");
                continue;
            };
            config.apply(key.trim(), value.trim(), idx + 1)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str, line: usize) -> Result<(), ConfigError> {
        fn num<T: std::str::FromStr>(
            key: &str,
            value: &str,
            line: usize,
        ) -> Result<T, ConfigError> {
            value.parse().map_err(|_| ConfigError::InvalidValue {
                line,
                key: key.to_string(),
                value: value.to_string(),
            })
        }

        match key {
            // Product categories
            "NUM_BREAD_CATEGORIES" => self.categories[Product::Bread] = num(key, value, line)?,
            "NUM_SANDWICH_TYPES" => self.categories[Product::Sandwich] = num(key, value, line)?,
            "NUM_CAKE_FLAVORS" => self.categories[Product::Cake] = num(key, value, line)?,
            "NUM_SWEET_FLAVORS" => self.categories[Product::Sweet] = num(key, value, line)?,
            "NUM_SWEET_PATISSERIES" => {
                self.categories[Product::SweetPatisserie] = num(key, value, line)?
            }
            "NUM_SAVORY_PATISSERIES" => {
                self.categories[Product::SavoryPatisserie] = num(key, value, line)?
            }

            // Stock caps
            "MAX_BREAD" => self.capacity[Product::Bread] = num(key, value, line)?,
            "MAX_SANDWICH" => self.capacity[Product::Sandwich] = num(key, value, line)?,
            "MAX_CAKE" => self.capacity[Product::Cake] = num(key, value, line)?,
            "MAX_SWEET" => self.capacity[Product::Sweet] = num(key, value, line)?,
            "MAX_SWEET_PATISSERIE" => {
                self.capacity[Product::SweetPatisserie] = num(key, value, line)?
            }
            "MAX_SAVORY_PATISSERIE" => {
                self.capacity[Product::SavoryPatisserie] = num(key, value, line)?
            }

            // Staffing
            "NUM_PASTE_CHEFS" => self.chefs[ChefRole::Paste] = num(key, value, line)?,
            "NUM_CAKE_CHEFS" => self.chefs[ChefRole::Cake] = num(key, value, line)?,
            "NUM_SANDWICH_CHEFS" => self.chefs[ChefRole::Sandwich] = num(key, value, line)?,
            "NUM_SWEET_CHEFS" => self.chefs[ChefRole::Sweet] = num(key, value, line)?,
            "NUM_SWEET_PATISSERIE_CHEFS" => {
                self.chefs[ChefRole::SweetPatisserie] = num(key, value, line)?
            }
            "NUM_SAVORY_PATISSERIE_CHEFS" => {
                self.chefs[ChefRole::SavoryPatisserie] = num(key, value, line)?
            }
            "NUM_CAKE_SWEETS_BAKERS" => self.bakers[BakerRole::CakeSweet] = num(key, value, line)?,
            "NUM_PATISSERIE_BAKERS" => self.bakers[BakerRole::Patisserie] = num(key, value, line)?,
            "NUM_BREAD_BAKERS" => self.bakers[BakerRole::Bread] = num(key, value, line)?,
            "NUM_SELLERS" => self.sellers = num(key, value, line)?,
            "NUM_SUPPLY_CHAIN_EMPLOYEES" => self.supply_staff = num(key, value, line)?,

            // Purchase bounds
            "WHEAT_MIN_PURCHASE" => self.min_purchase[RawMaterial::Wheat] = num(key, value, line)?,
            "WHEAT_MAX_PURCHASE" => self.max_purchase[RawMaterial::Wheat] = num(key, value, line)?,
            "YEAST_MIN_PURCHASE" => self.min_purchase[RawMaterial::Yeast] = num(key, value, line)?,
            "YEAST_MAX_PURCHASE" => self.max_purchase[RawMaterial::Yeast] = num(key, value, line)?,
            "BUTTER_MIN_PURCHASE" => {
                self.min_purchase[RawMaterial::Butter] = num(key, value, line)?
            }
            "BUTTER_MAX_PURCHASE" => {
                self.max_purchase[RawMaterial::Butter] = num(key, value, line)?
            }
            "MILK_MIN_PURCHASE" => self.min_purchase[RawMaterial::Milk] = num(key, value, line)?,
            "MILK_MAX_PURCHASE" => self.max_purchase[RawMaterial::Milk] = num(key, value, line)?,
            "SUGAR_SALT_MIN_PURCHASE" => {
                self.min_purchase[RawMaterial::SugarSalt] = num(key, value, line)?
            }
            "SUGAR_SALT_MAX_PURCHASE" => {
                self.max_purchase[RawMaterial::SugarSalt] = num(key, value, line)?
            }
            "SWEET_ITEMS_MIN_PURCHASE" => {
                self.min_purchase[RawMaterial::SweetItems] = num(key, value, line)?
            }
            "SWEET_ITEMS_MAX_PURCHASE" => {
                self.max_purchase[RawMaterial::SweetItems] = num(key, value, line)?
            }
            "CHEESE_SALAMI_MIN_PURCHASE" => {
                self.min_purchase[RawMaterial::CheeseSalami] = num(key, value, line)?
            }
            "CHEESE_SALAMI_MAX_PURCHASE" => {
                self.max_purchase[RawMaterial::CheeseSalami] = num(key, value, line)?
            }

            // Prices
            "BREAD_BASE_PRICE" => self.prices[Product::Bread] = num(key, value, line)?,
            "SANDWICH_BASE_PRICE" => self.prices[Product::Sandwich] = num(key, value, line)?,
            "CAKE_BASE_PRICE" => self.prices[Product::Cake] = num(key, value, line)?,
            "SWEET_BASE_PRICE" => self.prices[Product::Sweet] = num(key, value, line)?,
            "SWEET_PATISSERIE_BASE_PRICE" => {
                self.prices[Product::SweetPatisserie] = num(key, value, line)?
            }
            "SAVORY_PATISSERIE_BASE_PRICE" => {
                self.prices[Product::SavoryPatisserie] = num(key, value, line)?
            }

            // Production times (milliseconds)
            "BREAD_PRODUCTION_TIME" => {
                self.production_time_ms[Product::Bread] = num(key, value, line)?
            }
            "SANDWICH_PRODUCTION_TIME" => {
                self.production_time_ms[Product::Sandwich] = num(key, value, line)?
            }
            "CAKE_PRODUCTION_TIME" => {
                self.production_time_ms[Product::Cake] = num(key, value, line)?
            }
            "SWEET_PRODUCTION_TIME" => {
                self.production_time_ms[Product::Sweet] = num(key, value, line)?
            }
            "PATISSERIE_PRODUCTION_TIME" => {
                let ms = num(key, value, line)?;
                self.production_time_ms[Product::SweetPatisserie] = ms;
                self.production_time_ms[Product::SavoryPatisserie] = ms;
            }
            "PASTE_PRODUCTION_TIME" => {
                self.production_time_ms[Product::Paste] = num(key, value, line)?
            }

            // Termination thresholds
            "FRUSTRATED_CUSTOMER_THRESHOLD" => {
                self.thresholds.frustrated_customers = num(key, value, line)?
            }
            "COMPLAINED_CUSTOMER_THRESHOLD" => {
                self.thresholds.complained_customers = num(key, value, line)?
            }
            "MISSING_ITEMS_REQUEST_THRESHOLD" => {
                self.thresholds.missing_item_requests = num(key, value, line)?
            }
            "PROFIT_THRESHOLD" => self.thresholds.total_profit = num(key, value, line)?,
            "SIMULATION_MAX_TIME_MINUTES" => self.max_simulation_minutes = num(key, value, line)?,

            // Customer behavior
            "CUSTOMER_ARRIVAL_MIN_INTERVAL" => {
                self.customer.arrival_min_secs = num(key, value, line)?
            }
            "CUSTOMER_ARRIVAL_MAX_INTERVAL" => {
                self.customer.arrival_max_secs = num(key, value, line)?
            }
            "CUSTOMER_PATIENCE_MIN_SECONDS" => {
                self.customer.patience_min_secs = num(key, value, line)?
            }
            "CUSTOMER_PATIENCE_MAX_SECONDS" => {
                self.customer.patience_max_secs = num(key, value, line)?
            }
            "CUSTOMER_COMPLAINT_PROBABILITY" => {
                self.customer.complaint_probability = num(key, value, line)?
            }
            "CUSTOMER_MAX_PURCHASE_ITEMS" => {
                self.customer.max_purchase_items = num(key, value, line)?
            }

            "RNG_SEED" => self.rng_seed = Some(num(key, value, line)?),

            _ => warn!(key, line, "skipping unknown config key"),
        }
        Ok(())
    }

    /// Checks cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for material in RawMaterial::ALL {
            if self.min_purchase[material] > self.max_purchase[material] {
                return Err(ConfigError::Invalid(format!(
                    "{material}: min purchase exceeds max purchase"
                )));
            }
        }
        for role in ChefRole::ALL {
            if self.chefs[role] == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{role}: every chef team needs at least one member"
                )));
            }
        }
        for role in BakerRole::ALL {
            if self.bakers[role] == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{role}: every baker team needs at least one member"
                )));
            }
        }
        for product in Product::ALL {
            if self.prices[product] < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{product}: price cannot be negative"
                )));
            }
        }
        if self.sellers == 0 {
            return Err(ConfigError::Invalid("at least one seller required".into()));
        }
        if self.supply_staff == 0 {
            return Err(ConfigError::Invalid(
                "at least one supply employee required".into(),
            ));
        }
        let c = &self.customer;
        if c.arrival_min_secs > c.arrival_max_secs {
            return Err(ConfigError::Invalid(
                "customer arrival: min interval exceeds max".into(),
            ));
        }
        if c.patience_min_secs > c.patience_max_secs {
            return Err(ConfigError::Invalid(
                "customer patience: min exceeds max".into(),
            ));
        }
        if !(0.0..=1.0).contains(&c.complaint_probability) {
            return Err(ConfigError::Invalid(
                "complaint probability must lie in [0, 1]".into(),
            ));
        }
        if c.max_purchase_items == 0 {
            return Err(ConfigError::Invalid(
                "customers must request at least one item".into(),
            ));
        }
        Ok(())
    }

    /// Configured production time for one unit of `product`.
    pub fn production_time(&self, product: Product) -> Duration {
        Duration::from_millis(self.production_time_ms[product])
    }

    /// A random generator for one actor.
    ///
    /// With a configured seed every stream is deterministic, so a run (and
    /// the scenario tests) replays exactly; without one, fresh entropy.
    pub fn rng_for(&self, stream: u64) -> StdRng {
        match self.rng_seed {
            Some(seed) => {
                StdRng::seed_from_u64(seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
            }
            None => StdRng::from_entropy(),
        }
    }
}
