//! Raw-material stock, one of the two shared regions.

use crate::config::BakeryConfig;
use crate::domain::{MaterialTable, RawMaterial};
use serde::{Deserialize, Serialize};

/// Stock of a single material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub quantity: u32,
    /// Below this, supply reorders.
    pub min_threshold: u32,
}

/// The raw-material region. Quantities never go negative: consumption is a
/// single check-then-decrement under the region lock.
#[derive(Debug)]
pub struct Inventory {
    stock: MaterialTable<StockLevel>,
}

/// Point-in-time copy for the display.
pub type InventorySnapshot = MaterialTable<StockLevel>;

impl Inventory {
    /// Initial stock per the startup rule: quantity at twice the minimum
    /// purchase, reorder threshold at half of it.
    pub fn seeded(config: &BakeryConfig) -> Self {
        Self {
            stock: MaterialTable::build(|material| StockLevel {
                quantity: config.min_purchase[material] * 2,
                min_threshold: config.min_purchase[material] / 2,
            }),
        }
    }

    /// Builds an inventory with explicit levels (tests and scenarios).
    pub fn with_levels(stock: MaterialTable<StockLevel>) -> Self {
        Self { stock }
    }

    pub fn level(&self, material: RawMaterial) -> StockLevel {
        self.stock[material]
    }

    pub fn needs_restock(&self, material: RawMaterial) -> bool {
        let level = self.stock[material];
        level.quantity < level.min_threshold
    }

    pub fn restock(&mut self, material: RawMaterial, amount: u32) {
        self.stock[material].quantity += amount;
    }

    /// Whether every line of `recipe` is currently in stock.
    pub fn can_consume(&self, recipe: &[(RawMaterial, u32)]) -> bool {
        recipe
            .iter()
            .all(|&(material, required)| self.stock[material].quantity >= required)
    }

    /// Consumes `recipe` atomically: either every line is decremented or
    /// nothing is touched. Returns whether consumption happened.
    pub fn consume(&mut self, recipe: &[(RawMaterial, u32)]) -> bool {
        if !self.can_consume(recipe) {
            return false;
        }
        for &(material, required) in recipe {
            self.stock[material].quantity -= required;
        }
        true
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        self.stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChefRole;

    fn empty() -> Inventory {
        Inventory::with_levels(MaterialTable::build(|_| StockLevel {
            quantity: 0,
            min_threshold: 5,
        }))
    }

    #[test]
    fn seeding_follows_the_startup_rule() {
        let config = BakeryConfig::default();
        let inventory = Inventory::seeded(&config);
        for material in RawMaterial::ALL {
            let level = inventory.level(material);
            assert_eq!(level.quantity, config.min_purchase[material] * 2);
            assert_eq!(level.min_threshold, config.min_purchase[material] / 2);
        }
    }

    #[test]
    fn restock_threshold_uses_strict_comparison() {
        let mut inventory = empty();
        assert!(inventory.needs_restock(RawMaterial::Wheat));
        inventory.restock(RawMaterial::Wheat, 5);
        assert!(!inventory.needs_restock(RawMaterial::Wheat));
    }

    #[test]
    fn partial_stock_consumes_nothing() {
        let mut inventory = empty();
        // Paste needs wheat 2; give only 1 plus plenty of everything else.
        inventory.restock(RawMaterial::Wheat, 1);
        inventory.restock(RawMaterial::Yeast, 10);
        inventory.restock(RawMaterial::Butter, 10);
        inventory.restock(RawMaterial::Milk, 10);

        assert!(!inventory.consume(ChefRole::Paste.recipe()));
        // Nothing was decremented.
        assert_eq!(inventory.level(RawMaterial::Wheat).quantity, 1);
        assert_eq!(inventory.level(RawMaterial::Yeast).quantity, 10);
    }

    #[test]
    fn successful_consume_decrements_every_line() {
        let mut inventory = empty();
        inventory.restock(RawMaterial::SugarSalt, 4);
        inventory.restock(RawMaterial::SweetItems, 5);

        assert!(inventory.consume(ChefRole::Sweet.recipe()));
        assert_eq!(inventory.level(RawMaterial::SugarSalt).quantity, 2);
        assert_eq!(inventory.level(RawMaterial::SweetItems).quantity, 2);
    }
}
