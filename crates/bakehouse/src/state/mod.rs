//! # Shared State
//!
//! The two lock-guarded regions every actor coordinates through, the raw
//! material [`Inventory`] and the production/sales [`Ledger`], plus the
//! management-owned chef [`roster`]. The region structs expose invariant-
//! protecting methods rather than raw fields; callers reach them only
//! through a [`Region`](bakehouse_kernel::Region).

pub mod inventory;
pub mod ledger;
pub mod roster;

pub use inventory::{Inventory, InventorySnapshot, StockLevel};
pub use ledger::{Ledger, LedgerSnapshot};
pub use roster::{BakerCrew, ChefRoster};
