//! # Bus Messages & Tags
//!
//! Payload and tag types for the two buses. The store bus carries customer
//! traffic (requests in under a generic tag, replies out under a dynamic
//! per-customer tag); the control bus carries supply notices toward
//! management. Both carry the terminate broadcast.

use crate::domain::{ChefRole, Product, RawMaterial};
use serde::{Deserialize, Serialize};

/// One customer request; echoed back with `fulfilled` set, it is the reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTicket {
    pub customer_id: u64,
    pub product: Product,
    /// Flavor/variety within the product's configured categories; 0 when the
    /// product has none.
    pub subtype: u32,
    pub quantity: u32,
    pub is_complaint: bool,
    pub fulfilled: bool,
}

impl OrderTicket {
    /// A fresh, unfulfilled purchase request.
    pub fn request(customer_id: u64, product: Product, subtype: u32, quantity: u32) -> Self {
        Self {
            customer_id,
            product,
            subtype,
            quantity,
            is_complaint: false,
            fulfilled: false,
        }
    }

    /// Turns this ticket into a complaint about the same product.
    pub fn into_complaint(mut self) -> Self {
        self.is_complaint = true;
        self.fulfilled = false;
        self
    }
}

/// Store-bus payload.
#[derive(Debug, Clone)]
pub enum StoreMsg {
    Order(OrderTicket),
    Terminate,
}

/// Store-bus addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTag {
    /// Incoming requests and complaints, picked up by any seller.
    Orders,
    /// Reply slot for exactly one customer.
    Reply(u64),
    /// Terminate broadcast.
    Shutdown,
}

/// Control-bus payload.
#[derive(Debug, Clone)]
pub enum ControlMsg {
    /// Supply restocked a material below its threshold.
    Restock(RawMaterial),
    Terminate,
}

/// Control-bus addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlTag {
    /// Notices addressed to management.
    Management,
    /// Terminate broadcast.
    Shutdown,
}

/// Management's decision to move chefs between teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reallocation {
    pub from: ChefRole,
    pub to: ChefRole,
    pub count: u32,
}
