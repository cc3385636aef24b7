//! # Bakehouse
//!
//! A bakery simulated as independently scheduled actors (supply buyers,
//! chefs, bakers, sellers, customers, and a management controller) that
//! coordinate purely through two lock-guarded shared regions (the raw
//! material inventory and the production/sales ledger) and two tag-addressed
//! message buses (customer traffic and control notices).
//!
//! ## Layout
//!
//! - [`domain`]: materials, products, roles, recipes
//! - [`config`]: the `KEY=value` configuration file
//! - [`state`]: the two shared regions plus the chef roster
//! - [`messages`]: bus payloads and tags
//! - [`actors`]: one module per worker family
//! - [`lifecycle`]: bootstrap, spawning, and graceful close
//!
//! The coordination primitives (guarded regions, tagged bus, the generic
//! worker loop) live in the `bakehouse-kernel` crate.

pub mod actors;
pub mod config;
pub mod context;
pub mod domain;
pub mod lifecycle;
pub mod messages;
pub mod state;

pub use config::BakeryConfig;
pub use context::Shared;
pub use lifecycle::Bakery;
