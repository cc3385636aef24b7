//! # Bakehouse Kernel
//!
//! Domain-free coordination primitives for actor-style simulations: a small
//! set of building blocks that let many independently scheduled tasks share
//! state and exchange messages without any task ever touching unguarded data.
//!
//! ## Building Blocks
//!
//! - [`Region<T>`](region::Region): a named, mutex-guarded shared-state
//!   region. The data is only reachable through a scope-bound accessor, so
//!   the lock is released on every exit path and "forgot to unlock" bugs are
//!   unrepresentable.
//! - [`TagBus<K, M>`](bus::TagBus): a tag-addressed message broker.
//!   Producers publish under a tag; consumers take the next message matching
//!   a tag without blocking, or wait with a deadline. Reply correlation is a
//!   dynamic tag, not a second channel.
//! - [`Worker`](worker::Worker): the contract for a long-running actor, plus
//!   [`drive`](worker::drive), the run loop written once and reused by every
//!   worker family.
//!
//! ## Concurrency Model
//!
//! Workers run as independent Tokio tasks with no ordering guarantees beyond
//! what the regions' locks and the buses impose. Critical sections under a
//! [`Region`](region::Region) are synchronous and short; a worker never
//! holds a region lock across an `.await`. Pacing delays and bounded waits
//! go through `tokio::time`, so tests can run them under paused time.

pub mod bus;
pub mod error;
pub mod region;
pub mod tracing;
pub mod worker;

// Re-export core types for convenience
pub use bus::TagBus;
pub use error::KernelError;
pub use region::Region;
pub use worker::{drive, Step, Worker};
