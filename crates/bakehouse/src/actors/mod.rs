//! # Actors
//!
//! One module per worker family. Every family implements a single iteration
//! of its loop as an ordinary method (directly callable from tests) and
//! plugs it into the kernel's [`Worker`](bakehouse_kernel::Worker) contract;
//! the kernel's drive loop owns repetition, pacing, and start/stop logging.
//! Customers are the exception (short-lived tasks with a bounded lifetime
//! rather than driven loops), and management runs its own loop because it
//! finishes with a value, the closing [`Summary`](management::Summary).

pub mod baker;
pub mod chef;
pub mod customer;
pub mod management;
pub mod monitor;
pub mod seller;
pub mod supply;

pub use baker::BakerActor;
pub use chef::ChefActor;
pub use customer::{CustomerActor, CustomerGenerator};
pub use management::{ManagementActor, Summary};
pub use monitor::MonitorActor;
pub use seller::SellerActor;
pub use supply::SupplyActor;
