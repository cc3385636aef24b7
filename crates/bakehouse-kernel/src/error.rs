//! # Kernel Errors
//!
//! Failures raised by the coordination primitives themselves. Domain code
//! decides per call site whether a failure is retryable (log and try the
//! next iteration) or fatal for the worker's loop.

/// Errors that can occur inside the kernel primitives.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// A region's mutex was poisoned by a panic in another holder.
    #[error("shared region '{region}' is poisoned")]
    RegionPoisoned { region: &'static str },
    /// A bus's internal mutex was poisoned by a panic in another holder.
    #[error("message bus '{bus}' is poisoned")]
    BusPoisoned { bus: &'static str },
    /// The bus was closed; no further messages are accepted.
    #[error("message bus '{bus}' is closed")]
    BusClosed { bus: &'static str },
}
