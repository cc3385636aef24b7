//! # Worker Contract & Drive Loop
//!
//! This module defines the [`Worker`] trait, the contract a long-running
//! actor implements, and [`drive`], the run loop written once and reused by
//! every worker family.
//!
//! # Architecture Note
//! A worker exposes exactly one iteration of its loop as [`Worker::tick`].
//! The drive loop owns the repetition, the pacing sleeps, and the start/stop
//! logging, so every worker in the system starts, idles, and shuts down the
//! same way, and every iteration is directly callable from a test without
//! spawning anything.
//!
//! Error policy follows the taxonomy the workers share: iteration-local
//! failures are handled (logged) inside `tick` and reported as a retry via
//! [`Step`]; an `Err` out of `tick` is loop-fatal for that worker and only
//! that worker. Failures never cross worker boundaries.

use crate::error::KernelError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};

/// What a worker wants to happen after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Run the next iteration immediately.
    Continue,
    /// Sleep before the next iteration (pacing or backoff).
    Idle(Duration),
    /// Exit the loop cleanly.
    Shutdown,
}

/// A long-running actor driven by [`drive`].
#[async_trait]
pub trait Worker: Send + 'static {
    /// Stable role name for logs (e.g. "chef", "seller").
    fn role(&self) -> &'static str;

    /// Instance id within the role.
    fn id(&self) -> u32;

    /// Runs one iteration of the worker's loop.
    async fn tick(&mut self) -> Result<Step, KernelError>;
}

/// Runs a worker to completion: loops `tick`, sleeping on [`Step::Idle`],
/// until the worker asks to shut down or returns a loop-fatal error.
pub async fn drive<W: Worker>(mut worker: W) {
    let role = worker.role();
    let id = worker.id();
    info!(role, id, "worker started");
    loop {
        match worker.tick().await {
            Ok(Step::Continue) => {}
            Ok(Step::Idle(pause)) => tokio::time::sleep(pause).await,
            Ok(Step::Shutdown) => break,
            Err(err) => {
                error!(role, id, error = %err, "worker stopping after unrecoverable failure");
                break;
            }
        }
    }
    info!(role, id, "worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        remaining: u32,
    }

    #[async_trait]
    impl Worker for Countdown {
        fn role(&self) -> &'static str {
            "countdown"
        }

        fn id(&self) -> u32 {
            0
        }

        async fn tick(&mut self) -> Result<Step, KernelError> {
            if self.remaining == 0 {
                return Ok(Step::Shutdown);
            }
            self.remaining -= 1;
            Ok(Step::Idle(Duration::from_millis(10)))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drive_runs_until_shutdown() {
        let worker = Countdown { remaining: 3 };
        // 3 working ticks + 1 shutdown tick; paused time makes this instant.
        drive(worker).await;
    }

    struct Faulty;

    #[async_trait]
    impl Worker for Faulty {
        fn role(&self) -> &'static str {
            "faulty"
        }

        fn id(&self) -> u32 {
            1
        }

        async fn tick(&mut self) -> Result<Step, KernelError> {
            Err(KernelError::RegionPoisoned { region: "ledger" })
        }
    }

    #[tokio::test]
    async fn drive_stops_on_fatal_error() {
        // Must return rather than loop forever.
        drive(Faulty).await;
    }
}
