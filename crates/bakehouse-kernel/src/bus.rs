//! # Tagged Message Bus
//!
//! This module defines [`TagBus<K, M>`], a broker with two operations at its
//! heart: *publish under a tag* and *take the next message matching a tag
//! without blocking*. A consumer asking for tag `T` never sees messages
//! published under any other tag, and a message is consumed exactly once.
//!
//! # Architecture Note
//! Tags are ordinary values, so reply correlation is a dynamic tag (one per
//! requester) rather than a separate channel per conversation. On top of the
//! non-blocking receive the bus offers [`TagBus::take_deadline`], a genuine
//! bounded wait: the caller parks on the bus's notifier and wakes on the
//! first matching publish, on close, or when the deadline passes, whichever
//! comes first. That replaces receive-then-sleep polling loops while keeping
//! the same observable contract.
//!
//! Closing the bus is terminal. Publishes start failing, waiting consumers
//! wake immediately, and already-queued messages remain drainable so late
//! consumers can still observe a shutdown notice.

use crate::error::KernelError;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::warn;

struct Slots<K, M> {
    queues: HashMap<K, VecDeque<M>>,
    closed: bool,
}

/// A tag-addressed broker for transient messages.
pub struct TagBus<K, M> {
    name: &'static str,
    slots: Mutex<Slots<K, M>>,
    notify: Notify,
}

impl<K, M> TagBus<K, M>
where
    K: Eq + Hash,
{
    /// Creates an empty, open bus. The name appears in logs and errors.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Mutex::new(Slots {
                queues: HashMap::new(),
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// The bus's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Publishes `msg` under `tag` and wakes any waiting consumers.
    ///
    /// Fails once the bus is closed; senders treat that as a lost message
    /// (log and move on), never as a retry trigger.
    pub fn publish(&self, tag: K, msg: M) -> Result<(), KernelError> {
        {
            let mut slots = self
                .slots
                .lock()
                .map_err(|_| KernelError::BusPoisoned { bus: self.name })?;
            if slots.closed {
                return Err(KernelError::BusClosed { bus: self.name });
            }
            slots.queues.entry(tag).or_default().push_back(msg);
        }
        self.notify.notify_waiters();
        Ok(())
    }

    /// Takes the next message published under `tag`, or `None` if no such
    /// message exists right now. Never blocks.
    pub fn try_take(&self, tag: &K) -> Option<M> {
        let mut slots = match self.slots.lock() {
            Ok(slots) => slots,
            Err(_) => {
                warn!(bus = self.name, "bus mutex poisoned, treating as empty");
                return None;
            }
        };
        let queue = slots.queues.get_mut(tag)?;
        let msg = queue.pop_front();
        if queue.is_empty() {
            // Reply tags are dynamic; drop drained queues so the map does
            // not grow with every requester that ever existed.
            slots.queues.remove(tag);
        }
        msg
    }

    /// Waits up to `patience` for a message under `tag`.
    ///
    /// Returns `None` on deadline expiry or when the bus closes with no
    /// matching message queued.
    pub async fn take_deadline(&self, tag: &K, patience: Duration) -> Option<M> {
        let deadline = tokio::time::Instant::now() + patience;
        loop {
            // Register interest before checking, so a publish between the
            // check and the await cannot be missed.
            let notified = self.notify.notified();
            if let Some(msg) = self.try_take(tag) {
                return Some(msg);
            }
            if self.is_closed() {
                return None;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                // Deadline hit; one last look in case a publish raced it.
                return self.try_take(tag);
            }
        }
    }

    /// Number of messages currently queued under `tag`.
    pub fn pending(&self, tag: &K) -> usize {
        self.slots
            .lock()
            .map(|slots| slots.queues.get(tag).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }

    /// Whether [`TagBus::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.slots.lock().map(|slots| slots.closed).unwrap_or(true)
    }

    /// Closes the bus: rejects further publishes and wakes every waiter.
    /// Queued messages stay drainable via [`TagBus::try_take`].
    pub fn close(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.closed = true;
        }
        self.notify.notify_waiters();
    }
}
