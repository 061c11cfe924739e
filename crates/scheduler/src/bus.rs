// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event fan-out to subscribers.
//!
//! Fan-out never blocks the actor: the bus is a bounded broadcast
//! channel, so every subscriber observes the same event order, and one
//! that falls behind skips its oldest events and learns how many it
//! lost instead of back-pressuring the loop.

use herd_core::Event;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast bus carrying scheduler [`Event`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Open a new subscription starting at the next published event.
    pub fn subscribe(&self) -> EventStream {
        EventStream { rx: self.tx.subscribe(), missed: 0 }
    }

    /// Publish to all current subscribers. A send with no subscribers is
    /// not an error.
    pub fn publish(&self, event: Event) {
        trace!(event = %event.log_summary(), "publish");
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A subscription to the scheduler's event stream.
///
/// Dropping the stream unsubscribes.
pub struct EventStream {
    rx: broadcast::Receiver<Event>,
    missed: u64,
}

impl EventStream {
    /// Receive the next event. Returns `None` once the scheduler is gone
    /// and the backlog is drained. A lag gap is skipped and added to
    /// [`missed`](Self::missed).
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    self.missed += skipped;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Receive without waiting; `None` when no event is buffered.
    pub fn try_recv(&mut self) -> Option<Event> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    self.missed += skipped;
                }
                Err(_) => return None,
            }
        }
    }

    /// Events dropped because this subscriber fell behind.
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
