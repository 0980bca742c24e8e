//! Observer registry used by transports to fan out events.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use super::{Subscription, SubscriptionId, TransportEvent};

/// Registered event channels.
///
/// Registration and removal are explicit. A subscriber whose receiver was
/// dropped is pruned on the next emit.
#[derive(Default)]
pub struct Observers {
    next_id: AtomicU64,
    senders: Mutex<Vec<(SubscriptionId, mpsc::UnboundedSender<TransportEvent>)>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().push((id, tx));
        Subscription { id, events: rx }
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut senders = self.senders.lock();
        let before = senders.len();
        senders.retain(|(sid, _)| *sid != id);
        senders.len() != before
    }

    /// Deliver `event` to every subscriber, in registration order.
    ///
    /// The lock is held for the whole fan-out so concurrent emitters cannot
    /// interleave events differently for different subscribers.
    pub fn emit(&self, event: TransportEvent) {
        let mut senders = self.senders.lock();
        senders.retain(|(id, tx)| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                trace!(subscription = id.0, "Pruning closed subscriber");
            }
            delivered
        });
    }

    pub fn len(&self) -> usize {
        self.senders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
