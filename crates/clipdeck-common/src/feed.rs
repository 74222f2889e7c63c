use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use crate::SubscriptionId;

type SubscriberMap = HashMap<SubscriptionId, UnboundedSender<Vec<String>>>;
type Subscribers = Mutex<SubscriberMap>;

/// Fan-out of full history snapshots to every live subscription.
///
/// Cloning a feed shares its subscriber table, so a producer task and the
/// host that hands out subscriptions can each hold one.
#[derive(Clone, Default)]
pub struct HistoryFeed {
    subscribers: Arc<Subscribers>,
}

impl HistoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriptionId::new();
        lock(&self.subscribers).insert(id, tx);
        debug!("History subscription registered: {}", id);

        Subscription {
            id,
            receiver: rx,
            feed: Arc::downgrade(&self.subscribers),
        }
    }

    /// Send a copy of `history` to every subscriber. Returns how many
    /// subscribers received it.
    pub fn publish(&self, history: &[String]) -> usize {
        let mut subscribers = lock(&self.subscribers);
        // Senders whose receiver is already gone are pruned.
        subscribers.retain(|_, tx| tx.send(history.to_vec()).is_ok());
        trace!(
            "Published {} entries to {} subscribers",
            history.len(),
            subscribers.len()
        );
        subscribers.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

/// Handle for one registration on a [`HistoryFeed`]. Dropping it
/// deregisters from the feed.
pub struct Subscription {
    id: SubscriptionId,
    receiver: UnboundedReceiver<Vec<String>>,
    feed: Weak<Subscribers>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take the next pending snapshot without waiting.
    pub fn try_next(&mut self) -> Option<Vec<String>> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.feed.upgrade() {
            lock(&subscribers).remove(&self.id);
            debug!("History subscription released: {}", self.id);
        }
    }
}

fn lock(subscribers: &Subscribers) -> MutexGuard<'_, SubscriberMap> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}
