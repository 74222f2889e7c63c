use std::sync::{Mutex, MutexGuard, PoisonError};

use clipdeck_common::{HistoryFeed, Subscription};
use tracing::trace;

/// Bounded clipboard history, oldest first.
pub struct HistoryBuffer {
    entries: Vec<String>,
    max_entries: usize,
}

impl HistoryBuffer {
    pub fn new(max_entries: usize) -> Self {
        HistoryBuffer {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a newly copied value as the most recent entry. A value that is
    /// already present moves to the end instead of being duplicated. Empty
    /// values are ignored. Returns true if the history changed.
    pub fn push(&mut self, text: String) -> bool {
        if text.is_empty() || self.top() == Some(text.as_str()) {
            return false;
        }
        if let Some(pos) = self.entries.iter().position(|e| *e == text) {
            self.entries.remove(pos);
        } else if self.entries.len() >= self.max_entries {
            self.entries.remove(0);
        }
        self.entries.push(text);
        true
    }

    /// Replace the whole history, keeping only the newest entries that fit.
    pub fn replace(&mut self, mut entries: Vec<String>) -> bool {
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(..excess);
        }
        if entries == self.entries {
            return false;
        }
        self.entries = entries;
        true
    }

    /// Get the most recent entry.
    pub fn top(&self) -> Option<&str> {
        self.entries.last().map(|s| s.as_str())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// History shared between the feed reader task and the UI thread. Changes
/// are not announced until [`publish`](Self::publish) is called.
pub struct HistoryStore {
    buffer: Mutex<HistoryBuffer>,
    feed: HistoryFeed,
}

impl HistoryStore {
    pub fn new(max_entries: usize) -> Self {
        HistoryStore {
            buffer: Mutex::new(HistoryBuffer::new(max_entries)),
            feed: HistoryFeed::new(),
        }
    }

    pub fn append(&self, text: String) -> bool {
        self.lock().push(text)
    }

    pub fn replace(&self, entries: Vec<String>) -> bool {
        self.lock().replace(entries)
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lock().entries().to_vec()
    }

    /// Push the current history to every subscriber. The buffer stays locked
    /// until the snapshot is queued, so concurrent publishers deliver in
    /// history order.
    pub fn publish(&self) {
        let buffer = self.lock();
        let delivered = self.feed.publish(buffer.entries());
        trace!("History of {} entries sent to {} subscribers", buffer.len(), delivered);
    }

    pub fn subscribe(&self) -> Subscription {
        self.feed.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, HistoryBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_push_and_top() {
        let mut buf = HistoryBuffer::new(10);
        assert!(buf.push("one".to_string()));
        assert!(buf.push("two".to_string()));
        assert_eq!(buf.top(), Some("two"));
        assert_eq!(buf.entries(), &["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut buf = HistoryBuffer::new(2);
        buf.push("a".to_string());
        buf.push("b".to_string());
        buf.push("c".to_string());
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.entries(), &["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_push_existing_moves_to_end() {
        let mut buf = HistoryBuffer::new(2);
        buf.push("a".to_string());
        buf.push("b".to_string());
        assert!(buf.push("a".to_string()));
        assert_eq!(buf.entries(), &["b".to_string(), "a".to_string()]);
        assert!(!buf.push("a".to_string()));
    }

    #[test]
    fn test_push_ignores_empty() {
        let mut buf = HistoryBuffer::new(2);
        assert!(!buf.push(String::new()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_replace_keeps_newest() {
        let mut buf = HistoryBuffer::new(2);
        let entries: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert!(buf.replace(entries.clone()));
        assert_eq!(buf.entries(), &entries[1..]);
        assert!(!buf.replace(entries));
    }

    #[test]
    fn test_store_publishes_snapshot() {
        let store = HistoryStore::new(5);
        let mut sub = store.subscribe();
        store.append("x".to_string());
        store.append("y".to_string());
        assert_eq!(sub.try_next(), None);

        store.publish();
        assert_eq!(sub.try_next(), Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_concurrent_publish_never_goes_backward() {
        let store = Arc::new(HistoryStore::new(1000));
        let mut sub = store.subscribe();

        let republisher = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    store.publish();
                }
            })
        };
        for i in 0..1000 {
            store.append(format!("e{}", i));
            store.publish();
        }
        republisher.join().unwrap();

        let mut last_len = 0;
        let mut received = 0;
        while let Some(snapshot) = sub.try_next() {
            assert!(snapshot.len() >= last_len, "{} after {}", snapshot.len(), last_len);
            last_len = snapshot.len();
            received += 1;
        }
        assert_eq!(received, 2000);
        assert_eq!(last_len, 1000);
    }
}
