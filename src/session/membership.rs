//! Channel membership: the pending JOIN queue and the joined set.
//!
//! Both are written from public API calls and from the scheduler task.

use std::collections::VecDeque;

use dashmap::DashSet;
use parking_lot::Mutex;

/// Prefix `#` when missing. Case is kept.
pub fn normalize_channel(name: &str) -> String {
    if name.starts_with('#') {
        name.to_string()
    } else {
        format!("#{name}")
    }
}

/// The form stored in the joined set: `#`-prefixed and lower-cased.
pub fn canonical_channel(name: &str) -> String {
    normalize_channel(name).to_lowercase()
}

#[derive(Default)]
pub(crate) struct Membership {
    joined: DashSet<String>,
    pending: Mutex<VecDeque<String>>,
}

impl Membership {
    /// Queue a JOIN. Duplicates and already-joined channels are queued again.
    pub fn enqueue(&self, name: &str) {
        self.pending.lock().push_back(normalize_channel(name));
    }

    pub fn dequeue(&self) -> Option<String> {
        self.pending.lock().pop_front()
    }

    /// Put back a channel whose JOIN was never written.
    pub fn requeue_front(&self, channel: String) {
        self.pending.lock().push_front(channel);
    }

    /// Queue every joined channel again, in sorted order. Returns how many.
    pub fn requeue_joined(&self) -> usize {
        let joined = self.joined();
        let count = joined.len();
        self.pending.lock().extend(joined);
        count
    }

    pub fn mark_joined(&self, channel: &str) {
        self.joined.insert(canonical_channel(channel));
    }

    /// Returns whether the channel was in the joined set.
    pub fn remove_joined(&self, name: &str) -> bool {
        self.joined.remove(&canonical_channel(name)).is_some()
    }

    /// Joined channels, sorted.
    pub fn joined(&self) -> Vec<String> {
        let mut joined: Vec<String> = self.joined.iter().map(|c| c.key().clone()).collect();
        joined.sort();
        joined
    }

    /// Queued channels, front first.
    pub fn pending(&self) -> Vec<String> {
        self.pending.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.pending.lock().clear();
        self.joined.clear();
    }
}
