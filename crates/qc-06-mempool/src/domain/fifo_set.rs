//! Insertion-ordered set.
//!
//! Membership is answered from a hash set; order is kept in a deque. Removal
//! from the middle scans the deque, which is acceptable because it only
//! happens for transactions a replica saw in someone else's proposal.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// FIFO queue with set semantics on its keys.
#[derive(Debug)]
pub struct FifoSet<K, V> {
    queue: VecDeque<(K, V)>,
    members: HashSet<K>,
}

impl<K, V> Default for FifoSet<K, V> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            members: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> FifoSet<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail. Returns the value back if the key is present.
    pub fn push_back(&mut self, key: K, value: V) -> Result<(), V> {
        if !self.members.insert(key.clone()) {
            return Err(value);
        }
        self.queue.push_back((key, value));
        Ok(())
    }

    /// Remove the head.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let (key, value) = self.queue.pop_front()?;
        self.members.remove(&key);
        Some((key, value))
    }

    /// Remove by key wherever it sits.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if !self.members.remove(key) {
            return None;
        }
        let index = self.queue.iter().position(|(k, _)| k == key)?;
        self.queue.remove(index).map(|(_, value)| value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.members.clear();
    }

    /// Values from head to tail.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.queue.iter().map(|(_, v)| v)
    }
}
