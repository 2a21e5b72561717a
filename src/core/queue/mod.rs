use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

/// Core handoff structure: a thread-safe, unbounded FIFO channel.
/// `send` never blocks; `receive` suspends the caller until an item arrives.
pub struct BlockingQueue<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Append an item to the tail, then wake one waiting receiver
    pub fn send(&self, item: T) {
        let mut items = self.items.lock().unwrap();
        items.push_back(item);
        // --post operation assertion
        assert!(!items.is_empty(), "Queue must have at least one item after send");
        drop(items);
        self.not_empty.notify_one();
    }

    /// Block until the queue is non-empty, then remove and return the head.
    /// The emptiness check loops around the condvar wait, so spurious wakeups
    /// and wakeups consumed by another receiver both re-check before popping.
    pub fn receive(&self) -> T {
        let mut items = self.items.lock().unwrap();
        while items.is_empty() {
            items = self.not_empty.wait(items).unwrap();
        }
        let len_before = items.len();
        let item = items.pop_front().unwrap();
        // -- post op assertion: queue size decreases by exactly one
        assert_eq!(items.len(), len_before - 1, "Queue length should decrease by 1");
        item
    }

    /// Get the current queue length
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe shared handle to the queue
pub type SafeQueue<T> = Arc<BlockingQueue<T>>;
