//! Unbounded, closeable FIFO with blocking pull.
//!
//! Producers never block on [`WorkQueue::push`]. The consumer blocks in
//! [`WorkQueue::pull`] while the queue is empty, and wakes up either when an
//! item arrives or when the queue is closed. Closing is how a stop request
//! reaches a consumer that is parked on an empty queue.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

pub struct WorkQueue<T> {
    inner: Mutex<Inner<T>>,
    available: Condvar,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner { items: VecDeque::new(), closed: false }),
            available: Condvar::new(),
        }
    }

    /// Appends `item` to the tail and wakes a waiting consumer.
    ///
    /// Items pushed after [`close`](Self::close) are dropped.
    pub fn push(&self, item: T) {
        let mut inner = self.inner.lock();
        if inner.closed {
            log::debug!("WorkQueue: push on closed queue, item dropped");
            return;
        }
        inner.items.push_back(item);
        drop(inner);

        self.available.notify_one();
    }

    /// Removes and returns the head of the queue, blocking while the queue is
    /// empty. Returns `None` once the queue is closed, even if items were
    /// still pending at that time.
    pub fn pull(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        loop {
            if inner.closed {
                return None;
            }
            if let Some(item) = inner.items.pop_front() {
                return Some(item);
            }
            self.available.wait(&mut inner);
        }
    }

    /// Non-blocking variant of [`pull`](Self::pull).
    pub fn try_pull(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return None;
        }
        inner.items.pop_front()
    }

    /// Closes the queue and wakes every waiter. Pending items are dropped;
    /// the number dropped is returned. Closing twice returns 0 the second time.
    pub fn close(&self) -> usize {
        let pending = {
            let mut inner = self.inner.lock();
            inner.closed = true;
            std::mem::take(&mut inner.items)
        };

        self.available.notify_all();
        pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Snapshot only. Never use this for flow control.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
