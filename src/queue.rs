//! A mutex-guarded multi-producer multi-consumer unbounded blocking queue.

use crate::lock::{lock, lock_pair};
use crate::node::Chain;
use crate::variant::sync::{Condvar, Mutex};

use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::ptr;
use std::sync::PoisonError;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// A mutex-guarded multi-producer multi-consumer unbounded blocking queue.
///
/// Every operation takes `&self`: share the queue between threads through an
/// [`Arc`] or a scoped borrow. Consumers choose between [`try_pop`] (never
/// waits), [`pop`] (waits for as long as it takes) and [`pop_timeout`] (waits
/// up to a bound).
///
/// Cloning a [`BlockingQueue`] copies its items into a new, independent queue.
///
/// [`Arc`]: std::sync::Arc
/// [`try_pop`]: BlockingQueue::try_pop
/// [`pop`]: BlockingQueue::pop
/// [`pop_timeout`]: BlockingQueue::pop_timeout
pub struct BlockingQueue<T> {
    chain: Mutex<Chain<T>>,

    /// Signaled each time an item is appended.
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Creates a new empty [`BlockingQueue`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::<usize>::new();
    /// assert!(queue.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::from_chain(Chain::new())
    }

    fn from_chain(chain: Chain<T>) -> Self {
        Self {
            chain: Mutex::new(chain),
            not_empty: Condvar::new(),
        }
    }

    /// Pushes an item at the back of the [`BlockingQueue`] and wakes up one
    /// consumer blocked in [`pop`] or [`pop_timeout`], if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::<usize>::new();
    ///
    /// queue.push(1);
    /// queue.push(2);
    /// queue.push(3);
    ///
    /// assert_eq!(queue.len(), 3);
    /// ```
    ///
    /// [`pop`]: BlockingQueue::pop
    /// [`pop_timeout`]: BlockingQueue::pop_timeout
    pub fn push(&self, item: T) {
        lock(&self.chain).push_back(item);
        self.not_empty.notify_one();
    }

    /// Pops the item at the front of the [`BlockingQueue`]. Returns none
    /// without waiting if the [`BlockingQueue`] is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::<usize>::new();
    /// for i in 0..8 {
    ///   queue.push(i);
    /// }
    ///
    /// for i in 0..8 {
    ///   assert_eq!(Some(i), queue.try_pop());
    /// }
    ///
    /// assert!(queue.try_pop().is_none());
    /// ```
    pub fn try_pop(&self) -> Option<T> {
        lock(&self.chain).pop_front()
    }

    /// Pops the item at the front of the [`BlockingQueue`], blocking the
    /// current thread until one is available.
    ///
    /// There is no way to interrupt this call from another thread: if no item
    /// is ever pushed, it never returns. Use [`pop_timeout`] for a bounded
    /// wait.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    /// use std::sync::Arc;
    /// use std::thread;
    ///
    /// let queue = Arc::new(BlockingQueue::new());
    ///
    /// let q = queue.clone();
    /// let th = thread::spawn(move || q.pop());
    ///
    /// queue.push("hello");
    /// assert_eq!(th.join().unwrap(), "hello");
    /// ```
    ///
    /// [`pop_timeout`]: BlockingQueue::pop_timeout
    pub fn pop(&self) -> T {
        let mut chain = lock(&self.chain);

        loop {
            // A wakeup does not imply an item is there: another consumer may
            // have taken it, or the wakeup may be spurious.
            if let Some(item) = chain.pop_front() {
                return item;
            }

            trace!("queue empty, waiting for an item");
            chain = self
                .not_empty
                .wait(chain)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Pops the item at the front of the [`BlockingQueue`], blocking the
    /// current thread for at most `timeout`.
    ///
    /// Returns none if no item became available in time; the queue is left
    /// untouched in that case. A `timeout` too large to be represented as a
    /// deadline waits without bound, like [`pop`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    /// use std::time::Duration;
    ///
    /// let queue = BlockingQueue::<usize>::new();
    /// assert!(queue.pop_timeout(Duration::from_millis(10)).is_none());
    ///
    /// queue.push(1);
    /// assert_eq!(queue.pop_timeout(Duration::from_millis(10)), Some(1));
    /// ```
    ///
    /// [`pop`]: BlockingQueue::pop
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.pop_deadline(deadline),
            None => Some(self.pop()),
        }
    }

    /// Pops the item at the front of the [`BlockingQueue`], blocking the
    /// current thread until `deadline` at the latest.
    ///
    /// Returns none if no item became available before `deadline`.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    /// use std::time::{Duration, Instant};
    ///
    /// let queue = BlockingQueue::<usize>::new();
    /// let deadline = Instant::now() + Duration::from_millis(10);
    /// assert!(queue.pop_deadline(deadline).is_none());
    /// assert!(Instant::now() >= deadline);
    ///
    /// queue.push(1);
    /// assert_eq!(queue.pop_deadline(deadline), Some(1));
    /// ```
    pub fn pop_deadline(&self, deadline: Instant) -> Option<T> {
        let mut chain = lock(&self.chain);

        loop {
            if let Some(item) = chain.pop_front() {
                return Some(item);
            }

            let now = Instant::now();
            if now >= deadline {
                trace!("timed out waiting for an item");
                return None;
            }

            trace!(remaining = ?(deadline - now), "queue empty, waiting for an item");
            let (guard, _) = self
                .not_empty
                .wait_timeout(chain, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            chain = guard;
        }
    }

    /// Returns the number of items in the [`BlockingQueue`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::new();
    /// assert_eq!(queue.len(), 0);
    ///
    /// queue.push('a');
    /// queue.push('b');
    /// assert_eq!(queue.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        lock(&self.chain).len()
    }

    /// Returns `true` if the [`BlockingQueue`] holds no item.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::new();
    /// assert!(queue.is_empty());
    ///
    /// queue.push(1);
    /// assert!(!queue.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        lock(&self.chain).is_empty()
    }

    /// Drops every item of the [`BlockingQueue`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue: BlockingQueue<_> = (0..4).collect();
    /// queue.clear();
    ///
    /// assert!(queue.is_empty());
    /// assert!(queue.try_pop().is_none());
    /// ```
    pub fn clear(&self) {
        let dropped = mem::take(&mut *lock(&self.chain));
        drop(dropped);
    }

    /// Moves every item of this [`BlockingQueue`] into a new one, leaving this
    /// one empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue: BlockingQueue<_> = (0..3).collect();
    /// let moved = queue.take();
    ///
    /// assert!(queue.is_empty());
    /// assert_eq!(moved.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    /// ```
    pub fn take(&self) -> Self {
        Self::from_chain(mem::take(&mut *lock(&self.chain)))
    }

    /// Replaces the items of this [`BlockingQueue`] with the items of
    /// `source`, leaving `source` empty.
    ///
    /// Both queues are locked for the duration of the transfer, so other
    /// threads observe either the state before or the state after it. Taking
    /// from itself is a no-op. Consumers blocked on this queue are woken up
    /// if it ends up non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue: BlockingQueue<_> = (0..2).collect();
    /// let source: BlockingQueue<_> = (10..13).collect();
    ///
    /// queue.take_from(&source);
    ///
    /// assert!(source.is_empty());
    /// assert_eq!(queue.into_iter().collect::<Vec<_>>(), vec![10, 11, 12]);
    /// ```
    pub fn take_from(&self, source: &Self) {
        if ptr::eq(self, source) {
            return;
        }

        let (dropped, len) = {
            let (mut chain, mut source) = lock_pair(&self.chain, &source.chain);
            let dropped = mem::replace(&mut *chain, mem::take(&mut *source));
            (dropped, chain.len())
        };

        debug!(items = len, "moved queue items");
        self.notify_filled(len);
        drop(dropped);
    }

    fn notify_filled(&self, len: usize) {
        if len > 0 {
            self.not_empty.notify_all();
        }
    }
}

impl<T: Clone> BlockingQueue<T> {
    /// Returns a copy of the item at the front of the [`BlockingQueue`]
    /// without removing it, or none if the [`BlockingQueue`] is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::new();
    /// assert!(queue.try_peek().is_none());
    ///
    /// queue.push(String::from("front"));
    /// assert_eq!(queue.try_peek().as_deref(), Some("front"));
    /// assert_eq!(queue.len(), 1);
    /// ```
    pub fn try_peek(&self) -> Option<T> {
        lock(&self.chain).front().cloned()
    }

    /// Replaces the items of this [`BlockingQueue`] with copies of the items
    /// of `source`, leaving `source` untouched.
    ///
    /// Both queues are locked for the duration of the copy. Assigning a queue
    /// to itself is a no-op. Consumers blocked on this queue are woken up if
    /// it ends up non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocking_queue::BlockingQueue;
    ///
    /// let queue: BlockingQueue<_> = (0..5).collect();
    /// let source: BlockingQueue<_> = (10..12).collect();
    ///
    /// queue.assign_from(&source);
    ///
    /// assert_eq!(source.len(), 2);
    /// assert_eq!(queue.into_iter().collect::<Vec<_>>(), vec![10, 11]);
    /// ```
    pub fn assign_from(&self, source: &Self) {
        if ptr::eq(self, source) {
            return;
        }

        let (dropped, len) = {
            let (mut chain, source) = lock_pair(&self.chain, &source.chain);
            let dropped = mem::take(&mut *chain);
            // Both locks are held: append through the chain directly, `push`
            // would try to lock this queue again.
            chain.extend(source.iter().cloned());
            (dropped, chain.len())
        };

        debug!(items = len, "copied queue items");
        self.notify_filled(len);
        drop(dropped);
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for BlockingQueue<T> {
    fn clone(&self) -> Self {
        let chain = lock(&self.chain).iter().cloned().collect();
        Self::from_chain(chain)
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_from(source)
    }
}

impl<T: fmt::Debug> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("items", &*lock(&self.chain))
            .finish()
    }
}

impl<T> FromIterator<T> for BlockingQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_chain(iter.into_iter().collect())
    }
}

impl<T> Extend<T> for BlockingQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        lock(&self.chain).extend(iter);
    }
}

impl<T> IntoIterator for BlockingQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            chain: self
                .chain
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// An owning iterator over the items of a [`BlockingQueue`], front to back.
///
/// Created by the [`IntoIterator`] implementation of [`BlockingQueue`].
#[derive(Debug)]
pub struct IntoIter<T> {
    chain: Chain<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.chain.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
