//! Singly-linked chain of [`Node`] holding the items of a [`BlockingQueue`].
//!
//! The [`Chain`] owns every node. Nodes are allocated with [`Box`], leaked into
//! raw pointers when linked and reclaimed with [`Box::from_raw`] when popped,
//! so no link is ever a `Box` that could move and invalidate another pointer
//! to the same node. `rear` is a non-owning back-reference to the last node:
//! it is only ever used to append in O(1), never to walk the chain or to
//! release memory.
//!
//! ```txt
//! front ──► [a] ──► [b] ──► [c] ──► None
//!                            ▲
//! rear ──────────────────────┘
//! ```
//!
//! A [`Chain`] is not synchronized. It is only reachable through the guard of
//! the queue's lock, so holding a `&mut Chain` means the lock is already held.
//!
//! [`BlockingQueue`]: crate::queue::BlockingQueue

use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Holds an item of the [`Chain`] and links to the next [`Node`], if any.
pub(crate) struct Node<T> {
    value: T,
    next: Option<NonNull<Node<T>>>,
}

/// Unsynchronized FIFO chain of [`Node`].
///
/// `front` is `None` iff `rear` is `None` iff `len == 0`, and following the
/// links from `front` visits exactly `len` nodes, the last one being `rear`.
pub(crate) struct Chain<T> {
    front: Option<NonNull<Node<T>>>,
    rear: Option<NonNull<Node<T>>>,
    len: usize,
    marker: PhantomData<Box<Node<T>>>,
}

// The chain exclusively owns every node reachable from `front`.
unsafe impl<T: Send> Send for Chain<T> {}

impl<T> Chain<T> {
    /// Creates an empty [`Chain`].
    pub(crate) const fn new() -> Self {
        Self {
            front: None,
            rear: None,
            len: 0,
            marker: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    /// Appends `value` at the rear of the chain.
    ///
    /// This is the insertion primitive used once the queue's lock is held:
    /// `BlockingQueue::push` takes the lock and calls it, the cross-queue
    /// copy calls it while holding both locks. It must never take a lock
    /// itself.
    pub(crate) fn push_back(&mut self, value: T) {
        let node = NonNull::from(Box::leak(Box::new(Node { value, next: None })));

        match self.rear {
            // SAFETY: `rear` points to the last node of this chain, allocated
            // by `push_back` and not yet reclaimed by `pop_front`.
            Some(rear) => unsafe { (*rear.as_ptr()).next = Some(node) },
            None => self.front = Some(node),
        }

        self.rear = Some(node);
        self.len += 1;
    }

    /// Removes the front node and hands its value over to the caller.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let front = self.front?;

        // SAFETY: `front` was leaked by `push_back` and is unlinked right
        // below, so ownership goes back to this box exactly once.
        let node = unsafe { Box::from_raw(front.as_ptr()) };

        self.front = node.next;
        if self.front.is_none() {
            self.rear = None;
        }
        self.len -= 1;

        Some(node.value)
    }

    /// Returns a reference to the front value, if any.
    pub(crate) fn front(&self) -> Option<&T> {
        // SAFETY: nodes reachable from `front` live as long as `&self`.
        self.front.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Walks the chain from front to rear.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.front,
            remaining: self.len,
            marker: PhantomData,
        }
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        // Nodes are reclaimed one at a time, without recursion.
        while self.pop_front().is_some() {}
    }
}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for Chain<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for Chain<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut chain = Self::new();
        chain.extend(iter);
        chain
    }
}

/// Borrowing iterator over a [`Chain`], front to rear.
pub(crate) struct Iter<'a, T> {
    next: Option<NonNull<Node<T>>>,
    remaining: usize,
    marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.next.map(|node| {
            // SAFETY: the chain is borrowed for `'a`, so no node is popped
            // or dropped while the iterator is alive.
            let node = unsafe { &*node.as_ptr() };
            self.next = node.next;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
