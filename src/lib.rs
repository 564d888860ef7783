#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_op_in_unsafe_fn,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    rust_2018_idioms
)]

//! A mutex-guarded multi-producer multi-consumer unbounded blocking queue.
//!
//! Items live in a singly-linked chain protected by a single lock. A condition
//! variable wakes up consumers blocked in [`BlockingQueue::pop`] or
//! [`BlockingQueue::pop_timeout`] whenever an item is pushed.
//!
//! # Examples
//!
//! Single Producer - Single Consumer:
//!
//! ```
//! use blocking_queue::BlockingQueue;
//!
//! const COUNT: usize = 1_000;
//! let queue: BlockingQueue<usize> = BlockingQueue::new();
//!
//! for i in 0..COUNT {
//!     queue.push(i);
//! }
//!
//! for i in 0..COUNT {
//!     assert_eq!(i, queue.try_pop().unwrap());
//! }
//!
//! assert!(queue.try_pop().is_none());
//! ```
//!
//! Multi Producer - Single Consumer:
//!
//! ```
//! use blocking_queue::BlockingQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! const COUNT: usize = 1_000;
//! const CONCURRENCY: usize = 4;
//!
//! let queue: Arc<BlockingQueue<usize>> = Arc::new(BlockingQueue::new());
//!
//! let ths: Vec<_> = (0..CONCURRENCY)
//!     .map(|_| {
//!         let q = queue.clone();
//!         thread::spawn(move || {
//!             for i in 0..COUNT {
//!                 q.push(i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! // Blocks until every producer has delivered.
//! for _ in 0..COUNT * CONCURRENCY {
//!     let _ = queue.pop();
//! }
//!
//! for th in ths {
//!     th.join().unwrap();
//! }
//!
//! assert!(queue.is_empty());
//! ```
//!
//! Single Producer - Multi Consumer:
//!
//! ```
//! use blocking_queue::BlockingQueue;
//! use std::thread;
//!
//! const COUNT: usize = 1_000;
//! const CONCURRENCY: usize = 4;
//!
//! let queue: BlockingQueue<usize> = BlockingQueue::new();
//!
//! thread::scope(|s| {
//!     for _ in 0..CONCURRENCY {
//!         s.spawn(|| {
//!             for _ in 0..COUNT {
//!                 let _ = queue.pop();
//!             }
//!         });
//!     }
//!
//!     for i in 0..COUNT * CONCURRENCY {
//!         queue.push(i);
//!     }
//! });
//!
//! assert!(queue.try_pop().is_none());
//! ```
//!
//! Multi Producer - Multi Consumer:
//!
//! ```
//! use blocking_queue::BlockingQueue;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::thread;
//!
//! const COUNT: usize = 1_000;
//! const CONCURRENCY: usize = 4;
//!
//! let queue: Arc<BlockingQueue<usize>> = Arc::new(BlockingQueue::new());
//! let items = Arc::new((0..COUNT).map(|_| AtomicUsize::new(0)).collect::<Vec<_>>());
//!
//! let ths: Vec<_> = (0..CONCURRENCY)
//!     .map(|_| {
//!         let q = queue.clone();
//!         let its = items.clone();
//!         thread::spawn(move || {
//!             for _ in 0..COUNT {
//!                 let n = q.pop();
//!                 its[n].fetch_add(1, Ordering::SeqCst);
//!             }
//!         })
//!     })
//!     .chain((0..CONCURRENCY).map(|_| {
//!         let q = queue.clone();
//!         thread::spawn(move || {
//!             for i in 0..COUNT {
//!                 q.push(i);
//!             }
//!         })
//!     }))
//!     .collect();
//!
//! for th in ths {
//!     th.join().unwrap();
//! }
//!
//! for c in &*items {
//!     assert_eq!(c.load(Ordering::SeqCst), CONCURRENCY);
//! }
//!
//! assert!(queue.try_pop().is_none());
//! ```
//!
//! # Copy and move
//!
//! [`Clone`] copies the items into an independent queue. Between two live,
//! shared queues, [`BlockingQueue::assign_from`] copies and
//! [`BlockingQueue::take_from`] moves, both locking the pair of queues in an
//! order that cannot deadlock against a transfer in the opposite direction.
//!
//! ```
//! use blocking_queue::BlockingQueue;
//!
//! let q1: BlockingQueue<_> = (0..3).collect();
//! let q2 = q1.clone();
//!
//! q1.push(3);
//! assert_eq!(q2.len(), 3);
//!
//! let q3 = BlockingQueue::new();
//! q3.take_from(&q1);
//! assert!(q1.is_empty());
//! assert_eq!(q3.len(), 4);
//! ```

mod queue;

pub(crate) mod lock;
pub(crate) mod node;
pub(crate) mod variant;

pub use queue::{BlockingQueue, IntoIter};
