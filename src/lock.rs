//! Lock acquisition shared by every [`BlockingQueue`] operation.
//!
//! Poisoning is ignored: the [`Chain`] guarded by the lock is consistent after
//! every single insertion or removal, so a panic raised while the lock is held
//! (e.g. by a user `Clone` implementation) cannot leave it half-updated.
//!
//! [`BlockingQueue`]: crate::queue::BlockingQueue
//! [`Chain`]: crate::node::Chain

use crate::variant::sync::{Mutex, MutexGuard};

use std::sync::PoisonError;

/// Acquires `mutex`, recovering the guard if the lock is poisoned.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Acquires two distinct mutexes without risking a deadlock against another
/// thread acquiring the same pair in the opposite order.
///
/// Locks are always taken in increasing address order, whatever the order of
/// the arguments. The guards are returned in argument order.
///
/// This is the only place where two queue locks are ever held together;
/// cross-queue operations must go through it.
///
/// # Panics
///
/// Panics if `first` and `second` are the same mutex. Callers detect
/// self-assignment beforehand.
pub(crate) fn lock_pair<'a, T>(
    first: &'a Mutex<T>,
    second: &'a Mutex<T>,
) -> (MutexGuard<'a, T>, MutexGuard<'a, T>) {
    let first_addr: *const Mutex<T> = first;
    let second_addr: *const Mutex<T> = second;

    assert!(
        first_addr != second_addr,
        "lock_pair called twice on the same mutex"
    );

    if first_addr < second_addr {
        let first = lock(first);
        let second = lock(second);
        (first, second)
    } else {
        let second = lock(second);
        let first = lock(first);
        (first, second)
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn guards_follow_argument_order() {
        let a = Mutex::new(1);
        let b = Mutex::new(2);

        let (ga, gb) = lock_pair(&a, &b);
        assert_eq!((*ga, *gb), (1, 2));
        drop((ga, gb));

        let (gb, ga) = lock_pair(&b, &a);
        assert_eq!((*gb, *ga), (2, 1));
    }

    #[test]
    #[should_panic(expected = "same mutex")]
    fn rejects_same_mutex() {
        let a = Mutex::new(0);
        let _guards = lock_pair(&a, &a);
    }

    #[test]
    fn opposite_orders_do_not_deadlock() {
        const ROUNDS: usize = 10_000;
        let pair = Arc::new((Mutex::new(0usize), Mutex::new(0usize)));
        let barrier = Arc::new(Barrier::new(2));

        let ths: Vec<_> = (0..2)
            .map(|n| {
                let pair = pair.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let _ = barrier.wait();
                    for _ in 0..ROUNDS {
                        let (mut x, mut y) = if n == 0 {
                            lock_pair(&pair.0, &pair.1)
                        } else {
                            let (y, x) = lock_pair(&pair.1, &pair.0);
                            (x, y)
                        };
                        *x += 1;
                        *y += 1;
                    }
                })
            })
            .collect();

        for th in ths {
            th.join().unwrap();
        }

        assert_eq!(*lock(&pair.0), 2 * ROUNDS);
        assert_eq!(*lock(&pair.1), 2 * ROUNDS);
    }

    #[test]
    fn recovers_poisoned_lock() {
        let mutex = Arc::new(Mutex::new(7));

        let m = mutex.clone();
        let res = thread::spawn(move || {
            let _guard = m.lock().unwrap();
            panic!("poison");
        })
        .join();

        assert!(res.is_err());
        assert!(mutex.is_poisoned());
        assert_eq!(*lock(&mutex), 7);
    }
}
