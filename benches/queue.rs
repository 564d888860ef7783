//! Producer/consumer throughput of the blocking queue.
//!
//! cargo bench --bench queue

use blocking_queue::BlockingQueue;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::thread;

const COUNT: usize = 1_000;
const THREAD_COUNTS: &[usize] = &[1, 2, 4, 8];

fn bench_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_thread");
    let _ = group.throughput(Throughput::Elements(COUNT as u64));

    let _ = group.bench_function("push_try_pop", |b| {
        let queue = BlockingQueue::<usize>::new();
        b.iter(|| {
            for i in 0..COUNT {
                queue.push(black_box(i));
            }
            for _ in 0..COUNT {
                let _ = black_box(queue.try_pop());
            }
        })
    });

    group.finish();
}

fn bench_mpmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpmc");

    for &concurrency in THREAD_COUNTS {
        let _ = group.throughput(Throughput::Elements((COUNT * concurrency) as u64));

        // Consumers block in `pop` until producers deliver.
        let _ = group.bench_with_input(
            BenchmarkId::new("blocking_pop", concurrency),
            &concurrency,
            |b, &concurrency| {
                let queue = BlockingQueue::<usize>::new();
                b.iter(|| {
                    thread::scope(|s| {
                        for _ in 0..concurrency {
                            let _ = s.spawn(|| {
                                for _ in 0..COUNT {
                                    let _ = black_box(queue.pop());
                                }
                            });
                            let _ = s.spawn(|| {
                                for i in 0..COUNT {
                                    queue.push(i);
                                }
                            });
                        }
                    });
                })
            },
        );

        // Consumers spin on `try_pop`, as with a non-blocking queue.
        let _ = group.bench_with_input(
            BenchmarkId::new("spinning_try_pop", concurrency),
            &concurrency,
            |b, &concurrency| {
                let queue = BlockingQueue::<usize>::new();
                b.iter(|| {
                    thread::scope(|s| {
                        for _ in 0..concurrency {
                            let _ = s.spawn(|| {
                                for _ in 0..COUNT {
                                    while queue.try_pop().is_none() {
                                        thread::yield_now();
                                    }
                                }
                            });
                            let _ = s.spawn(|| {
                                for i in 0..COUNT {
                                    queue.push(i);
                                }
                            });
                        }
                    });
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_thread, bench_mpmc);
criterion_main!(benches);
