//! Work queue and worker pool.
//!
//! Workers pull items from a shared queue until it runs dry. Each worker
//! owns its random generator; the generators are one seed jumped ahead
//! once per worker, so their streams never overlap.

use crate::RenderError;
use log::debug;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Per-worker random generator.
pub type WorkerRng = rand_xoshiro::Xoshiro256PlusPlus;

/// One generator per worker, each `2^128` steps after the previous one.
pub fn worker_rngs(seed: u64, count: usize) -> Vec<WorkerRng> {
    let mut rng = WorkerRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let worker = rng.clone();
            rng.jump();
            worker
        })
        .collect()
}

/// A FIFO shared between threads.
///
/// `retrieve` never blocks waiting for items; an empty queue means the
/// work is done.
#[derive(Debug, Default)]
pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub fn enqueue(&self, item: T) {
        lock(&self.items).push_back(item);
    }

    /// Take the oldest item, or `None` if the queue is empty.
    pub fn retrieve(&self) -> Option<T> {
        lock(&self.items).pop_front()
    }

    /// Drop every pending item and return how many there were.
    pub fn clear(&self) -> usize {
        let mut items = lock(&self.items);
        let dropped = items.len();
        items.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.items).is_empty()
    }
}

impl<T> FromIterator<T> for WorkQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: Mutex::new(iter.into_iter().collect()),
        }
    }
}

/// Lock a mutex, recovering the data if another thread panicked while
/// holding it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `worker_count` workers over `queue` until it is empty.
///
/// `job` receives the worker index, the item and the worker's generator.
/// Returns once every worker has finished.
pub fn run_workers<T, F>(
    worker_count: usize,
    queue: &WorkQueue<T>,
    seed: u64,
    job: F,
) -> Result<(), RenderError>
where
    T: Send,
    F: Fn(usize, T, &mut WorkerRng) + Sync,
{
    let worker_count = worker_count.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .thread_name(|index| format!("ember-worker-{index}"))
        .build()?;
    let rngs = worker_rngs(seed, worker_count);
    let job = &job;

    pool.scope(|scope| {
        for (worker, mut rng) in rngs.into_iter().enumerate() {
            scope.spawn(move |_| {
                let mut processed = 0usize;
                while let Some(item) = queue.retrieve() {
                    job(worker, item, &mut rng);
                    processed += 1;
                }
                debug!("Worker {} finished after {} items", worker, processed);
            });
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::collections::HashSet;

    #[test]
    fn test_queue_is_fifo() {
        let queue = WorkQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.enqueue(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.retrieve(), Some(1));
        assert_eq!(queue.retrieve(), Some(2));
        assert_eq!(queue.retrieve(), Some(3));
        assert_eq!(queue.retrieve(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_clear() {
        let queue: WorkQueue<u32> = (0..10).collect();
        assert_eq!(queue.clear(), 10);
        assert_eq!(queue.retrieve(), None);
    }

    #[test]
    fn test_worker_rngs_are_distinct() {
        let mut rngs = worker_rngs(7, 8);
        let firsts: HashSet<u64> = rngs.iter_mut().map(|rng| rng.next_u64()).collect();
        assert_eq!(firsts.len(), 8);

        // Same seed, same streams
        let mut a = worker_rngs(7, 8);
        let mut b = worker_rngs(7, 8);
        assert_eq!(a[3].next_u64(), b[3].next_u64());
    }

    #[test]
    fn test_every_item_processed_once() {
        for workers in [1, 4, 16] {
            let queue: WorkQueue<usize> = (0..500).collect();
            let counts: Vec<Mutex<u32>> = (0..500).map(|_| Mutex::new(0)).collect();

            run_workers(workers, &queue, 1, |_, item, _| {
                *lock(&counts[item]) += 1;
            })
            .unwrap();

            assert!(queue.is_empty());
            assert!(counts.iter().all(|c| *lock(c) == 1), "workers = {workers}");
        }
    }

    #[test]
    fn test_cleared_queue_stops_workers() {
        let queue: WorkQueue<u32> = (0..1000).collect();
        let processed = Mutex::new(0u32);

        run_workers(4, &queue, 0, |_, _, _| {
            let mut n = lock(&processed);
            *n += 1;
            if *n == 10 {
                queue.clear();
            }
        })
        .unwrap();

        let n = *lock(&processed);
        assert!((10..1000).contains(&n));
    }
}
