// src/checker/pool.rs
// =============================================================================
// A fixed-size worker pool that folds the results of I/O-bound jobs into one
// value, and gives up cleanly when a deadline fires.
//
// Shape of the pool:
//
//   distributor ──jobs──> [worker 1 .. worker N] ──results──> aggregator
//
// - One distributor task feeds the jobs into a bounded channel
// - N workers share the receiving end (behind an async Mutex) and run `work`
// - The aggregator (the caller's task) is the ONLY place the result value
//   changes, so no locks around counters are needed
//
// When the deadline fires, the distributor stops feeding, the aggregator
// returns what it has so far, and dropping the JoinSet aborts every task that
// is still running (in-flight requests are dropped, not awaited).
//
// Rust concepts:
// - Generics with trait bounds: the pool doesn't know what a job is
// - tokio::select!: wait on "next result" and "deadline" at the same time
// - JoinSet: owns spawned tasks and aborts them when dropped
// =============================================================================

use crate::budget::Budget; // the shared deadline
use std::future::Future; // the trait every async block implements
use std::sync::Arc; // shared ownership across tasks
use tokio::sync::{mpsc, Mutex}; // async channels, and a lock that can be held across .await
use tokio::task::JoinSet; // a group of spawned tasks that is aborted as a whole
use tracing::debug;

/// What a [`bounded_fold`] run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folded<A> {
    /// The folded value over every result that arrived in time
    pub value: A,
    /// How many jobs produced a result
    pub completed: usize,
    /// True when the deadline fired before every job finished
    pub exhausted: bool,
}

/// Runs `work` over `jobs` on at most `pool_size` concurrent tasks and folds
/// the results with `fold`, stopping at the budget's deadline.
///
/// Results arrive in completion order, so `fold` should be commutative if the
/// final value is meant to be order-independent. With no jobs nothing is
/// spawned and `init` comes straight back.
pub async fn bounded_fold<T, R, A, W, Fut, F>(
    jobs: Vec<T>,
    pool_size: usize,
    budget: Budget,
    work: W,
    init: A,
    mut fold: F,
) -> Folded<A>
where
    T: Send + 'static,
    R: Send + 'static,
    W: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    F: FnMut(A, R) -> A,
{
    let total = jobs.len();
    let mut value = init;

    // Nothing to do: don't spawn anything at all
    if total == 0 {
        return Folded {
            value,
            completed: 0,
            exhausted: false,
        };
    }

    // Never more workers than jobs, and always at least one
    let workers = pool_size.clamp(1, total);

    // Bounded channels: the distributor waits when the workers fall behind
    let (job_tx, job_rx) = mpsc::channel::<T>(workers);
    let (result_tx, mut result_rx) = mpsc::channel::<R>(workers);
    // Every worker pulls from the same receiver, one at a time
    let job_rx = Arc::new(Mutex::new(job_rx));
    // The work closure is shared too; each worker calls it per job
    let work = Arc::new(work);
    let mut tasks = JoinSet::new();

    debug!(jobs = total, workers, "starting worker pool");

    // Distributor: dropping job_tx at the end lets idle workers exit
    tasks.spawn(async move {
        for job in jobs {
            tokio::select! {
                biased;
                _ = budget.expired() => break,
                sent = job_tx.send(job) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Workers: take a job, run it, send the result, repeat
    for _ in 0..workers {
        // Each task needs its own handles (clones of the Arcs and the sender)
        let job_rx = job_rx.clone();
        let result_tx = result_tx.clone();
        let work = work.clone();
        tasks.spawn(async move {
            loop {
                // The lock is only held while waiting for the next job
                let next = job_rx.lock().await.recv().await;
                let Some(job) = next else {
                    break;
                };
                // `biased` makes select! check the deadline first every time
                let result = tokio::select! {
                    biased;
                    _ = budget.expired() => break,
                    result = (*work)(job) => result,
                };
                if result_tx.send(result).await.is_err() {
                    break;
                }
            }
        });
    }
    // Only the workers hold senders now, so recv() ends once they all stop
    drop(result_tx);

    // Aggregator: this loop is the only code that touches `value`
    let mut completed = 0;
    let mut exhausted = false;
    // The deadline future is polled many times, so it has to be pinned
    let deadline = budget.expired();
    tokio::pin!(deadline);

    while completed < total {
        tokio::select! {
            biased;
            _ = &mut deadline => {
                exhausted = true;
                break;
            }
            received = result_rx.recv() => match received {
                Some(result) => {
                    value = fold(value, result);
                    completed += 1;
                }
                None => break,
            },
        }
    }

    // Aborts whatever is still running without waiting for it
    drop(tasks);

    debug!(completed, total, exhausted, "worker pool finished");
    Folded {
        value,
        completed,
        exhausted,
    }
}
