use crossbeam::channel::{Receiver, Sender, bounded, unbounded};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// What a processor returns for one work item
#[derive(Debug)]
pub enum Step<R> {
    /// Record the result and keep going
    Continue(R),
    /// Record the result and start no further items
    Halt(R),
}

impl<R> Step<R> {
    fn into_parts(self) -> (R, bool) {
        match self {
            Step::Continue(result) => (result, false),
            Step::Halt(result) => (result, true),
        }
    }
}

/// Worker pool over a borrowed slice using a producer-consumer pattern.
///
/// Results come back in input order regardless of which worker finished
/// first. Once any item halts, no further item is handed to a worker; items
/// already being processed run to completion.
pub struct ParallelExecutor {
    max_workers: usize,
    buffer_size: usize,
}

/// Per-worker view of the shared state
struct WorkerContext<'s, 'a, T, R, F, P> {
    worker_id: usize,
    work_rx: Receiver<(usize, &'a T)>,
    result_tx: Sender<(usize, R)>,
    halted: &'s AtomicBool,
    completed: &'s AtomicUsize,
    total_items: usize,
    processor: &'s F,
    progress_reporter: &'s Option<P>,
}

impl ParallelExecutor {
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            buffer_size: max_workers * 2,
        }
    }

    pub fn execute<'a, T, R, F, P>(
        &self,
        work_items: &'a [T],
        processor: F,
        progress_reporter: Option<P>,
    ) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&'a T, usize) -> Step<R> + Sync, // (item, worker_id)
        P: Fn(usize, usize, usize) + Sync,     // (current, total, worker_id)
    {
        if work_items.is_empty() {
            return Vec::new();
        }

        let actual_workers = std::cmp::min(self.max_workers, work_items.len());
        let (work_tx, work_rx) = bounded::<(usize, &'a T)>(self.buffer_size);
        // Unbounded so a worker never blocks on send while the producer is still feeding
        let (result_tx, result_rx) = unbounded::<(usize, R)>();

        let halted = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);
        let total_items = work_items.len();

        let mut indexed = crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    result_tx: result_tx.clone(),
                    halted: &halted,
                    completed: &completed,
                    total_items,
                    processor: &processor,
                    progress_reporter: &progress_reporter,
                };
                s.spawn(move |_| Self::worker_thread(ctx));
            }

            // Drop the originals so the channels close when workers finish
            drop(work_rx);
            drop(result_tx);

            // Producer runs on the calling thread
            for (index, item) in work_items.iter().enumerate() {
                if halted.load(Ordering::SeqCst) || work_tx.send((index, item)).is_err() {
                    break;
                }
            }
            drop(work_tx);

            result_rx.iter().collect::<Vec<_>>()
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    fn worker_thread<'a, T, R, F, P>(ctx: WorkerContext<'_, 'a, T, R, F, P>)
    where
        F: Fn(&'a T, usize) -> Step<R>,
        P: Fn(usize, usize, usize),
    {
        while let Ok((index, item)) = ctx.work_rx.recv() {
            // Drain without processing once halted
            if ctx.halted.load(Ordering::SeqCst) {
                continue;
            }

            let (result, halt) = (ctx.processor)(item, ctx.worker_id).into_parts();
            if halt {
                ctx.halted.store(true, Ordering::SeqCst);
            }

            if ctx.result_tx.send((index, result)).is_err() {
                break;
            }

            let current = ctx.completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(reporter) = ctx.progress_reporter {
                reporter(current, ctx.total_items, ctx.worker_id);
            }
        }
    }
}

/// Single-threaded execution in input order
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<'a, T, R, F, P>(
        work_items: &'a [T],
        processor: F,
        progress_reporter: Option<P>,
    ) -> Vec<R>
    where
        F: Fn(&'a T, usize) -> Step<R>,
        P: Fn(usize, usize, usize),
    {
        let total_items = work_items.len();
        let mut results = Vec::with_capacity(total_items);

        for work_item in work_items {
            let (result, halt) = processor(work_item, 0).into_parts();
            results.push(result);

            if let Some(reporter) = &progress_reporter {
                reporter(results.len(), total_items, 0);
            }
            if halt {
                break;
            }
        }

        results
    }
}

/// Execution strategy enum for choosing between parallel and sequential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    pub fn execute<'a, T, R, F, P>(
        &self,
        work_items: &'a [T],
        processor: F,
        progress_reporter: Option<P>,
    ) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&'a T, usize) -> Step<R> + Sync,
        P: Fn(usize, usize, usize) + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => {
                SequentialExecutor::execute(work_items, processor, progress_reporter)
            }
            ExecutionStrategy::Parallel { workers } => {
                ParallelExecutor::new(*workers).execute(work_items, processor, progress_reporter)
            }
        }
    }

    /// Parallel with `optimal_workers` once the workload reaches
    /// `min_items_for_parallel`, sequential below it.
    ///
    /// ```rust
    /// use git_hooks::parallel::ExecutionStrategy;
    ///
    /// assert!(matches!(ExecutionStrategy::auto(3, 8, 4), ExecutionStrategy::Sequential));
    /// assert!(matches!(ExecutionStrategy::auto(20, 8, 4), ExecutionStrategy::Parallel { workers: 4 }));
    /// ```
    pub fn auto(work_items_count: usize, min_items_for_parallel: usize, optimal_workers: usize) -> Self {
        if work_items_count >= min_items_for_parallel && optimal_workers > 1 {
            ExecutionStrategy::Parallel {
                workers: optimal_workers,
            }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Workers allowed by the machine and configuration.
    ///
    /// `thread_percentage` of the available cores, capped at
    /// `max_threads_config` when that is non-zero, and never below 1.
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();
        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }
}
