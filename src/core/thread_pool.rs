// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Executors and worker pools.
//!
//! A `ThreadPool` runs its work on a tokio runtime. A non blocking pool runs each task on one
//! of a fixed number of runtime workers, a blocking pool hands each task to the runtime's
//! blocking threads which grow on demand up to a maximum and exit once idle for the keep alive
//! time. A pool with a queue capacity accepts at most its thread count plus that many tasks at
//! once. A task the pool cannot take is handed back to the caller who decides where it goes
//! next.

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use crate::sync::*;
use crate::trace_lock;

/// A unit of work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs tasks.
pub trait Executor: Send + Sync {
    /// Runs or schedules the task. A task that cannot be accepted is handed back.
    fn execute(&self, task: Task) -> Result<(), Task>;
}

/// Runs every task straight away on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentThreadExecutor;

impl Executor for CurrentThreadExecutor {
    fn execute(&self, task: Task) -> Result<(), Task> {
        run_task(task);
        Ok(())
    }
}

/// Runs a task, logging rather than propagating a panic so the thread survives it.
pub(crate) fn run_task(task: Task) {
    if let Err(err) = panic::catch_unwind(AssertUnwindSafe(task)) {
        let message = err
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| err.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(
            "Task panicked on thread {:?}, reason = {}",
            thread::current().name(),
            message
        );
    }
}

/// Runs the task on a new thread of its own. If no thread can be spawned the task runs on the
/// calling thread instead so it is never lost.
pub(crate) fn spawn_detached(name: String, task: Task) {
    let slot = Arc::new(Mutex::new(Some(task)));
    let thread_slot = slot.clone();
    let result = thread::Builder::new().name(name.clone()).spawn(move || {
        let task = trace_lock!(thread_slot).take();
        if let Some(task) = task {
            run_task(task);
        }
    });
    if let Err(err) = result {
        error!(
            "Cannot spawn thread {}, running the task on the calling thread, error = {}",
            name, err
        );
        let task = trace_lock!(slot).take();
        if let Some(task) = task {
            run_task(task);
        }
    }
}

/// The kind of work a pool is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    /// Short, CPU bound work run on the runtime's workers
    NonBlocking,
    /// Work that may block, run on the runtime's blocking threads
    Blocking,
}

/// Sizing of a `ThreadPool`
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadPoolOptions {
    /// Prefix of thread names, a sequence number is appended
    pub name: String,
    pub kind: PoolKind,
    /// Number of workers of a non blocking pool, or the most blocking threads of a blocking pool
    pub threads: usize,
    /// How long an idle blocking thread waits for work before it exits
    pub keep_alive: Duration,
    /// Maximum number of tasks waiting for a thread, `None` for no limit
    pub queue_capacity: Option<usize>,
}

impl ThreadPoolOptions {
    /// Most tasks the pool holds at once, running or waiting. `None` for no limit.
    pub fn capacity(&self) -> Option<usize> {
        self.queue_capacity
            .map(|capacity| capacity.saturating_add(self.threads))
    }
}

/// Counters describing a pool at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThreadPoolStats {
    /// Tasks currently running
    pub active_count: usize,
    /// Tasks accepted and waiting for a thread
    pub queued_task_count: usize,
    /// Tasks that have finished, whether or not they panicked
    pub completed_task_count: u64,
    /// Tasks handed back because the pool was full or shut down
    pub rejected_task_count: u64,
}

impl ThreadPoolStats {
    /// Every task ever accepted and not discarded, i.e. completed, running and queued
    pub fn task_count(&self) -> u64 {
        self.completed_task_count + self.active_count as u64 + self.queued_task_count as u64
    }
}

#[derive(Default)]
struct PoolState {
    stats: ThreadPoolStats,
    shutdown: bool,
    /// Set by `shutdown_now`, queued tasks that start afterwards do nothing
    discard_queued: bool,
}

impl PoolState {
    fn is_idle(&self) -> bool {
        self.stats.active_count == 0 && self.stats.queued_task_count == 0
    }
}

struct Shared {
    state: Mutex<PoolState>,
    idle: Condvar,
}

impl Shared {
    /// Moves a task from queued to active. Returns false if the task was discarded.
    fn start(&self) -> bool {
        let mut state = trace_lock!(self.state);
        if state.discard_queued {
            return false;
        }
        state.stats.queued_task_count = state.stats.queued_task_count.saturating_sub(1);
        state.stats.active_count += 1;
        true
    }

    fn finish(&self) {
        let mut state = trace_lock!(self.state);
        state.stats.active_count -= 1;
        state.stats.completed_task_count += 1;
        if state.is_idle() {
            self.idle.notify_all();
        }
    }

    /// Waits until the pool is shut down with nothing queued or running, or the deadline passes.
    fn wait_terminated(&self, deadline: Option<Instant>) -> bool {
        let mut state = trace_lock!(self.state);
        while !(state.shutdown && state.is_idle()) {
            match deadline {
                Some(deadline) => {
                    if self.idle.wait_until(&mut state, deadline).timed_out() {
                        return state.shutdown && state.is_idle();
                    }
                }
                None => self.idle.wait(&mut state),
            }
        }
        true
    }
}

/// A pool of threads backed by a tokio runtime.
pub struct ThreadPool {
    options: ThreadPoolOptions,
    shared: Arc<Shared>,
    runtime: Mutex<Option<tokio::runtime::Runtime>>,
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("options", &self.options)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Executor for ThreadPool {
    fn execute(&self, task: Task) -> Result<(), Task> {
        ThreadPool::execute(self, task)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
        let runtime = match self.runtime.get_mut().take() {
            Some(runtime) => runtime,
            None => return,
        };
        if self.is_terminated() {
            runtime.shutdown_background();
        } else {
            // Queued work still runs, the runtime goes once it has
            let shared = self.shared.clone();
            spawn_detached(
                format!("{}-Shutdown", self.options.name),
                Box::new(move || {
                    shared.wait_terminated(None);
                    runtime.shutdown_background();
                }),
            );
        }
    }
}

impl ThreadPool {
    /// Creates a pool and the runtime behind it. Threads are started as work arrives.
    pub fn new(options: ThreadPoolOptions) -> std::io::Result<ThreadPool> {
        debug!(
            "Creating {:?} thread pool {}, threads = {}, queue capacity = {:?}",
            options.kind, options.name, options.threads, options.queue_capacity
        );
        let name = options.name.clone();
        let next_thread_id = AtomicUsize::new(1);
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder
            .thread_name_fn(move || {
                format!("{}-{}", name, next_thread_id.fetch_add(1, Ordering::SeqCst))
            })
            .thread_keep_alive(options.keep_alive);
        match options.kind {
            PoolKind::NonBlocking => {
                builder.worker_threads(options.threads.max(1));
            }
            PoolKind::Blocking => {
                // Tasks never run on the workers
                builder
                    .worker_threads(1)
                    .max_blocking_threads(options.threads.max(1));
            }
        }
        let runtime = builder.enable_all().build()?;
        Ok(ThreadPool {
            options,
            shared: Arc::new(Shared {
                state: Mutex::new(PoolState::default()),
                idle: Condvar::new(),
            }),
            runtime: Mutex::new(Some(runtime)),
        })
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &ThreadPoolOptions {
        &self.options
    }

    /// Schedules the task. The task is handed back if the pool is shut down or already holds
    /// as many tasks as its capacity allows.
    pub fn execute(&self, task: Task) -> Result<(), Task> {
        let runtime = trace_lock!(self.runtime);
        let mut state = trace_lock!(self.shared.state);
        let runtime = match runtime.as_ref() {
            Some(runtime) if !state.shutdown => runtime,
            _ => {
                debug!("Thread pool {} is shut down, rejecting task", self.options.name);
                state.stats.rejected_task_count += 1;
                return Err(task);
            }
        };
        let held = state.stats.active_count + state.stats.queued_task_count;
        if matches!(self.options.capacity(), Some(capacity) if held >= capacity) {
            debug!(
                "Thread pool {} is saturated with {} tasks, rejecting task",
                self.options.name, held
            );
            state.stats.rejected_task_count += 1;
            return Err(task);
        }
        state.stats.queued_task_count += 1;
        drop(state);

        let shared = self.shared.clone();
        let job = move || {
            if shared.start() {
                run_task(task);
                shared.finish();
            }
        };
        match self.options.kind {
            PoolKind::NonBlocking => {
                runtime.spawn(async move { job() });
            }
            PoolKind::Blocking => {
                runtime.spawn_blocking(job);
            }
        }
        Ok(())
    }

    /// Stops accepting tasks. Queued tasks still run.
    pub fn shutdown(&self) {
        let mut state = trace_lock!(self.shared.state);
        if !state.shutdown {
            debug!("Shutting down thread pool {}", self.options.name);
            state.shutdown = true;
        }
        if state.is_idle() {
            self.shared.idle.notify_all();
        }
    }

    /// Stops accepting tasks and discards the queued ones. Running tasks complete. Returns the
    /// number of tasks discarded.
    pub fn shutdown_now(&self) -> usize {
        let mut state = trace_lock!(self.shared.state);
        state.shutdown = true;
        state.discard_queued = true;
        let dropped = state.stats.queued_task_count;
        state.stats.queued_task_count = 0;
        if dropped > 0 {
            warn!(
                "Thread pool {} discarded {} queued tasks on shutdown",
                self.options.name, dropped
            );
        }
        if state.is_idle() {
            self.shared.idle.notify_all();
        }
        dropped
    }

    pub fn is_shutdown(&self) -> bool {
        trace_lock!(self.shared.state).shutdown
    }

    /// Tests if the pool is shut down with nothing running or queued
    pub fn is_terminated(&self) -> bool {
        let state = trace_lock!(self.shared.state);
        state.shutdown && state.is_idle()
    }

    /// Waits up to the timeout for the pool to terminate after a shutdown, releasing the
    /// runtime's threads if it does. Returns true if it terminated.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        if !self.shared.wait_terminated(Some(Instant::now() + timeout)) {
            return false;
        }
        if let Some(runtime) = trace_lock!(self.runtime).take() {
            runtime.shutdown_background();
        }
        true
    }

    pub fn stats(&self) -> ThreadPoolStats {
        trace_lock!(self.shared.state).stats
    }

    pub fn active_count(&self) -> usize {
        self.stats().active_count
    }

    pub fn completed_task_count(&self) -> u64 {
        self.stats().completed_task_count
    }

    pub fn queued_task_count(&self) -> usize {
        self.stats().queued_task_count
    }

    pub fn rejected_task_count(&self) -> u64 {
        self.stats().rejected_task_count
    }
}
