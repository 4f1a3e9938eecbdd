// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::core::{
    config::RuntimeConfig,
    thread_pool::{spawn_detached, Executor, Task, ThreadPool, ThreadPoolOptions, ThreadPoolStats},
};
use crate::sync::*;
use crate::trace_lock;
use crate::types::status_code::StatusCode;

pub use crate::core::thread_pool::PoolKind;

/// The `Runtime` owns the worker pools that the rest of a stack runs work on. It is passed to
/// whatever needs it rather than being a process wide global.
///
/// There are two pools, each a tokio runtime. The non blocking pool has as many workers as
/// CPUs for short, CPU bound work. The blocking pool runs work that may block on I/O on tokio's
/// blocking threads, of which there may be many more. A task the non blocking pool rejects
/// spills over to the blocking pool, and a task the blocking pool rejects runs on a fallback
/// thread of its own, so work handed to the runtime is never lost.
///
/// Pools are created on first use. `shutdown()` shuts them down and drops them, and a later
/// use creates them again.
pub struct Runtime {
    config: RuntimeConfig,
    non_blocking_pool: Mutex<Option<Arc<ThreadPool>>>,
    blocking_pool: Mutex<Option<Arc<ThreadPool>>>,
    fallback_thread_count: AtomicUsize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// An `Executor` that submits to one of a runtime's pools with the runtime's spill over rules.
/// It never rejects a task.
#[derive(Clone)]
pub struct RuntimeExecutor {
    runtime: Arc<Runtime>,
    kind: PoolKind,
}

impl Executor for RuntimeExecutor {
    fn execute(&self, task: Task) -> Result<(), Task> {
        match self.kind {
            PoolKind::NonBlocking => self.runtime.execute_non_blocking(task),
            PoolKind::Blocking => self.runtime.execute_blocking(task),
        }
        Ok(())
    }
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Runtime {
        Runtime {
            config,
            non_blocking_pool: Mutex::new(None),
            blocking_pool: Mutex::new(None),
            fallback_thread_count: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The pool for short, CPU bound work, created if necessary
    pub fn non_blocking_pool(&self) -> Result<Arc<ThreadPool>, StatusCode> {
        Self::pool(&self.non_blocking_pool, || self.config.non_blocking_pool_options())
    }

    /// The pool for work that may block, created if necessary
    pub fn blocking_pool(&self) -> Result<Arc<ThreadPool>, StatusCode> {
        Self::pool(&self.blocking_pool, || self.config.blocking_pool_options())
    }

    fn pool<F>(
        slot: &Mutex<Option<Arc<ThreadPool>>>,
        options: F,
    ) -> Result<Arc<ThreadPool>, StatusCode>
    where
        F: FnOnce() -> ThreadPoolOptions,
    {
        let mut pool = trace_lock!(slot);
        if let Some(ref pool) = *pool {
            return Ok(pool.clone());
        }
        let options = options();
        let name = options.name.clone();
        let created = Arc::new(ThreadPool::new(options).map_err(|err| {
            error!("Cannot create thread pool {}, error = {}", name, err);
            StatusCode::BadResourceUnavailable
        })?);
        *pool = Some(created.clone());
        Ok(created)
    }

    /// Runs the task on the non blocking pool, or the blocking pool if that rejects it.
    pub fn execute_non_blocking(&self, task: Task) {
        let result = match self.non_blocking_pool() {
            Ok(pool) => pool.execute(task),
            Err(_) => Err(task),
        };
        if let Err(task) = result {
            debug!("Non blocking pool rejected a task, spilling over to the blocking pool");
            self.execute_blocking(task);
        }
    }

    /// Runs the task on the blocking pool, or on a fallback thread if that rejects it. Fallback
    /// threads are not bounded so sustained overload can create many of them.
    pub fn execute_blocking(&self, task: Task) {
        let result = match self.blocking_pool() {
            Ok(pool) => pool.execute(task),
            Err(_) => Err(task),
        };
        if let Err(task) = result {
            let count = self.fallback_thread_count.fetch_add(1, Ordering::SeqCst) + 1;
            warn!(
                "Blocking pool rejected a task, running it on fallback thread {}",
                count
            );
            spawn_detached(format!("{}-Fallback-{}", self.config.blocking_thread_name, count), task);
        }
    }

    /// An executor handle onto one of the pools
    pub fn executor(self: &Arc<Self>, kind: PoolKind) -> RuntimeExecutor {
        RuntimeExecutor {
            runtime: self.clone(),
            kind,
        }
    }

    pub fn non_blocking_executor(self: &Arc<Self>) -> RuntimeExecutor {
        self.executor(PoolKind::NonBlocking)
    }

    pub fn blocking_executor(self: &Arc<Self>) -> RuntimeExecutor {
        self.executor(PoolKind::Blocking)
    }

    /// Number of tasks that had to run on a fallback thread
    pub fn fallback_thread_count(&self) -> usize {
        self.fallback_thread_count.load(Ordering::SeqCst)
    }

    /// Tests if either pool currently exists
    pub fn is_running(&self) -> bool {
        trace_lock!(self.non_blocking_pool).is_some() || trace_lock!(self.blocking_pool).is_some()
    }

    /// Counters of a pool, `None` if it does not exist at the moment
    pub fn stats(&self, kind: PoolKind) -> Option<ThreadPoolStats> {
        let pool = match kind {
            PoolKind::NonBlocking => trace_lock!(self.non_blocking_pool).clone(),
            PoolKind::Blocking => trace_lock!(self.blocking_pool).clone(),
        };
        pool.map(|p| p.stats())
    }

    /// Shuts down and drops both pools. Queued work still runs. Using the runtime afterwards
    /// creates new pools.
    pub fn shutdown(&self) {
        let non_blocking = trace_lock!(self.non_blocking_pool).take();
        let blocking = trace_lock!(self.blocking_pool).take();
        for pool in non_blocking.iter().chain(blocking.iter()) {
            info!("Runtime shutting down pool {}", pool.name());
            pool.shutdown();
        }
    }

    /// Logs the counters of each pool
    pub fn log_status(&self) {
        for (name, kind) in [
            ("NON_BLOCKING_EXECUTOR", PoolKind::NonBlocking),
            ("BLOCKING_EXECUTOR", PoolKind::Blocking),
        ] {
            match self.stats(kind) {
                Some(s) => debug!(
                    "{}: ActiveCount={} CompletedTaskCount={} QueuedTaskCount={} RejectedTaskCount={} TaskCount={}",
                    name,
                    s.active_count,
                    s.completed_task_count,
                    s.queued_task_count,
                    s.rejected_task_count,
                    s.task_count()
                ),
                None => debug!("{}: not running", name),
            }
        }
    }
}
