use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

use crate::core::{
    config::RuntimeConfig,
    runtime::{PoolKind, Runtime},
    thread_pool::Executor,
};

use super::wait_for;

const WAIT: Duration = Duration::from_secs(5);

fn small_config() -> RuntimeConfig {
    RuntimeConfig {
        non_blocking_pool_size: 1,
        non_blocking_queue_capacity: Some(0),
        blocking_pool_max_size: 1,
        blocking_queue_capacity: Some(0),
        ..Default::default()
    }
}

#[test]
fn pools_are_created_on_demand() {
    let runtime = Runtime::default();
    assert!(!runtime.is_running());
    assert!(runtime.stats(PoolKind::NonBlocking).is_none());
    assert!(runtime.stats(PoolKind::Blocking).is_none());

    let counter = Arc::new(AtomicUsize::new(0));
    {
        let counter = counter.clone();
        runtime.execute_non_blocking(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
    }
    assert!(wait_for(WAIT, || counter.load(Ordering::SeqCst) == 1));
    assert!(runtime.is_running());
    assert!(runtime.stats(PoolKind::NonBlocking).is_some());
    assert!(runtime.stats(PoolKind::Blocking).is_none());
    assert_eq!(
        runtime.non_blocking_pool().unwrap().name(),
        runtime.config().non_blocking_thread_name
    );
    runtime.log_status();
}

#[test]
fn restarts_after_shutdown() {
    let runtime = Runtime::new(RuntimeConfig::default());
    let first = runtime.blocking_pool().unwrap();
    runtime.shutdown();
    assert!(first.is_shutdown());
    assert!(!runtime.is_running());

    let counter = Arc::new(AtomicUsize::new(0));
    {
        let counter = counter.clone();
        runtime.execute_blocking(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
    }
    assert!(wait_for(WAIT, || counter.load(Ordering::SeqCst) == 1));
    let second = runtime.blocking_pool().unwrap();
    assert!(!second.is_shutdown());
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(first.await_termination(WAIT));
}

#[test]
fn rejected_work_spills_over() {
    let runtime = Runtime::new(small_config());
    let gate = Arc::new(AtomicBool::new(false));
    let started = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let gate = gate.clone();
        let started = started.clone();
        runtime.execute_non_blocking(Box::new(move || {
            started.fetch_add(1, Ordering::SeqCst);
            while !gate.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(1));
            }
        }));
    }
    // One task on each pool and one on a fallback thread, all running at once
    assert!(wait_for(WAIT, || started.load(Ordering::SeqCst) == 3));
    assert_eq!(runtime.fallback_thread_count(), 1);
    assert_eq!(runtime.stats(PoolKind::NonBlocking).map(|s| s.active_count), Some(1));
    assert_eq!(runtime.stats(PoolKind::Blocking).map(|s| s.active_count), Some(1));
    gate.store(true, Ordering::SeqCst);
}

#[test]
fn executors() {
    let runtime = Arc::new(Runtime::new(small_config()));
    let counter = Arc::new(AtomicUsize::new(0));
    let executors = [
        runtime.non_blocking_executor(),
        runtime.blocking_executor(),
        runtime.executor(PoolKind::Blocking),
    ];
    for executor in &executors {
        let counter = counter.clone();
        let result = executor.execute(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        // The runtime never hands work back
        assert!(result.is_ok());
    }
    assert!(wait_for(WAIT, || counter.load(Ordering::SeqCst) == 3));
}

#[test]
fn pool_options_follow_config() {
    let config = small_config();
    let runtime = Runtime::new(config.clone());
    assert_eq!(runtime.config(), &config);
    assert_eq!(
        runtime.blocking_pool().unwrap().options(),
        &config.blocking_pool_options()
    );
    assert_eq!(
        runtime.non_blocking_pool().unwrap().options(),
        &config.non_blocking_pool_options()
    );
}
