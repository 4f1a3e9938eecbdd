// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The core module holds the concurrency building blocks that a client or server stack is made
//! of. A one to one map, a queue that hands items out in order once they have hatched, a copy on
//! write listener list, an observable state machine and the worker pools that run work.

#[cfg(test)]
mod tests;

pub mod bijection_map;
pub mod config;
pub mod incubation_queue;
pub mod runtime;
pub mod snapshot_array;
pub mod state;
pub mod thread_pool;

/// Contains most of the things that are typically required from the core.
pub mod prelude {
    pub use super::{
        bijection_map::BijectionMap,
        config::{Config, RuntimeConfig},
        incubation_queue::IncubationQueue,
        runtime::{Runtime, RuntimeExecutor},
        snapshot_array::SnapshotArray,
        state::{StateError, StateListener, StateMachine},
        thread_pool::{
            CurrentThreadExecutor, Executor, PoolKind, Task, ThreadPool, ThreadPoolOptions,
            ThreadPoolStats,
        },
    };
}
