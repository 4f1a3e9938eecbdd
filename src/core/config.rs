// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::result::Result;
use std::time::Duration;

use crate::core::thread_pool::{PoolKind, ThreadPoolOptions};

/// A trait that handles the loading / saving and validity of configuration information.
pub trait Config: serde::Serialize {
    fn save(&self, path: &Path) -> Result<(), ()> {
        if self.is_valid() {
            let s = serde_yaml::to_string(&self).map_err(|err| {
                error!("Cannot serialize configuration, error = {}", err);
            })?;
            if let Ok(mut f) = File::create(path) {
                let result = f.write_all(s.as_bytes());
                if let Err(err) = result {
                    error!("Could not save config - error = {:?}", err);
                } else {
                    return Ok(());
                }
            } else {
                error!("Cannot create the path to save the config");
            }
        } else {
            error!("Config isn't valid and won't be saved");
        }
        Err(())
    }

    fn load<A>(path: &Path) -> Result<A, ()>
    where
        for<'de> A: Config + serde::Deserialize<'de>,
    {
        if let Ok(mut f) = File::open(path) {
            let mut s = String::new();
            if f.read_to_string(&mut s).is_ok() {
                serde_yaml::from_str(&s).map_err(|err| {
                    error!(
                        "Cannot deserialize configuration from {}, error reason: {}",
                        path.to_string_lossy(),
                        err
                    );
                })
            } else {
                error!(
                    "Cannot read configuration file {} to string",
                    path.to_string_lossy()
                );
                Err(())
            }
        } else {
            error!("Cannot open configuration file {}", path.to_string_lossy());
            Err(())
        }
    }

    fn is_valid(&self) -> bool;
}

/// Sizing of the worker pools held by a `Runtime`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Workers in the pool for short, CPU bound work. Defaults to the number of CPUs.
    pub non_blocking_pool_size: usize,
    /// Maximum queued tasks of the non blocking pool, unlimited when absent
    #[serde(default)]
    pub non_blocking_queue_capacity: Option<usize>,
    /// Largest number of threads in the pool for work that may block
    pub blocking_pool_max_size: usize,
    /// Seconds an idle blocking thread waits for work before exiting
    pub blocking_pool_idle_timeout: u64,
    /// Maximum queued tasks of the blocking pool, unlimited when absent
    #[serde(default)]
    pub blocking_queue_capacity: Option<usize>,
    /// Thread name prefix of the non blocking pool
    pub non_blocking_thread_name: String,
    /// Thread name prefix of the blocking pool
    pub blocking_thread_name: String,
}

impl Config for RuntimeConfig {
    fn is_valid(&self) -> bool {
        let mut valid = true;
        if self.non_blocking_pool_size == 0 {
            error!("Non blocking pool size must be greater than 0");
            valid = false;
        }
        if self.blocking_pool_max_size == 0 {
            error!("Blocking pool max size must be greater than 0");
            valid = false;
        }
        if self.non_blocking_thread_name.is_empty() || self.blocking_thread_name.is_empty() {
            error!("Thread names must not be empty");
            valid = false;
        }
        valid
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            non_blocking_pool_size: cpus,
            non_blocking_queue_capacity: None,
            blocking_pool_max_size: 256,
            blocking_pool_idle_timeout: 3,
            blocking_queue_capacity: None,
            non_blocking_thread_name: "Non-Blocking-Work-Executor".to_string(),
            blocking_thread_name: "Blocking-Work-Executor".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Options of the pool for short, CPU bound work
    pub fn non_blocking_pool_options(&self) -> ThreadPoolOptions {
        ThreadPoolOptions {
            name: self.non_blocking_thread_name.clone(),
            kind: PoolKind::NonBlocking,
            threads: self.non_blocking_pool_size,
            keep_alive: Duration::from_secs(self.blocking_pool_idle_timeout),
            queue_capacity: self.non_blocking_queue_capacity,
        }
    }

    /// Options of the pool for work that may block
    pub fn blocking_pool_options(&self) -> ThreadPoolOptions {
        ThreadPoolOptions {
            name: self.blocking_thread_name.clone(),
            kind: PoolKind::Blocking,
            threads: self.blocking_pool_max_size,
            keep_alive: Duration::from_secs(self.blocking_pool_idle_timeout),
            queue_capacity: self.blocking_queue_capacity,
        }
    }
}
